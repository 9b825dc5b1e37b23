use crate::core::data_type::FieldType;
use serde::{Deserialize, Serialize};

/// Raw column description supplied by a metadata collaborator
/// (an information-schema lookup, a file header sniffer, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMetadata {
    pub name: String,
    pub data_type: String,
}

impl ColumnMetadata {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
        }
    }

    pub fn field_type(&self) -> FieldType {
        FieldType::from_native_type(&self.data_type)
    }
}
