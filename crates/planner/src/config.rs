use model::core::data_type::{DEFAULT_DIM_TYPE, DEFAULT_NUM_TYPE, FieldType};
use serde::{Deserialize, Serialize};

/// Settings that influence how documents resolve types and render SQL.
///
/// Configuration is always passed explicitly; documents never read global state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Storage type of `dim` fields without a custom type.
    pub dim_type: String,

    /// Storage type of `num` fields without a custom type.
    pub num_type: String,

    /// Upper-case keywords and re-indent the rendered SQL.
    pub pretty: bool,

    /// Spaces per indentation level when `pretty` is set.
    pub indent: usize,
}

impl PlannerConfig {
    pub fn storage_type(&self, field_type: FieldType) -> &str {
        match field_type {
            FieldType::Dim => &self.dim_type,
            FieldType::Num => &self.num_type,
        }
    }

    pub fn compact() -> Self {
        Self {
            pretty: false,
            ..Self::default()
        }
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            dim_type: DEFAULT_DIM_TYPE.to_string(),
            num_type: DEFAULT_NUM_TYPE.to_string(),
            pretty: true,
            indent: 4,
        }
    }
}
