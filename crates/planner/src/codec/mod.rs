//! The JSON form of query documents.

use crate::{document::Document, error::QueryError};
use serde_json::Value;

pub mod decode;
pub mod encode;

/// Keys accepted in a field's attribute object.
pub const ALLOWED_FIELD_ATTRIBUTES: &[&str] = &[
    "type",
    "as",
    "group_by",
    "order_by",
    "expression",
    "select",
    "custom_type",
];

/// Value of a field's `select` attribute that excludes it from the output.
pub const EXCLUDED_SENTINEL: &str = "0";

/// Value of a document's `distinct` attribute that enables `SELECT DISTINCT`.
pub const DISTINCT_SENTINEL: &str = "1";

impl Document {
    /// Validates `value` and builds the typed document it describes.
    pub fn from_json(value: &Value) -> Result<Self, QueryError> {
        decode::decode_document(value)
    }

    pub fn from_json_str(text: &str) -> Result<Self, QueryError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_json(&value)
    }

    pub fn to_json(&self) -> Value {
        encode::encode_document(self)
    }

    pub fn to_json_string(&self) -> Result<String, QueryError> {
        Ok(serde_json::to_string_pretty(&self.to_json())?)
    }
}
