use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, fmt};

/// Storage type a `Dim` field resolves to when no custom type is given.
pub const DEFAULT_DIM_TYPE: &str = "VARCHAR(500)";

/// Storage type a `Num` field resolves to when no custom type is given.
pub const DEFAULT_NUM_TYPE: &str = "FLOAT(53)";

/// The declared kind of a field: a dimension (string-like) or a numeric measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Dim,
    Num,
}

lazy_static! {
    static ref NUMERIC_TYPES: HashSet<&'static str> = build_numeric_type_set();
}

impl FieldType {
    pub const VALID: &'static [&'static str] = &["dim", "num"];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "dim" => Some(FieldType::Dim),
            "num" => Some(FieldType::Num),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Dim => "dim",
            FieldType::Num => "num",
        }
    }

    /// Classifies a native column type reported by a database into dim/num.
    pub fn from_native_type(type_name: &str) -> Self {
        if is_numeric_type(type_name) {
            FieldType::Num
        } else {
            FieldType::Dim
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns true when a storage type string names a numeric SQL type.
///
/// Length/precision suffixes are ignored, so `NUMERIC(12, 2)` and `FLOAT(53)`
/// both count as numeric.
pub fn is_numeric_type(type_name: &str) -> bool {
    let normalized = normalize_type_name(type_name);
    NUMERIC_TYPES.contains(normalized.as_str())
}

fn normalize_type_name(type_name: &str) -> String {
    let base = match type_name.find('(') {
        Some(idx) => &type_name[..idx],
        None => type_name,
    };
    base.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

fn build_numeric_type_set() -> HashSet<&'static str> {
    let entries = [
        "SMALLINT",
        "INT2",
        "INTEGER",
        "INT",
        "INT4",
        "INT8",
        "BIGINT",
        "TINYINT",
        "MEDIUMINT",
        "INT UNSIGNED",
        "BIGINT UNSIGNED",
        "FLOAT",
        "FLOAT4",
        "FLOAT8",
        "REAL",
        "DOUBLE",
        "DOUBLE PRECISION",
        "DECIMAL",
        "NUMERIC",
        "NUMBER",
    ];

    entries.into_iter().collect()
}
