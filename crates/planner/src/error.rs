use std::fmt;
use thiserror::Error;

/// Errors raised while validating, composing or loading query documents.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The document cannot be interpreted at all (no relation, no fields, ...).
    #[error("Invalid document structure: {0}")]
    Structural(String),

    /// An attribute holds a value outside of its accepted set.
    #[error("Invalid {attribute} '{value}' in {context}; expected {expected}")]
    InvalidValue {
        context: String,
        attribute: String,
        value: String,
        expected: String,
    },

    /// An aggregate function was requested on a field that is not numeric.
    #[error("Field '{field}' cannot be aggregated with {aggregation}: the field is not numeric")]
    AggregationOnNonNumeric { field: String, aggregation: String },

    /// Any other semantic problem with an operation's arguments.
    #[error("Semantic error: {0}")]
    Semantic(String),

    /// Two or more fields resolve to the same output alias.
    #[error("Duplicate aliases found: {}", format_duplicates(.0))]
    DuplicateAlias(Vec<DuplicateAlias>),

    /// Join/union inputs do not satisfy the operation's preconditions.
    #[error("Composition precondition failed: {0}")]
    Composition(String),

    /// The operation is not allowed on the document's current shape.
    #[error("{operation}() is not supported on a union document; wrap it with select() first")]
    UnsupportedInContext { operation: &'static str },

    #[error("Document '{0}' not found")]
    NotFound(String),

    #[error("Row count probe failed: {0}")]
    RowCount(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl QueryError {
    pub(crate) fn invalid_value(
        context: impl Into<String>,
        attribute: &str,
        value: impl Into<String>,
        valid: &[&str],
    ) -> Self {
        QueryError::InvalidValue {
            context: context.into(),
            attribute: attribute.to_string(),
            value: value.into(),
            expected: format!("one of: {}", valid.join(", ")),
        }
    }
}

/// One alias shared by several field keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateAlias {
    pub alias: String,
    pub keys: Vec<String>,
}

impl fmt::Display for DuplicateAlias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' used by [{}]", self.alias, self.keys.join(", "))
    }
}

fn format_duplicates(duplicates: &[DuplicateAlias]) -> String {
    duplicates
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
