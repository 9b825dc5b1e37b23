use crate::{document::Document, error::QueryError};
use tracing::warn;

/// What to do when the targeted clause already holds a condition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IfExists {
    #[default]
    Append,
    Replace,
}

/// Connective used when appending to an existing condition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogicalOp {
    #[default]
    And,
    Or,
}

impl LogicalOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalOp::And => "AND",
            LogicalOp::Or => "OR",
        }
    }
}

fn combine(
    existing: Option<String>,
    condition: &str,
    if_exists: IfExists,
    operator: LogicalOp,
) -> Option<String> {
    let condition = condition.trim();
    if condition.is_empty() {
        warn!("Empty condition ignored");
        return existing;
    }

    match (existing, if_exists) {
        (Some(current), IfExists::Append) => Some(format!(
            "({current}) {} ({condition})",
            operator.as_str()
        )),
        _ => Some(condition.to_string()),
    }
}

impl Document {
    /// Sets or extends the WHERE condition.
    pub fn query(
        mut self,
        condition: &str,
        if_exists: IfExists,
        operator: LogicalOp,
    ) -> Result<Self, QueryError> {
        self.ensure_not_union("query")?;
        self.filter = combine(self.filter.take(), condition, if_exists, operator);
        Ok(self)
    }

    /// Sets or extends the HAVING condition.
    pub fn having(
        mut self,
        condition: &str,
        if_exists: IfExists,
        operator: LogicalOp,
    ) -> Result<Self, QueryError> {
        self.ensure_not_union("having")?;
        self.having = combine(self.having.take(), condition, if_exists, operator);
        Ok(self)
    }
}
