//! Keyword enums shared by the document model: aggregation kinds, order
//! directions, join kinds and union kinds.
//!
//! Each enum parses case-insensitively from the strings used in serialized
//! documents and exposes the list of accepted spellings for diagnostics.

use serde::{Deserialize, Serialize};
use std::fmt;

fn normalize_keyword(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

/// How a field takes part in aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Aggregation {
    /// The field is a GROUP BY dimension.
    Group,
    Sum,
    Count,
    Min,
    Max,
    Avg,
    Stddev,
}

impl Aggregation {
    pub const VALID: &'static [&'static str] =
        &["group", "sum", "count", "min", "max", "avg", "stddev"];

    pub fn parse(value: &str) -> Option<Self> {
        match normalize_keyword(value).as_str() {
            "GROUP" => Some(Aggregation::Group),
            "SUM" => Some(Aggregation::Sum),
            "COUNT" => Some(Aggregation::Count),
            "MIN" => Some(Aggregation::Min),
            "MAX" => Some(Aggregation::Max),
            "AVG" => Some(Aggregation::Avg),
            "STDDEV" => Some(Aggregation::Stddev),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Aggregation::Group => "group",
            Aggregation::Sum => "sum",
            Aggregation::Count => "count",
            Aggregation::Min => "min",
            Aggregation::Max => "max",
            Aggregation::Avg => "avg",
            Aggregation::Stddev => "stddev",
        }
    }

    /// SQL aggregate function wrapping the field, `None` for `Group`.
    pub fn function_name(&self) -> Option<&'static str> {
        match self {
            Aggregation::Group => None,
            Aggregation::Sum => Some("SUM"),
            Aggregation::Count => Some("COUNT"),
            Aggregation::Min => Some("MIN"),
            Aggregation::Max => Some("MAX"),
            Aggregation::Avg => Some("AVG"),
            Aggregation::Stddev => Some("STDDEV"),
        }
    }

    pub fn is_aggregate(&self) -> bool {
        !matches!(self, Aggregation::Group)
    }
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderDir {
    Asc,
    Desc,
}

impl OrderDir {
    pub const VALID: &'static [&'static str] = &["ASC", "DESC"];

    pub fn parse(value: &str) -> Option<Self> {
        match normalize_keyword(value).as_str() {
            "ASC" => Some(OrderDir::Asc),
            "DESC" => Some(OrderDir::Desc),
            _ => None,
        }
    }

    pub fn from_ascending(ascending: bool) -> Self {
        if ascending {
            OrderDir::Asc
        } else {
            OrderDir::Desc
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderDir::Asc => "ASC",
            OrderDir::Desc => "DESC",
        }
    }
}

impl fmt::Display for OrderDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

impl JoinKind {
    pub const VALID: &'static [&'static str] = &[
        "INNER JOIN",
        "LEFT JOIN",
        "RIGHT JOIN",
        "FULL JOIN",
        "CROSS JOIN",
    ];

    pub fn parse(value: &str) -> Option<Self> {
        match normalize_keyword(value).as_str() {
            "JOIN" | "INNER JOIN" => Some(JoinKind::Inner),
            "LEFT JOIN" | "LEFT OUTER JOIN" => Some(JoinKind::Left),
            "RIGHT JOIN" | "RIGHT OUTER JOIN" => Some(JoinKind::Right),
            "FULL JOIN" | "FULL OUTER JOIN" => Some(JoinKind::Full),
            "CROSS JOIN" => Some(JoinKind::Cross),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
            JoinKind::Full => "FULL JOIN",
            JoinKind::Cross => "CROSS JOIN",
        }
    }
}

impl fmt::Display for JoinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnionKind {
    Union,
    UnionAll,
}

impl UnionKind {
    pub const VALID: &'static [&'static str] = &["UNION", "UNION ALL"];

    pub fn parse(value: &str) -> Option<Self> {
        match normalize_keyword(value).as_str() {
            "UNION" => Some(UnionKind::Union),
            "UNION ALL" => Some(UnionKind::UnionAll),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UnionKind::Union => "UNION",
            UnionKind::UnionAll => "UNION ALL",
        }
    }
}

impl fmt::Display for UnionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
