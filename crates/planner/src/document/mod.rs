//! The query document: a relation (table, subquery, join or union) plus the
//! field map and clauses that describe one SELECT.

use crate::{error::QueryError, query::columns::find_duplicate_aliases};
use indexmap::IndexMap;
use model::core::kinds::{JoinKind, UnionKind};
use tracing::warn;

pub mod field;
pub mod seed;

pub use field::Field;

/// Fields keyed by their raw column reference, in output order.
pub type FieldMap = IndexMap<String, Field>;

/// Join condition between a join part and everything to its left.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OnClause {
    Condition(String),
    /// No condition at all, e.g. for `CROSS JOIN`.
    Cross,
}

impl OnClause {
    pub fn on(condition: impl Into<String>) -> Self {
        OnClause::Condition(condition.into())
    }
}

/// Where a document's rows come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Relation {
    Table {
        schema: Option<String>,
        table: String,
    },
    /// The inner document is rendered as subquery `sq`.
    Subquery(Box<Document>),
    /// Parts are rendered as `sq1..sqN`; `join_types` and `on` hold one entry
    /// per part after the first.
    Join {
        parts: Vec<Document>,
        join_types: Vec<JoinKind>,
        on: Vec<OnClause>,
    },
    Union {
        parts: Vec<Document>,
        union_types: Vec<UnionKind>,
    },
}

/// A composable description of one SELECT query.
///
/// Nested documents are owned by value, so composing documents never lets two
/// of them share structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub relation: Relation,
    pub fields: FieldMap,
    pub filter: Option<String>,
    pub having: Option<String>,
    pub distinct: bool,
    pub offset: Option<u64>,
    pub limit: Option<u64>,

    /// Execution target the rendered SQL is meant for. Not serialized.
    pub engine: Option<String>,

    /// Fields picked by the most recent `pick()`, consumed by `agg()`.
    pub(crate) picked: Vec<String>,
}

impl Document {
    pub fn new(relation: Relation, fields: FieldMap) -> Self {
        Self {
            relation,
            fields,
            filter: None,
            having: None,
            distinct: false,
            offset: None,
            limit: None,
            engine: None,
            picked: Vec::new(),
        }
    }

    /// Creates a base-table document from `(key, field)` pairs.
    pub fn from_table<K, I>(table: &str, fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Field)>,
    {
        let fields = fields.into_iter().map(|(k, f)| (k.into(), f)).collect();
        Self::new(
            Relation::Table {
                schema: None,
                table: table.to_string(),
            },
            fields,
        )
    }

    pub fn with_schema(mut self, schema: &str) -> Self {
        if let Relation::Table { schema: s, .. } = &mut self.relation {
            *s = Some(schema.to_string());
        } else {
            warn!("Schema '{}' ignored: document is not a base table", schema);
        }
        self
    }

    pub fn with_engine(mut self, engine: impl Into<String>) -> Self {
        self.engine = Some(engine.into());
        self
    }

    /// Explicit deep copy, equivalent to `clone()`.
    pub fn copy(&self) -> Self {
        self.clone()
    }

    pub fn is_union(&self) -> bool {
        matches!(self.relation, Relation::Union { .. })
    }

    pub fn shape(&self) -> &'static str {
        match self.relation {
            Relation::Table { .. } => "table",
            Relation::Subquery(_) => "subquery",
            Relation::Join { .. } => "join",
            Relation::Union { .. } => "union",
        }
    }

    /// Nested documents, in `sq1..sqN` (or `sq`) order.
    pub fn parts(&self) -> &[Document] {
        match &self.relation {
            Relation::Table { .. } => &[],
            Relation::Subquery(inner) => std::slice::from_ref(inner.as_ref()),
            Relation::Join { parts, .. } | Relation::Union { parts, .. } => parts,
        }
    }

    /// Finds the key of a field by key or, failing that, by alias.
    pub fn resolve_key(&self, name: &str) -> Option<String> {
        if self.fields.contains_key(name) {
            return Some(name.to_string());
        }
        self.fields
            .iter()
            .find(|(key, field)| field.alias_for(key) == name)
            .map(|(key, _)| key.clone())
    }

    /// Keys (or aliases, when `aliased`) of the included fields.
    pub fn get_fields(&self, aliased: bool) -> Vec<String> {
        self.fields
            .iter()
            .filter(|(_, field)| field.included)
            .map(|(key, field)| {
                if aliased {
                    field.alias_for(key)
                } else {
                    key.clone()
                }
            })
            .collect()
    }

    /// Re-validates the whole document tree: field attribute combinations and
    /// alias uniqueness of every field map.
    pub fn validate(&self) -> Result<(), QueryError> {
        for (key, field) in &self.fields {
            field.check(key)?;
        }
        self.check_own_aliases()?;
        for part in self.parts() {
            part.validate()?;
        }
        Ok(())
    }

    /// Fails with `DuplicateAlias` if any field map in the tree has colliding
    /// aliases.
    pub fn check_aliases(&self) -> Result<(), QueryError> {
        self.check_own_aliases()?;
        for part in self.parts() {
            part.check_aliases()?;
        }
        Ok(())
    }

    pub(crate) fn check_own_aliases(&self) -> Result<(), QueryError> {
        let duplicates = find_duplicate_aliases(&self.fields);
        if duplicates.is_empty() {
            Ok(())
        } else {
            Err(QueryError::DuplicateAlias(duplicates))
        }
    }

    pub(crate) fn ensure_not_union(&self, operation: &'static str) -> Result<(), QueryError> {
        if self.is_union() {
            Err(QueryError::UnsupportedInContext { operation })
        } else {
            Ok(())
        }
    }
}
