use crate::{
    document::{Document, Field, FieldMap, Relation},
    error::QueryError,
};
use tracing::{debug, warn};

/// Columns to project when wrapping a document with [`Document::select`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Every included field, i.e. `*`.
    All,
    /// Fields by key or alias, in the requested order.
    Fields(Vec<String>),
}

impl From<&str> for Selection {
    fn from(name: &str) -> Self {
        if name.trim() == "*" {
            Selection::All
        } else {
            Selection::Fields(vec![name.to_string()])
        }
    }
}

impl From<Vec<&str>> for Selection {
    fn from(names: Vec<&str>) -> Self {
        Selection::Fields(names.into_iter().map(String::from).collect())
    }
}

impl From<Vec<String>> for Selection {
    fn from(names: Vec<String>) -> Self {
        Selection::Fields(names)
    }
}

impl<const N: usize> From<[&str; N]> for Selection {
    fn from(names: [&str; N]) -> Self {
        Selection::Fields(names.into_iter().map(String::from).collect())
    }
}

impl Document {
    /// Wraps the document as subquery `sq` and projects the selected columns
    /// through it as `sq.<alias>`.
    pub fn select(mut self, selection: impl Into<Selection>) -> Result<Self, QueryError> {
        let keys = match selection.into() {
            Selection::All => self
                .fields
                .iter()
                .filter(|(_, field)| field.included)
                .map(|(key, _)| key.clone())
                .collect::<Vec<_>>(),
            Selection::Fields(names) => self
                .resolve_keys(&names, "select")
                .into_iter()
                .filter(|key| {
                    let included = self.fields[key].included;
                    if !included {
                        warn!("select(): field '{}' is excluded, skipping", key);
                    }
                    included
                })
                .collect(),
        };

        let fields: FieldMap = keys
            .iter()
            .map(|key| {
                let inner = &self.fields[key];
                let alias = inner.alias_for(key);
                let mut field = Field::new(inner.field_type).with_alias(&alias);
                field.custom_type = inner.custom_type.clone();
                (format!("sq.{alias}"), field)
            })
            .collect();

        if fields.is_empty() {
            return Err(QueryError::Structural(
                "select() resolved no columns to project".to_string(),
            ));
        }

        debug!("Wrapping {} document as subquery with {} columns", self.shape(), fields.len());

        self.picked.clear();
        let engine = self.engine.clone();
        let mut wrapped = Document::new(Relation::Subquery(Box::new(self)), fields);
        wrapped.engine = engine;
        Ok(wrapped)
    }
}
