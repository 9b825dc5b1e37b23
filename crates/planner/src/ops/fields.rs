use crate::{
    document::{Document, Field, FieldMap},
    error::QueryError,
    ops::OneOrMany,
};
use model::core::{
    data_type::FieldType,
    kinds::{Aggregation, OrderDir},
    utils::normalize_alias,
};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Attributes shared by every expression added in one [`Document::assign`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assign {
    pub field_type: FieldType,
    pub group_by: Option<Aggregation>,
    pub order_by: Option<OrderDir>,
    pub custom_type: Option<String>,
}

impl Default for Assign {
    fn default() -> Self {
        Self {
            field_type: FieldType::Dim,
            group_by: None,
            order_by: None,
            custom_type: None,
        }
    }
}

impl Assign {
    pub fn dim() -> Self {
        Self::default()
    }

    pub fn num() -> Self {
        Self {
            field_type: FieldType::Num,
            ..Self::default()
        }
    }

    pub fn group_by(mut self, aggregation: Aggregation) -> Self {
        self.group_by = Some(aggregation);
        self
    }

    pub fn order_by(mut self, order: OrderDir) -> Self {
        self.order_by = Some(order);
        self
    }

    pub fn custom_type(mut self, custom_type: impl Into<String>) -> Self {
        self.custom_type = Some(custom_type.into());
        self
    }

    fn field(&self, expression: String) -> Field {
        Field {
            field_type: self.field_type,
            custom_type: self.custom_type.clone(),
            alias: None,
            expression: Some(expression),
            aggregation: self.group_by,
            order: self.order_by,
            included: true,
        }
    }
}

impl Document {
    /// Sets output aliases. Names resolve by key first, then by alias.
    pub fn rename<I, K, V>(mut self, aliases: I) -> Result<Self, QueryError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (name, alias) in aliases {
            let Some(key) = self.resolve_keys([name.as_ref()], "rename").pop() else {
                continue;
            };
            let normalized = normalize_alias(alias.as_ref());
            if normalized.is_empty() {
                return Err(QueryError::InvalidValue {
                    context: format!("rename() of field '{key}'"),
                    attribute: "alias".to_string(),
                    value: alias.as_ref().to_string(),
                    expected: "a non-blank name".to_string(),
                });
            }
            if let Some(field) = self.fields.get_mut(&key) {
                field.alias = Some(normalized);
            }
        }
        self.check_own_aliases()?;
        Ok(self)
    }

    /// Drops fields from the document.
    pub fn remove<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for key in self.resolve_keys(names, "remove") {
            self.fields.shift_remove(&key);
            self.picked.retain(|picked| picked != &key);
        }
        self
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// Adds one expression field per `(name, expression)` pair, replacing any
    /// field already stored under that name.
    pub fn assign<I, K, V>(mut self, expressions: I, options: Assign) -> Result<Self, QueryError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.ensure_not_union("assign")?;

        for (name, expression) in expressions {
            let name = name.into();
            let field = options.field(expression.into());
            field.check(&name)?;
            if self.fields.insert(name.clone(), field).is_some() {
                debug!("assign(): replacing field '{}'", name);
            }
        }

        self.check_own_aliases()?;
        Ok(self)
    }

    /// Marks fields as GROUP BY dimensions.
    pub fn groupby<I, S>(mut self, names: I) -> Result<Self, QueryError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.ensure_not_union("groupby")?;

        for key in self.resolve_keys(names, "groupby") {
            if let Some(field) = self.fields.get_mut(&key) {
                field.aggregation = Some(Aggregation::Group);
            }
        }
        Ok(self)
    }

    /// Picks the fields the next [`Document::agg`] call applies to.
    pub fn pick<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.picked = self.resolve_keys(names, "pick");
        self
    }

    /// Applies `aggregation` to the picked fields and clears the pick.
    pub fn agg(mut self, aggregation: Aggregation) -> Result<Self, QueryError> {
        self.ensure_not_union("agg")?;

        if self.picked.is_empty() {
            warn!("agg(): no fields picked, nothing to aggregate");
            return Ok(self);
        }

        for key in std::mem::take(&mut self.picked) {
            if let Some(field) = self.fields.get_mut(&key) {
                field.aggregation = Some(aggregation);
                field.check(&key)?;
            }
        }
        Ok(self)
    }

    /// Sets the sort direction of each named field. A single direction
    /// applies to every field.
    pub fn orderby<I, S>(
        mut self,
        names: I,
        ascending: impl Into<OneOrMany<bool>>,
    ) -> Result<Self, QueryError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names: Vec<String> = names.into_iter().map(|n| n.as_ref().to_string()).collect();
        let ascending = ascending.into().into_vec();

        let directions = if ascending.len() == 1 {
            vec![ascending[0]; names.len()]
        } else if ascending.len() == names.len() {
            ascending
        } else {
            return Err(QueryError::Semantic(format!(
                "orderby(): {} fields but {} sort directions",
                names.len(),
                ascending.len()
            )));
        };

        for (name, ascending) in names.iter().zip(directions) {
            let Some(key) = self.resolve_keys([name], "orderby").pop() else {
                continue;
            };
            if let Some(field) = self.fields.get_mut(&key) {
                field.order = Some(OrderDir::from_ascending(ascending));
            }
        }
        Ok(self)
    }

    /// Reorders the field map. `names` must name every field exactly once.
    pub fn rearrange<I, S>(mut self, names: I) -> Result<Self, QueryError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut order = Vec::new();
        let mut unknown = Vec::new();
        for name in names {
            match self.resolve_key(name.as_ref()) {
                Some(key) => order.push(key),
                None => unknown.push(name.as_ref().to_string()),
            }
        }

        let mut seen = HashSet::new();
        let repeated: Vec<&String> = order.iter().filter(|key| !seen.insert(*key)).collect();
        let missing: Vec<&String> = self
            .fields
            .keys()
            .filter(|key| !order.contains(*key))
            .collect();

        if !unknown.is_empty() || !repeated.is_empty() || !missing.is_empty() {
            return Err(QueryError::Semantic(format!(
                "rearrange() needs a permutation of the fields; unknown: {:?}, repeated: {:?}, missing: {:?}",
                unknown, repeated, missing
            )));
        }

        let mut fields = std::mem::take(&mut self.fields);
        self.fields = order
            .into_iter()
            .filter_map(|key| fields.shift_remove(&key).map(|field| (key, field)))
            .collect::<FieldMap>();
        Ok(self)
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }
}
