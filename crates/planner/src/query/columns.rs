//! Derives the column strings of a document's field map: select expressions,
//! output aliases, grouping dimensions, order-by entries and storage types.

use crate::{
    config::PlannerConfig,
    document::FieldMap,
    error::{DuplicateAlias, QueryError},
};
use indexmap::IndexMap;
use model::core::{kinds::OrderDir, utils::strip_subquery_qualifier};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnStrings {
    /// `expr AS alias`, or the bare name when both are equal.
    pub select_exprs: Vec<String>,
    pub select_aliases: Vec<String>,
    pub group_dimensions: Vec<String>,
    /// `alias` or `alias DESC`.
    pub order_by: Vec<String>,
    pub sql_types: Vec<String>,
}

/// One output column as exposed to execution collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputColumn {
    pub alias: String,
    pub sql_type: String,
}

impl ColumnStrings {
    /// Builds the column strings, failing if two fields share an alias.
    pub fn build(fields: &FieldMap, config: &PlannerConfig) -> Result<Self, QueryError> {
        let duplicates = find_duplicate_aliases(fields);
        if !duplicates.is_empty() {
            return Err(QueryError::DuplicateAlias(duplicates));
        }
        Ok(Self::build_unchecked(fields, config))
    }

    pub(crate) fn build_unchecked(fields: &FieldMap, config: &PlannerConfig) -> Self {
        let mut columns = ColumnStrings::default();

        for (key, field) in fields.iter().filter(|(_, f)| f.included) {
            let alias = field.alias_for(key);
            let expr = field.rendered_expression(key);

            if expr == alias {
                columns.select_exprs.push(expr);
            } else {
                columns.select_exprs.push(format!("{expr} AS {alias}"));
            }

            if field.is_group_dimension() {
                columns
                    .group_dimensions
                    .push(strip_subquery_qualifier(&alias).to_string());
            }

            match field.order {
                Some(OrderDir::Desc) => columns.order_by.push(format!("{alias} DESC")),
                Some(OrderDir::Asc) => columns.order_by.push(alias.clone()),
                None => {}
            }

            columns.sql_types.push(field.storage_type(config));
            columns.select_aliases.push(alias);
        }

        columns
    }

    pub fn output_columns(&self) -> Vec<OutputColumn> {
        self.select_aliases
            .iter()
            .zip(&self.sql_types)
            .map(|(alias, sql_type)| OutputColumn {
                alias: alias.clone(),
                sql_type: sql_type.clone(),
            })
            .collect()
    }
}

/// Maps every alias to the keys using it and returns those used more than once.
pub fn find_duplicate_aliases(fields: &FieldMap) -> Vec<DuplicateAlias> {
    let mut by_alias: IndexMap<String, Vec<String>> = IndexMap::new();
    for (key, field) in fields {
        by_alias
            .entry(field.alias_for(key))
            .or_default()
            .push(key.clone());
    }

    by_alias
        .into_iter()
        .filter(|(_, keys)| keys.len() > 1)
        .map(|(alias, keys)| DuplicateAlias { alias, keys })
        .collect()
}
