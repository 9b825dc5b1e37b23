//! SQL synthesis: column strings, rendering and formatting of documents.

use crate::{
    config::PlannerConfig,
    document::Document,
    error::{DuplicateAlias, QueryError},
    query::{
        columns::{ColumnStrings, OutputColumn, find_duplicate_aliases},
        renderer::{Render, Renderer},
    },
};
use tracing::warn;

pub mod columns;
pub mod format;
pub mod renderer;

impl Document {
    /// Renders the document with the default configuration.
    pub fn get_sql(&self) -> Result<String, QueryError> {
        self.get_sql_with(&PlannerConfig::default())
    }

    /// Renders the document. Fails only if some field map in the tree has
    /// duplicate aliases.
    pub fn get_sql_with(&self, config: &PlannerConfig) -> Result<String, QueryError> {
        self.check_aliases()?;
        let mut renderer = Renderer::new(config);
        self.render(&mut renderer);
        Ok(renderer.finish())
    }

    /// SQL counting the rows the document returns, for a row-count collaborator.
    pub fn count_sql(&self) -> Result<String, QueryError> {
        self.count_sql_with(&PlannerConfig::default())
    }

    pub fn count_sql_with(&self, config: &PlannerConfig) -> Result<String, QueryError> {
        self.check_aliases()?;
        let mut renderer = Renderer::new(config);
        renderer.sql.push_str("SELECT COUNT(*) AS row_count FROM ");
        renderer.push_subquery(self);
        renderer.sql.push_str(" sq");
        Ok(renderer.finish())
    }

    pub fn columns(&self) -> Result<ColumnStrings, QueryError> {
        self.columns_with(&PlannerConfig::default())
    }

    pub fn columns_with(&self, config: &PlannerConfig) -> Result<ColumnStrings, QueryError> {
        ColumnStrings::build(&self.fields, config)
    }

    pub fn get_output_aliases(&self) -> Result<Vec<String>, QueryError> {
        Ok(self.columns()?.select_aliases)
    }

    pub fn get_output_types(&self) -> Result<Vec<String>, QueryError> {
        self.get_output_types_with(&PlannerConfig::default())
    }

    pub fn get_output_types_with(&self, config: &PlannerConfig) -> Result<Vec<String>, QueryError> {
        Ok(self.columns_with(config)?.sql_types)
    }

    pub fn get_output_columns_with(
        &self,
        config: &PlannerConfig,
    ) -> Result<Vec<OutputColumn>, QueryError> {
        Ok(self.columns_with(config)?.output_columns())
    }

    /// Lists aliases shared by several fields, logging each collision.
    pub fn show_duplicated_columns(&self) -> Vec<DuplicateAlias> {
        let duplicates = find_duplicate_aliases(&self.fields);
        for duplicate in &duplicates {
            warn!("Duplicated column {}", duplicate);
        }
        duplicates
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        config::PlannerConfig,
        document::{Document, Field},
    };
    use model::core::kinds::Aggregation;

    fn normalize(sql: &str) -> String {
        sql.chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_uppercase()
    }

    #[test]
    fn test_get_sql_pretty_matches_compact() {
        let doc = Document::from_table(
            "orders",
            [
                ("order_id", Field::dim().with_aggregation(Aggregation::Group)),
                (
                    "amount",
                    Field::num()
                        .with_aggregation(Aggregation::Sum)
                        .with_alias("total"),
                ),
            ],
        );

        let pretty = doc.get_sql().unwrap();
        let compact = doc.get_sql_with(&PlannerConfig::compact()).unwrap();

        assert_eq!(
            compact,
            "SELECT order_id, SUM(amount) AS total FROM orders GROUP BY order_id"
        );
        assert_eq!(normalize(&pretty), normalize(&compact));
        assert!(pretty.contains('\n'));
    }

    #[test]
    fn test_count_sql_wraps_document() {
        let doc = Document::from_table("orders", [("id", Field::dim())]);
        assert_eq!(
            normalize(&doc.count_sql().unwrap()),
            normalize("SELECT COUNT(*) AS row_count FROM (SELECT id FROM orders) sq")
        );
    }

    #[test]
    fn test_show_duplicated_columns() {
        let doc = Document::from_table(
            "t",
            [
                ("a", Field::dim().with_alias("x")),
                ("b", Field::dim().with_alias("x")),
            ],
        );
        let duplicates = doc.show_duplicated_columns();
        assert_eq!(duplicates.len(), 1);
        assert_eq!(duplicates[0].keys, vec!["a", "b"]);
        assert!(doc.get_sql().is_err());
    }
}
