//! The per-column attribute record of a query document.

use crate::{config::PlannerConfig, error::QueryError};
use model::core::{
    data_type::{FieldType, is_numeric_type},
    kinds::{Aggregation, OrderDir},
    utils::{normalize_alias, strip_subquery_qualifier},
};

/// One output column description.
///
/// The field key in the owning document's field map doubles as the raw column
/// reference; `expression` replaces it when set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub field_type: FieldType,

    /// Explicit storage type; overrides the one derived from `field_type`.
    pub custom_type: Option<String>,

    /// Display name, already normalized. Falls back to the field key.
    pub alias: Option<String>,

    /// SQL expression used instead of the field key.
    pub expression: Option<String>,

    pub aggregation: Option<Aggregation>,

    pub order: Option<OrderDir>,

    /// Excluded fields stay in the model but are not rendered.
    pub included: bool,
}

impl Field {
    pub fn new(field_type: FieldType) -> Self {
        Self {
            field_type,
            custom_type: None,
            alias: None,
            expression: None,
            aggregation: None,
            order: None,
            included: true,
        }
    }

    pub fn dim() -> Self {
        Self::new(FieldType::Dim)
    }

    pub fn num() -> Self {
        Self::new(FieldType::Num)
    }

    pub fn with_alias(mut self, alias: &str) -> Self {
        self.alias = Some(normalize_alias(alias));
        self
    }

    pub fn with_expression(mut self, expression: impl Into<String>) -> Self {
        self.expression = Some(expression.into());
        self
    }

    pub fn with_custom_type(mut self, custom_type: impl Into<String>) -> Self {
        self.custom_type = Some(custom_type.into());
        self
    }

    pub fn with_aggregation(mut self, aggregation: Aggregation) -> Self {
        self.aggregation = Some(aggregation);
        self
    }

    pub fn with_order(mut self, order: OrderDir) -> Self {
        self.order = Some(order);
        self
    }

    pub fn excluded(mut self) -> Self {
        self.included = false;
        self
    }

    /// The output alias of this field when stored under `key`.
    pub fn alias_for(&self, key: &str) -> String {
        match &self.alias {
            Some(alias) => alias.clone(),
            None => strip_subquery_qualifier(key).to_string(),
        }
    }

    /// The raw source of the column: the expression, or the key itself.
    pub fn source<'a>(&'a self, key: &'a str) -> &'a str {
        self.expression.as_deref().unwrap_or(key)
    }

    /// The source wrapped in its aggregate function, if any.
    pub fn rendered_expression(&self, key: &str) -> String {
        let source = self.source(key);
        match self.aggregation.and_then(|agg| agg.function_name()) {
            Some(function) => format!("{function}({source})"),
            None => source.to_string(),
        }
    }

    /// Resolved storage type: custom type first, then the configured default.
    pub fn storage_type(&self, config: &PlannerConfig) -> String {
        match &self.custom_type {
            Some(custom) => custom.clone(),
            None => config.storage_type(self.field_type).to_string(),
        }
    }

    pub fn is_numeric(&self) -> bool {
        match &self.custom_type {
            Some(custom) => is_numeric_type(custom),
            None => self.field_type == FieldType::Num,
        }
    }

    pub fn is_group_dimension(&self) -> bool {
        self.aggregation == Some(Aggregation::Group)
    }

    /// Checks the attribute combination of the field stored under `key`.
    pub fn check(&self, key: &str) -> Result<(), QueryError> {
        if let Some(aggregation) = self.aggregation {
            if aggregation.is_aggregate() && !self.is_numeric() {
                return Err(QueryError::AggregationOnNonNumeric {
                    field: key.to_string(),
                    aggregation: aggregation.to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alias_defaults_to_key_without_subquery_qualifier() {
        assert_eq!(Field::dim().alias_for("order_id"), "order_id");
        assert_eq!(Field::dim().alias_for("sq2.order_id"), "order_id");
        assert_eq!(Field::dim().with_alias("Order Id").alias_for("x"), "Order_Id");
    }

    #[test]
    fn test_rendered_expression_wraps_aggregate() {
        let field = Field::num().with_aggregation(Aggregation::Sum);
        assert_eq!(field.rendered_expression("amount"), "SUM(amount)");

        let field = Field::num()
            .with_expression("price * qty")
            .with_aggregation(Aggregation::Avg);
        assert_eq!(field.rendered_expression("revenue"), "AVG(price * qty)");

        let field = Field::dim().with_aggregation(Aggregation::Group);
        assert_eq!(field.rendered_expression("region"), "region");
    }

    #[test]
    fn test_storage_type_prefers_custom_type() {
        let config = PlannerConfig::default();
        assert_eq!(Field::dim().storage_type(&config), "VARCHAR(500)");
        assert_eq!(Field::num().storage_type(&config), "FLOAT(53)");
        assert_eq!(
            Field::num().with_custom_type("BIGINT").storage_type(&config),
            "BIGINT"
        );
    }

    #[test]
    fn test_check_rejects_aggregate_on_dim() {
        let field = Field::dim().with_aggregation(Aggregation::Sum);
        assert!(matches!(
            field.check("name"),
            Err(QueryError::AggregationOnNonNumeric { .. })
        ));

        let field = Field::dim()
            .with_custom_type("INTEGER")
            .with_aggregation(Aggregation::Max);
        assert!(field.check("id").is_ok());

        let field = Field::dim().with_aggregation(Aggregation::Group);
        assert!(field.check("name").is_ok());
    }
}
