#![allow(dead_code)]

use model::core::kinds::Aggregation;
use planner::{Document, Field, PlannerConfig};

/// Strips whitespace and case so pretty and compact SQL compare equal.
pub fn normalize(sql: &str) -> String {
    sql.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}

pub fn compact(doc: &Document) -> String {
    doc.get_sql_with(&PlannerConfig::compact())
        .expect("document should render")
}

/// `orders` grouped by order id with the summed amount exposed as `total`.
pub fn orders() -> Document {
    Document::from_table(
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
    )
}

pub fn customers() -> Document {
    Document::from_table(
        "customers",
        [
            ("id", Field::dim()),
            ("name", Field::dim()),
            ("country", Field::dim()),
        ],
    )
    .with_schema("crm")
}

pub fn payments() -> Document {
    Document::from_table(
        "payments",
        [
            ("id", Field::dim()),
            ("customer_id", Field::dim()),
            ("amount", Field::num()),
        ],
    )
}
