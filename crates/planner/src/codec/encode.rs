use crate::{
    codec::{DISTINCT_SENTINEL, EXCLUDED_SENTINEL},
    document::{Document, Field, OnClause, Relation},
};
use model::core::utils::subquery_name;
use serde_json::{Map, Value, json};

/// Encodes a document tree in the `{"select": {...}}` form. Unset attributes
/// are written as empty strings so every key is present.
pub fn encode_document(doc: &Document) -> Value {
    let mut body = Map::new();

    match &doc.relation {
        Relation::Table { schema, table } => {
            body.insert("table".into(), json!(table));
            body.insert("schema".into(), json!(schema.as_deref().unwrap_or("")));
        }
        Relation::Subquery(inner) => {
            body.insert("sq".into(), encode_document(inner));
        }
        Relation::Join {
            parts,
            join_types,
            on,
        } => {
            insert_parts(&mut body, parts);
            let on: Vec<Value> = on
                .iter()
                .map(|clause| match clause {
                    OnClause::Condition(condition) => json!(condition),
                    OnClause::Cross => json!(0),
                })
                .collect();
            body.insert(
                "join".into(),
                json!({
                    "join_type": join_types.iter().map(|k| k.as_str()).collect::<Vec<_>>(),
                    "on": on,
                }),
            );
        }
        Relation::Union { parts, union_types } => {
            insert_parts(&mut body, parts);
            body.insert(
                "union".into(),
                json!({
                    "union_type": union_types.iter().map(|k| k.as_str()).collect::<Vec<_>>(),
                }),
            );
        }
    }

    let fields: Map<String, Value> = doc
        .fields
        .iter()
        .map(|(key, field)| (key.clone(), encode_field(field)))
        .collect();
    body.insert("fields".into(), Value::Object(fields));

    body.insert("where".into(), json!(doc.filter.as_deref().unwrap_or("")));
    body.insert("having".into(), json!(doc.having.as_deref().unwrap_or("")));
    body.insert(
        "distinct".into(),
        json!(if doc.distinct { DISTINCT_SENTINEL } else { "" }),
    );
    body.insert("offset".into(), optional_integer(doc.offset));
    body.insert("limit".into(), optional_integer(doc.limit));

    json!({ "select": body })
}

fn insert_parts(body: &mut Map<String, Value>, parts: &[Document]) {
    for (i, part) in parts.iter().enumerate() {
        body.insert(subquery_name(i + 1), encode_document(part));
    }
}

fn encode_field(field: &Field) -> Value {
    json!({
        "type": field.field_type.as_str(),
        "as": field.alias.as_deref().unwrap_or(""),
        "group_by": field.aggregation.map(|a| a.as_str()).unwrap_or(""),
        "order_by": field.order.map(|o| o.as_str()).unwrap_or(""),
        "expression": field.expression.as_deref().unwrap_or(""),
        "select": if field.included { "" } else { EXCLUDED_SENTINEL },
        "custom_type": field.custom_type.as_deref().unwrap_or(""),
    })
}

fn optional_integer(value: Option<u64>) -> Value {
    match value {
        Some(n) => json!(n),
        None => json!(""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::decode::decode_document;
    use model::core::kinds::{Aggregation, JoinKind, OrderDir};

    #[test]
    fn test_encode_writes_every_field_attribute() {
        let doc = Document::from_table(
            "orders",
            [(
                "amount",
                Field::num()
                    .with_alias("total")
                    .with_aggregation(Aggregation::Sum),
            )],
        );
        let value = encode_document(&doc);

        assert_eq!(
            value["select"]["fields"]["amount"],
            json!({
                "type": "num", "as": "total", "group_by": "sum", "order_by": "",
                "expression": "", "select": "", "custom_type": ""
            })
        );
        assert_eq!(value["select"]["table"], json!("orders"));
        assert_eq!(value["select"]["distinct"], json!(""));
        assert_eq!(value["select"]["limit"], json!(""));
    }

    #[test]
    fn test_encode_decode_join_round_trip() {
        let a = Document::from_table("a", [("id", Field::dim())]);
        let b = Document::from_table("b", [("id", Field::dim())]);
        let mut doc = Document::new(
            Relation::Join {
                parts: vec![a, b],
                join_types: vec![JoinKind::Cross],
                on: vec![OnClause::Cross],
            },
            [(
                "sq1.id".to_string(),
                Field::dim().with_alias("id").with_order(OrderDir::Desc),
            )]
            .into_iter()
            .collect(),
        );
        doc.distinct = true;
        doc.limit = Some(20);

        let value = encode_document(&doc);
        assert_eq!(value["select"]["join"]["on"], json!([0]));

        let decoded = decode_document(&value).unwrap();
        assert_eq!(decoded, doc);
    }
}
