//! Validates a serialized document and turns it into a typed [`Document`].
//!
//! Validation is structural only: nothing here checks that tables or columns
//! exist in a real database.

use crate::{
    codec::{ALLOWED_FIELD_ATTRIBUTES, DISTINCT_SENTINEL, EXCLUDED_SENTINEL},
    document::{Document, Field, FieldMap, OnClause, Relation},
    error::QueryError,
};
use model::core::{
    data_type::FieldType,
    kinds::{Aggregation, JoinKind, OrderDir, UnionKind},
    utils::{normalize_alias, subquery_name},
};
use serde_json::{Map, Value};

type Object = Map<String, Value>;

/// Decodes and validates a document tree rooted at `{"select": {...}}`.
pub fn decode_document(value: &Value) -> Result<Document, QueryError> {
    decode_at(value, "document")
}

fn decode_at(value: &Value, path: &str) -> Result<Document, QueryError> {
    let body = value
        .as_object()
        .and_then(|root| root.get("select"))
        .and_then(Value::as_object)
        .ok_or_else(|| QueryError::Structural(format!("{path}: missing 'select' block")))?;

    let fields = match body.get("fields") {
        Some(Value::Object(fields)) => decode_fields(fields, path)?,
        Some(_) => {
            return Err(QueryError::Structural(format!(
                "{path}: 'fields' must be an object"
            )));
        }
        None => {
            return Err(QueryError::Structural(format!(
                "{path}: missing field map"
            )));
        }
    };

    let relation = decode_relation(body, path)?;

    let mut doc = Document::new(relation, fields);
    doc.filter = optional_string(body, "where", path)?;
    doc.having = optional_string(body, "having", path)?;
    doc.distinct = decode_distinct(body, path)?;
    doc.offset = optional_integer(body, "offset", path)?;
    doc.limit = optional_integer(body, "limit", path)?;
    Ok(doc)
}

fn decode_relation(body: &Object, path: &str) -> Result<Relation, QueryError> {
    if let Some(block) = body.get("union") {
        let parts = decode_parts(body, path)?;
        let union_types = list_of(block, "union_type", path)?
            .iter()
            .map(|v| parse_keyword(v, "union_type", path, UnionKind::parse, UnionKind::VALID))
            .collect::<Result<Vec<_>, _>>()?;
        check_part_count(parts.len(), union_types.len(), "union_type", path)?;
        return Ok(Relation::Union { parts, union_types });
    }

    if let Some(block) = body.get("join") {
        let parts = decode_parts(body, path)?;
        let join_types = list_of(block, "join_type", path)?
            .iter()
            .map(|v| parse_keyword(v, "join_type", path, JoinKind::parse, JoinKind::VALID))
            .collect::<Result<Vec<_>, _>>()?;
        let on = list_of(block, "on", path)?
            .iter()
            .map(|v| decode_on_clause(v, path))
            .collect::<Result<Vec<_>, _>>()?;
        check_part_count(parts.len(), join_types.len(), "join_type", path)?;
        check_part_count(parts.len(), on.len(), "on", path)?;
        return Ok(Relation::Join {
            parts,
            join_types,
            on,
        });
    }

    if let Some(inner) = body.get("sq") {
        let inner = decode_at(inner, &format!("{path}.sq"))?;
        return Ok(Relation::Subquery(Box::new(inner)));
    }

    match optional_string(body, "table", path)? {
        Some(table) => Ok(Relation::Table {
            schema: optional_string(body, "schema", path)?,
            table,
        }),
        None => Err(QueryError::Structural(format!(
            "{path}: missing relation source; expected 'table', 'sq', 'join' or 'union'"
        ))),
    }
}

/// Collects `sq1..sqN`, which must be numbered contiguously from 1.
fn decode_parts(body: &Object, path: &str) -> Result<Vec<Document>, QueryError> {
    let mut parts = Vec::new();
    while let Some(part) = body.get(&subquery_name(parts.len() + 1)) {
        let part_path = format!("{path}.{}", subquery_name(parts.len() + 1));
        parts.push(decode_at(part, &part_path)?);
    }

    let numbered = body
        .keys()
        .filter(|key| {
            key.strip_prefix("sq")
                .is_some_and(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
        })
        .count();
    if numbered != parts.len() {
        return Err(QueryError::Structural(format!(
            "{path}: nested documents must be numbered sq1..sqN without gaps"
        )));
    }

    if parts.len() < 2 {
        return Err(QueryError::Structural(format!(
            "{path}: a join or union needs at least two nested documents, found {}",
            parts.len()
        )));
    }
    Ok(parts)
}

fn check_part_count(parts: usize, entries: usize, what: &str, path: &str) -> Result<(), QueryError> {
    if entries + 1 != parts {
        return Err(QueryError::Structural(format!(
            "{path}: {parts} nested documents require {} '{what}' entries, found {entries}",
            parts - 1
        )));
    }
    Ok(())
}

/// A list attribute of a join/union block; a single scalar counts as one entry.
fn list_of<'a>(block: &'a Value, key: &str, path: &str) -> Result<Vec<&'a Value>, QueryError> {
    match block.get(key) {
        Some(Value::Array(items)) => Ok(items.iter().collect()),
        Some(item) => Ok(vec![item]),
        None => Err(QueryError::Structural(format!(
            "{path}: missing '{key}' list"
        ))),
    }
}

fn parse_keyword<T>(
    value: &Value,
    attribute: &str,
    path: &str,
    parse: fn(&str) -> Option<T>,
    valid: &[&str],
) -> Result<T, QueryError> {
    value
        .as_str()
        .and_then(parse)
        .ok_or_else(|| QueryError::invalid_value(path, attribute, value.to_string(), valid))
}

fn decode_on_clause(value: &Value, path: &str) -> Result<OnClause, QueryError> {
    match value {
        Value::Number(n) if n.as_u64() == Some(0) => Ok(OnClause::Cross),
        Value::String(s) if s.trim() == "0" => Ok(OnClause::Cross),
        Value::String(s) if !s.trim().is_empty() => Ok(OnClause::Condition(s.trim().to_string())),
        other => Err(QueryError::InvalidValue {
            context: path.to_string(),
            attribute: "on".to_string(),
            value: other.to_string(),
            expected: "a join condition or 0 for no condition".to_string(),
        }),
    }
}

fn decode_fields(fields: &Object, path: &str) -> Result<FieldMap, QueryError> {
    fields
        .iter()
        .map(|(key, attrs)| {
            let context = format!("{path} field '{key}'");
            let attrs = attrs.as_object().ok_or_else(|| {
                QueryError::Structural(format!("{context}: attributes must be an object"))
            })?;
            Ok((key.clone(), decode_field(key, attrs, &context)?))
        })
        .collect()
}

fn decode_field(key: &str, attrs: &Object, context: &str) -> Result<Field, QueryError> {
    if let Some(unknown) = attrs
        .keys()
        .find(|k| !ALLOWED_FIELD_ATTRIBUTES.contains(&k.as_str()))
    {
        return Err(QueryError::invalid_value(
            context,
            "attribute key",
            unknown.clone(),
            ALLOWED_FIELD_ATTRIBUTES,
        ));
    }

    let custom_type = optional_string(attrs, "custom_type", context)?;
    let field_type = match optional_string(attrs, "type", context)? {
        Some(raw) => FieldType::parse(&raw)
            .ok_or_else(|| QueryError::invalid_value(context, "type", raw, FieldType::VALID))?,
        None => match &custom_type {
            Some(custom) => FieldType::from_native_type(custom),
            None => {
                return Err(QueryError::invalid_value(
                    context,
                    "type",
                    "<missing>",
                    FieldType::VALID,
                ));
            }
        },
    };

    let mut field = Field::new(field_type);
    field.custom_type = custom_type;
    field.alias = optional_string(attrs, "as", context)?.map(|a| normalize_alias(&a));
    field.expression = optional_string(attrs, "expression", context)?;

    if let Some(raw) = optional_string(attrs, "group_by", context)? {
        let aggregation = Aggregation::parse(&raw).ok_or_else(|| {
            QueryError::invalid_value(context, "group_by", raw, Aggregation::VALID)
        })?;
        field.aggregation = Some(aggregation);
    }

    if let Some(raw) = optional_string(attrs, "order_by", context)? {
        let order = OrderDir::parse(&raw)
            .ok_or_else(|| QueryError::invalid_value(context, "order_by", raw, OrderDir::VALID))?;
        field.order = Some(order);
    }

    match optional_string(attrs, "select", context)? {
        None => {}
        Some(raw) if raw == EXCLUDED_SENTINEL => field.included = false,
        Some(raw) => {
            return Err(QueryError::invalid_value(
                context,
                "select",
                raw,
                &[EXCLUDED_SENTINEL],
            ));
        }
    }

    field.check(key)?;
    Ok(field)
}

fn decode_distinct(body: &Object, path: &str) -> Result<bool, QueryError> {
    match optional_string(body, "distinct", path)? {
        None => Ok(false),
        Some(raw) if raw == DISTINCT_SENTINEL => Ok(true),
        Some(raw) => Err(QueryError::invalid_value(
            path,
            "distinct",
            raw,
            &[DISTINCT_SENTINEL],
        )),
    }
}

/// Reads a string attribute; a missing key or an empty string means unset.
/// Numbers are accepted and stringified.
fn optional_string(obj: &Object, key: &str, context: &str) -> Result<Option<String>, QueryError> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Ok(None)
            } else {
                Ok(Some(trimmed.to_string()))
            }
        }
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(QueryError::InvalidValue {
            context: context.to_string(),
            attribute: key.to_string(),
            value: other.to_string(),
            expected: "a string".to_string(),
        }),
    }
}

fn optional_integer(obj: &Object, key: &str, context: &str) -> Result<Option<u64>, QueryError> {
    let invalid = |value: String| QueryError::InvalidValue {
        context: context.to_string(),
        attribute: key.to_string(),
        value,
        expected: "a non-negative integer".to_string(),
    };

    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n.as_u64().map(Some).ok_or_else(|| invalid(n.to_string())),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| invalid(s.clone())),
        Some(other) => Err(invalid(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn table_doc(fields: Value) -> Value {
        json!({"select": {"table": "orders", "fields": fields}})
    }

    #[test]
    fn test_decode_table_document() {
        let value = json!({"select": {
            "table": "orders",
            "schema": "sales",
            "fields": {
                "order_id": {"type": "dim", "group_by": "group"},
                "amount": {"type": "num", "group_by": "sum", "as": "order total", "order_by": "desc"},
                "note": {"type": "dim", "select": "0"}
            },
            "where": "amount > 0",
            "distinct": "1",
            "offset": 5,
            "limit": "10"
        }});

        let doc = decode_document(&value).unwrap();

        assert!(matches!(
            doc.relation,
            Relation::Table { schema: Some(ref s), ref table } if s == "sales" && table == "orders"
        ));
        assert_eq!(doc.fields.len(), 3);
        assert_eq!(doc.fields["amount"].alias.as_deref(), Some("order_total"));
        assert_eq!(doc.fields["amount"].aggregation, Some(Aggregation::Sum));
        assert_eq!(doc.fields["amount"].order, Some(OrderDir::Desc));
        assert!(!doc.fields["note"].included);
        assert_eq!(doc.filter.as_deref(), Some("amount > 0"));
        assert!(doc.distinct);
        assert_eq!(doc.offset, Some(5));
        assert_eq!(doc.limit, Some(10));
    }

    #[test]
    fn test_missing_relation_source() {
        let value = json!({"select": {"fields": {}}});
        assert!(matches!(
            decode_document(&value),
            Err(QueryError::Structural(msg)) if msg.contains("missing relation source")
        ));
    }

    #[test]
    fn test_missing_field_map() {
        let value = json!({"select": {"table": "orders"}});
        assert!(matches!(
            decode_document(&value),
            Err(QueryError::Structural(msg)) if msg.contains("missing field map")
        ));
    }

    #[test]
    fn test_unknown_attribute_key() {
        let value = table_doc(json!({"id": {"type": "dim", "colour": "red"}}));
        assert!(matches!(
            decode_document(&value),
            Err(QueryError::InvalidValue { attribute, value, .. })
                if attribute == "attribute key" && value == "colour"
        ));
    }

    #[test]
    fn test_type_is_required_without_custom_type() {
        let value = table_doc(json!({"id": {"as": "identifier"}}));
        assert!(matches!(
            decode_document(&value),
            Err(QueryError::InvalidValue { attribute, .. }) if attribute == "type"
        ));

        let value = table_doc(json!({"id": {"custom_type": "BIGINT"}}));
        let doc = decode_document(&value).unwrap();
        assert_eq!(doc.fields["id"].field_type, FieldType::Num);
    }

    #[test]
    fn test_invalid_enum_values() {
        let cases = [
            (json!({"id": {"type": "text"}}), "type"),
            (json!({"id": {"type": "num", "group_by": "median"}}), "group_by"),
            (json!({"id": {"type": "num", "order_by": "up"}}), "order_by"),
            (json!({"id": {"type": "num", "select": "no"}}), "select"),
        ];

        for (fields, expected) in cases {
            match decode_document(&table_doc(fields)) {
                Err(QueryError::InvalidValue { attribute, .. }) => assert_eq!(attribute, expected),
                other => panic!("expected invalid {expected}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_aggregation_on_dim_is_rejected() {
        let value = table_doc(json!({"name": {"type": "dim", "group_by": "count"}}));
        assert!(matches!(
            decode_document(&value),
            Err(QueryError::AggregationOnNonNumeric { field, .. }) if field == "name"
        ));
    }

    #[test]
    fn test_invalid_distinct_and_limit() {
        let value = json!({"select": {"table": "t", "fields": {}, "distinct": "yes"}});
        assert!(matches!(
            decode_document(&value),
            Err(QueryError::InvalidValue { attribute, .. }) if attribute == "distinct"
        ));

        let value = json!({"select": {"table": "t", "fields": {}, "limit": "ten"}});
        assert!(matches!(
            decode_document(&value),
            Err(QueryError::InvalidValue { attribute, .. }) if attribute == "limit"
        ));

        let value = json!({"select": {"table": "t", "fields": {}, "offset": -1}});
        assert!(matches!(
            decode_document(&value),
            Err(QueryError::InvalidValue { attribute, .. }) if attribute == "offset"
        ));
    }

    #[test]
    fn test_decode_join_with_scalar_metadata() {
        let value = json!({"select": {
            "fields": {
                "sq1.id": {"type": "dim", "as": "id"},
                "sq2.amount": {"type": "num", "as": "amount"}
            },
            "sq1": table_doc(json!({"id": {"type": "dim"}})),
            "sq2": {"select": {"table": "payments", "fields": {"amount": {"type": "num"}}}},
            "join": {"join_type": "left join", "on": "sq1.id = sq2.id"}
        }});

        let doc = decode_document(&value).unwrap();
        match &doc.relation {
            Relation::Join { parts, join_types, on } => {
                assert_eq!(parts.len(), 2);
                assert_eq!(join_types, &vec![JoinKind::Left]);
                assert_eq!(on, &vec![OnClause::on("sq1.id = sq2.id")]);
            }
            other => panic!("expected join, got {other:?}"),
        }
    }

    #[test]
    fn test_join_metadata_length_mismatch() {
        let value = json!({"select": {
            "fields": {},
            "sq1": table_doc(json!({"id": {"type": "dim"}})),
            "sq2": table_doc(json!({"id": {"type": "dim"}})),
            "join": {"join_type": ["left join", "inner join"], "on": [0, 0]}
        }});
        assert!(matches!(
            decode_document(&value),
            Err(QueryError::Structural(msg)) if msg.contains("join_type")
        ));
    }

    #[test]
    fn test_nested_errors_carry_path() {
        let value = json!({"select": {
            "fields": {"sq.id": {"type": "dim"}},
            "sq": {"select": {"table": "t", "fields": {"id": {"type": "bogus"}}}}
        }});
        match decode_document(&value) {
            Err(QueryError::InvalidValue { context, .. }) => {
                assert!(context.starts_with("document.sq field 'id'"))
            }
            other => panic!("unexpected result {other:?}"),
        }
    }
}
