use crate::{
    algebra::{check_inputs, join::projected},
    config::PlannerConfig,
    document::{Document, FieldMap, Relation},
    error::QueryError,
    ops::OneOrMany,
};
use model::core::kinds::UnionKind;
use std::collections::HashSet;

/// How the columns of union inputs are matched up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnionBy {
    /// Column i of every input lines up; declared types must agree.
    #[default]
    Position,
    /// Inputs must expose the same aliases and are reordered to match the
    /// first input.
    Name,
}

/// Stacks `documents` with `UNION` / `UNION ALL`.
pub fn union(
    documents: &[Document],
    union_types: impl Into<OneOrMany<UnionKind>>,
    union_by: UnionBy,
) -> Result<Document, QueryError> {
    let union_types = union_types.into().into_vec();
    check_inputs("union", documents, &[("union type", union_types.len())])?;

    let first = &documents[0];
    let first_aliases = first.get_fields(true);
    for (i, doc) in documents.iter().enumerate().skip(1) {
        let count = doc.get_fields(true).len();
        if count != first_aliases.len() {
            return Err(QueryError::Composition(format!(
                "union() inputs differ in column count: document 1 has {}, document {} has {}",
                first_aliases.len(),
                i + 1,
                count
            )));
        }
    }

    let parts = match union_by {
        UnionBy::Position => {
            check_positional_types(documents)?;
            documents.to_vec()
        }
        UnionBy::Name => documents
            .iter()
            .enumerate()
            .map(|(i, doc)| align_by_name(doc, &first_aliases, i + 1))
            .collect::<Result<Vec<_>, _>>()?,
    };

    let fields: FieldMap = first
        .fields
        .iter()
        .filter(|(_, field)| field.included)
        .map(|(key, field)| {
            let alias = field.alias_for(key);
            let mut outer = projected(field, &alias);
            outer.alias = None;
            (alias, outer)
        })
        .collect();

    let mut stacked = Document::new(Relation::Union { parts, union_types }, fields);
    stacked.engine = first.engine.clone();
    Ok(stacked)
}

fn check_positional_types(documents: &[Document]) -> Result<(), QueryError> {
    let config = PlannerConfig::default();
    let first = documents[0].columns_with(&config)?;

    for (i, doc) in documents.iter().enumerate().skip(1) {
        let columns = doc.columns_with(&config)?;
        let mismatch = first
            .sql_types
            .iter()
            .zip(&columns.sql_types)
            .position(|(a, b)| a != b);

        if let Some(pos) = mismatch {
            return Err(QueryError::Composition(format!(
                "union() type mismatch at position {}: '{}' is {} in document 1 but '{}' is {} in document {}",
                pos + 1,
                first.select_aliases[pos],
                first.sql_types[pos],
                columns.select_aliases[pos],
                columns.sql_types[pos],
                i + 1
            )));
        }
    }
    Ok(())
}

/// Copy of `doc` with its fields in the order of `aliases`.
fn align_by_name(doc: &Document, aliases: &[String], position: usize) -> Result<Document, QueryError> {
    let own = doc.get_fields(true);
    let expected: HashSet<&String> = aliases.iter().collect();
    let actual: HashSet<&String> = own.iter().collect();

    if expected != actual {
        let mut missing: Vec<&&String> = expected.difference(&actual).collect();
        let mut extra: Vec<&&String> = actual.difference(&expected).collect();
        missing.sort();
        extra.sort();
        return Err(QueryError::Composition(format!(
            "union() by name: document {position} is missing {missing:?} and has extra {extra:?}"
        )));
    }

    // match on the output alias only; a key may equal another field's alias
    let mut order: Vec<String> = aliases
        .iter()
        .filter_map(|alias| {
            doc.fields
                .iter()
                .find(|(key, field)| field.included && field.alias_for(key) == *alias)
                .map(|(key, _)| key.clone())
        })
        .collect();
    // excluded fields keep their relative order at the end
    order.extend(
        doc.fields
            .iter()
            .filter(|(_, field)| !field.included)
            .map(|(key, _)| key.clone()),
    );
    doc.clone().rearrange(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Field;

    fn eu() -> Document {
        Document::from_table(
            "sales_eu",
            [("region", Field::dim()), ("amount", Field::num())],
        )
    }

    fn us() -> Document {
        Document::from_table(
            "sales_us",
            [("amount", Field::num()), ("region", Field::dim())],
        )
    }

    #[test]
    fn test_union_by_position_checks_types() {
        let err = union(&[eu(), us()], UnionKind::UnionAll, UnionBy::Position).unwrap_err();
        match err {
            QueryError::Composition(msg) => {
                assert!(msg.contains("position 1"));
                assert!(msg.contains("'region' is VARCHAR(500)"));
                assert!(msg.contains("'amount' is FLOAT(53)"));
            }
            other => panic!("unexpected error {other:?}"),
        }

        let doc = union(&[eu(), eu()], UnionKind::Union, UnionBy::default()).unwrap();
        assert!(doc.is_union());
        assert_eq!(doc.get_fields(true), vec!["region", "amount"]);
    }

    #[test]
    fn test_union_by_name_reorders_inputs() {
        let doc = union(&[eu(), us()], UnionKind::UnionAll, UnionBy::Name).unwrap();
        assert_eq!(doc.parts()[1].get_fields(true), vec!["region", "amount"]);
        assert_eq!(
            doc.get_sql_with(&PlannerConfig::compact()).unwrap(),
            "SELECT region, amount FROM sales_eu UNION ALL SELECT region, amount FROM sales_us"
        );
    }

    #[test]
    fn test_union_by_name_matches_aliases_not_keys() {
        let a = Document::from_table("a", [("x", Field::dim()), ("y", Field::num())]);
        let b = Document::from_table(
            "b",
            [
                ("x", Field::num().with_alias("y")),
                ("y", Field::dim().with_alias("x")),
            ],
        );

        let doc = union(&[a, b], UnionKind::UnionAll, UnionBy::Name).unwrap();
        assert_eq!(doc.parts()[1].get_fields(false), vec!["y", "x"]);
        assert_eq!(doc.parts()[1].get_fields(true), vec!["x", "y"]);
    }

    #[test]
    fn test_union_by_name_reports_missing_aliases() {
        let other = Document::from_table(
            "sales_apac",
            [("area", Field::dim()), ("amount", Field::num())],
        );
        let err = union(&[eu(), other], UnionKind::Union, UnionBy::Name).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("missing [\"region\"]"));
        assert!(msg.contains("extra [\"area\"]"));
    }

    #[test]
    fn test_union_column_count_mismatch() {
        let wide = Document::from_table(
            "sales_wide",
            [
                ("region", Field::dim()),
                ("amount", Field::num()),
                ("year", Field::num()),
            ],
        );
        let err = union(&[wide, eu()], UnionKind::Union, UnionBy::Position).unwrap_err();
        assert!(matches!(err, QueryError::Composition(ref msg) if msg.contains("column count")));
    }

    #[test]
    fn test_union_result_skips_excluded_fields() {
        let with_hidden = Document::from_table(
            "sales_eu",
            [
                ("region", Field::dim()),
                ("amount", Field::num()),
                ("note", Field::dim().excluded()),
            ],
        );
        let doc = union(&[with_hidden, eu()], UnionKind::Union, UnionBy::Name).unwrap();
        assert_eq!(doc.fields.keys().collect::<Vec<_>>(), vec!["region", "amount"]);
    }
}
