use crate::{
    algebra::check_inputs,
    document::{Document, Field, FieldMap, OnClause, Relation},
    error::QueryError,
    ops::OneOrMany,
};
use model::core::{kinds::JoinKind, utils::subquery_name};
use std::collections::HashSet;
use tracing::debug;

/// Joins `documents` left to right as `sq1..sqN`.
///
/// `join_types` and `on` hold one entry per document after the first; a
/// two-document join may pass single values. With `unique_columns`, an
/// output alias already taken by an earlier input is not projected again.
pub fn join(
    documents: &[Document],
    join_types: impl Into<OneOrMany<JoinKind>>,
    on: impl Into<OneOrMany<OnClause>>,
    unique_columns: bool,
) -> Result<Document, QueryError> {
    let join_types = join_types.into().into_vec();
    let on = on.into().into_vec();
    check_inputs(
        "join",
        documents,
        &[("join type", join_types.len()), ("on clause", on.len())],
    )?;
    check_conditions(&join_types, &on)?;

    let mut fields = FieldMap::new();
    let mut seen = HashSet::new();
    for (i, doc) in documents.iter().enumerate() {
        doc.check_own_aliases()?;
        let qualifier = subquery_name(i + 1);

        for (key, field) in doc.fields.iter().filter(|(_, f)| f.included) {
            let alias = field.alias_for(key);
            if !seen.insert(alias.clone()) && unique_columns {
                debug!("join(): column '{}' of {} already projected", alias, qualifier);
                continue;
            }
            fields.insert(format!("{qualifier}.{alias}"), projected(field, &alias));
        }
    }

    let mut joined = Document::new(
        Relation::Join {
            parts: documents.to_vec(),
            join_types,
            on,
        },
        fields,
    );
    joined.engine = documents[0].engine.clone();
    Ok(joined)
}

/// A cross join takes no condition and every other join needs one.
fn check_conditions(join_types: &[JoinKind], on: &[OnClause]) -> Result<(), QueryError> {
    for (i, (join_type, clause)) in join_types.iter().zip(on).enumerate() {
        let is_cross = *join_type == JoinKind::Cross;
        if is_cross != matches!(clause, OnClause::Cross) {
            return Err(QueryError::Composition(format!(
                "join() input {}: {} {}",
                i + 2,
                join_type,
                if is_cross {
                    "does not take an ON condition"
                } else {
                    "needs an ON condition"
                }
            )));
        }
    }
    Ok(())
}

/// The outer field that exposes an inner column under `alias`.
pub(crate) fn projected(inner: &Field, alias: &str) -> Field {
    let mut field = Field::new(inner.field_type).with_alias(alias);
    field.custom_type = inner.custom_type.clone();
    field
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customers() -> Document {
        Document::from_table(
            "customers",
            [("id", Field::dim()), ("name", Field::dim())],
        )
    }

    fn orders() -> Document {
        Document::from_table(
            "orders",
            [
                ("id", Field::dim()),
                ("customer_id", Field::dim()),
                ("amount", Field::num().with_custom_type("NUMERIC(12,2)")),
            ],
        )
    }

    #[test]
    fn test_join_projects_qualified_columns() {
        let doc = join(
            &[customers(), orders()],
            JoinKind::Left,
            OnClause::on("sq1.id = sq2.customer_id"),
            true,
        )
        .unwrap();

        assert_eq!(
            doc.fields.keys().collect::<Vec<_>>(),
            vec!["sq1.id", "sq1.name", "sq2.customer_id", "sq2.amount"]
        );
        assert_eq!(
            doc.fields["sq2.amount"].custom_type.as_deref(),
            Some("NUMERIC(12,2)")
        );
        assert_eq!(doc.parts().len(), 2);
    }

    #[test]
    fn test_join_without_unique_columns_keeps_collisions() {
        let doc = join(
            &[customers(), orders()],
            JoinKind::Inner,
            OnClause::on("sq1.id = sq2.customer_id"),
            false,
        )
        .unwrap();

        assert!(doc.fields.contains_key("sq2.id"));
        assert!(matches!(doc.get_sql(), Err(QueryError::DuplicateAlias(_))));
    }

    #[test]
    fn test_join_checks_metadata_lengths() {
        let err = join(
            &[customers(), orders(), orders()],
            vec![JoinKind::Left],
            vec![OnClause::Cross],
            true,
        )
        .unwrap_err();
        assert!(matches!(err, QueryError::Composition(ref msg) if msg.contains("join type")));

        let err = join(&[customers()], Vec::<JoinKind>::new(), Vec::<OnClause>::new(), true).unwrap_err();
        assert!(matches!(err, QueryError::Composition(_)));
    }

    #[test]
    fn test_join_kind_must_agree_with_condition() {
        let err = join(
            &[customers(), orders()],
            JoinKind::Cross,
            OnClause::on("sq1.id = sq2.customer_id"),
            true,
        )
        .unwrap_err();
        assert!(matches!(err, QueryError::Composition(ref msg) if msg.contains("does not take")));

        let err = join(&[customers(), orders()], JoinKind::Left, OnClause::Cross, true).unwrap_err();
        assert!(matches!(err, QueryError::Composition(ref msg) if msg.contains("needs an ON")));
    }

    #[test]
    fn test_join_requires_single_engine() {
        let err = join(
            &[customers().with_engine("pg"), orders().with_engine("mysql")],
            JoinKind::Inner,
            OnClause::Cross,
            true,
        )
        .unwrap_err();
        assert!(err.to_string().contains("different engines"));
    }
}
