use crate::document::{Document, Field, FieldMap, Relation};
use model::metadata::column::ColumnMetadata;
use tracing::debug;

impl Document {
    /// Seeds a base-table document from column metadata reported by a
    /// collaborator. Numeric native types become `num`, all others `dim`, and
    /// the native type is kept as the field's custom type.
    pub fn from_columns(schema: Option<&str>, table: &str, columns: &[ColumnMetadata]) -> Self {
        let fields: FieldMap = columns
            .iter()
            .map(|column| {
                let field = Field::new(column.field_type()).with_custom_type(&column.data_type);
                (column.name.clone(), field)
            })
            .collect();

        debug!(
            "Seeded document for {} with {} columns",
            table,
            fields.len()
        );

        Document::new(
            Relation::Table {
                schema: schema.map(String::from),
                table: table.to_string(),
            },
            fields,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::core::data_type::FieldType;

    #[test]
    fn test_from_columns_classifies_types() {
        let columns = vec![
            ColumnMetadata::new("id", "bigint"),
            ColumnMetadata::new("name", "character varying(255)"),
            ColumnMetadata::new("price", "numeric(12,2)"),
        ];

        let doc = Document::from_columns(Some("shop"), "products", &columns);

        assert_eq!(doc.fields.len(), 3);
        assert_eq!(doc.fields["id"].field_type, FieldType::Num);
        assert_eq!(doc.fields["name"].field_type, FieldType::Dim);
        assert_eq!(doc.fields["price"].field_type, FieldType::Num);
        assert_eq!(
            doc.fields["price"].custom_type.as_deref(),
            Some("numeric(12,2)")
        );
        assert!(matches!(
            doc.relation,
            Relation::Table { schema: Some(ref s), ref table } if s == "shop" && table == "products"
        ));
    }
}
