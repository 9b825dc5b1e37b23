use crate::{
    document::{Document, OnClause, Relation},
    query::{
        columns::ColumnStrings,
        renderer::{Render, Renderer},
    },
};
use model::core::{kinds::UnionKind, utils::subquery_name};

impl Render for Document {
    fn render(&self, r: &mut Renderer) {
        let columns = ColumnStrings::build_unchecked(&self.fields, r.config);

        match &self.relation {
            Relation::Union { parts, union_types } => render_union(parts, union_types, r),
            relation => {
                render_select(self, &columns, r);
                render_from(relation, r);
                render_filters(self, &columns, r);
            }
        }

        render_tail(self, &columns, r);
    }
}

fn render_union(parts: &[Document], union_types: &[UnionKind], r: &mut Renderer) {
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            let Some(union_type) = union_types.get(i - 1) else {
                break;
            };
            r.sql.push(' ');
            r.sql.push_str(union_type.as_str());
            r.sql.push(' ');
        }
        render_union_part(part, i + 1, r);
    }
}

/// Nested unions and parts with their own ordering or paging are selected
/// from a subquery so they keep their grouping inside the outer union.
fn render_union_part(part: &Document, position: usize, r: &mut Renderer) {
    if !needs_wrapping(part) {
        part.render(r);
        return;
    }

    r.sql.push_str("SELECT ");
    r.push_list(&part.get_fields(true));
    r.sql.push_str(" FROM ");
    r.push_subquery(part);
    r.sql.push(' ');
    r.sql.push_str(&subquery_name(position));
}

fn needs_wrapping(part: &Document) -> bool {
    part.is_union()
        || part.offset.is_some()
        || part.limit.is_some()
        || part
            .fields
            .values()
            .any(|field| field.included && field.order.is_some())
}

fn render_select(doc: &Document, columns: &ColumnStrings, r: &mut Renderer) {
    r.sql.push_str("SELECT ");
    if doc.distinct {
        r.sql.push_str("DISTINCT ");
    }
    r.push_list(&columns.select_exprs);
}

fn render_from(relation: &Relation, r: &mut Renderer) {
    r.sql.push_str(" FROM ");
    match relation {
        Relation::Table { schema, table } => {
            if let Some(schema) = schema {
                r.sql.push_str(schema);
                r.sql.push('.');
            }
            r.sql.push_str(table);
        }
        Relation::Subquery(inner) => {
            r.push_subquery(inner.as_ref());
            r.sql.push_str(" sq");
        }
        Relation::Join {
            parts,
            join_types,
            on,
        } => {
            for (i, part) in parts.iter().enumerate() {
                if i > 0 {
                    r.sql.push(' ');
                    if let Some(join_type) = join_types.get(i - 1) {
                        r.sql.push_str(join_type.as_str());
                        r.sql.push(' ');
                    }
                }
                r.push_subquery(part);
                r.sql.push(' ');
                r.sql.push_str(&subquery_name(i + 1));
                if i > 0 {
                    if let Some(OnClause::Condition(condition)) = on.get(i - 1) {
                        r.sql.push_str(" ON ");
                        r.sql.push_str(condition);
                    }
                }
            }
        }
        Relation::Union { .. } => {}
    }
}

fn render_filters(doc: &Document, columns: &ColumnStrings, r: &mut Renderer) {
    if let Some(filter) = &doc.filter {
        r.sql.push_str(" WHERE ");
        r.sql.push_str(filter);
    }

    if !columns.group_dimensions.is_empty() {
        r.sql.push_str(" GROUP BY ");
        r.push_list(&columns.group_dimensions);
    }

    if let Some(having) = &doc.having {
        r.sql.push_str(" HAVING ");
        r.sql.push_str(having);
    }
}

fn render_tail(doc: &Document, columns: &ColumnStrings, r: &mut Renderer) {
    if !columns.order_by.is_empty() {
        r.sql.push_str(" ORDER BY ");
        r.push_list(&columns.order_by);
    }

    if let Some(offset) = doc.offset {
        r.sql.push_str(&format!(" OFFSET {offset}"));
    }

    if let Some(limit) = doc.limit {
        r.sql.push_str(&format!(" LIMIT {limit}"));
    }
}
