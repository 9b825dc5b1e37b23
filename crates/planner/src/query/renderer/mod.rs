//! Defines the core rendering trait and context for converting documents to SQL.

use crate::{config::PlannerConfig, query::format::format_sql};

pub mod document;

/// A trait for anything that can be rendered into a SQL string.
pub trait Render {
    fn render(&self, renderer: &mut Renderer);
}

/// A context that holds the state during the rendering process.
///
/// It accumulates the SQL string and gives access to the planner settings.
pub struct Renderer<'a> {
    pub sql: String,
    pub config: &'a PlannerConfig,
}

impl<'a> Renderer<'a> {
    pub fn new(config: &'a PlannerConfig) -> Self {
        Self {
            sql: String::new(),
            config,
        }
    }

    /// Consumes the renderer and returns the final SQL string, formatted when
    /// the configuration asks for it.
    pub fn finish(self) -> String {
        if self.config.pretty {
            format_sql(&self.sql, self.config.indent)
        } else {
            self.sql
        }
    }

    pub fn push_list(&mut self, items: &[String]) {
        self.sql.push_str(&items.join(", "));
    }

    /// Renders `node` wrapped in parentheses, as a subquery.
    pub fn push_subquery(&mut self, node: &dyn Render) {
        self.sql.push('(');
        node.render(self);
        self.sql.push(')');
    }
}
