//! Query documents and the SQL they render to.
//!
//! A [`Document`] describes one SELECT over a table, a subquery, a join or a
//! union. Documents are built from field lists, column metadata or JSON,
//! reshaped with fluent operators and rendered with [`Document::get_sql`].

pub mod algebra;
pub mod codec;
pub mod config;
pub mod document;
pub mod error;
pub mod ops;
pub mod query;
pub mod store;

pub use algebra::{UnionBy, join, union};
pub use config::PlannerConfig;
pub use document::{Document, Field, OnClause, Relation};
pub use error::QueryError;
pub use ops::{Assign, IfExists, LogicalOp, OneOrMany, RowCounter, Selection};
