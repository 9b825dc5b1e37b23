//! Composition of several documents into one: joins and unions.
//!
//! Inputs are cloned into the result, so the caller keeps ownership of the
//! documents it passed in.

use crate::{document::Document, error::QueryError};

pub mod join;
pub mod union;

pub use join::join;
pub use union::{UnionBy, union};

/// Common preconditions of every composition: enough inputs, one metadata
/// entry per input after the first, and a single execution target.
pub(crate) fn check_inputs(
    operation: &str,
    documents: &[Document],
    metadata: &[(&str, usize)],
) -> Result<(), QueryError> {
    if documents.len() < 2 {
        return Err(QueryError::Composition(format!(
            "{operation}() needs at least two documents, got {}",
            documents.len()
        )));
    }

    for (name, len) in metadata {
        if len + 1 != documents.len() {
            return Err(QueryError::Composition(format!(
                "{operation}() of {} documents needs {} {name} entries, got {len}",
                documents.len(),
                documents.len() - 1
            )));
        }
    }

    let engine = &documents[0].engine;
    if let Some((i, other)) = documents
        .iter()
        .enumerate()
        .find(|(_, doc)| &doc.engine != engine)
    {
        return Err(QueryError::Composition(format!(
            "{operation}() inputs target different engines: document 1 has {:?}, document {} has {:?}",
            engine,
            i + 1,
            other.engine
        )));
    }

    Ok(())
}
