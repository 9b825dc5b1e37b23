//! Single-document composition operators.
//!
//! Every operator consumes the document and hands it back, so calls chain:
//!
//! ```ignore
//! let doc = doc.groupby(["region"])?.pick(["amount"]).agg(Aggregation::Sum)?;
//! ```
//!
//! Asking for a field that does not exist is not an error: it is logged with
//! `warn!` and skipped.

use crate::document::Document;
use tracing::warn;

pub mod fields;
pub mod filter;
pub mod paging;
pub mod select;

pub use fields::Assign;
pub use filter::{IfExists, LogicalOp};
pub use paging::RowCounter;
pub use select::Selection;

/// An argument that is either a single value or one value per item.
#[derive(Debug, Clone, PartialEq)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(value) => vec![value],
            OneOrMany::Many(values) => values,
        }
    }
}

impl<T> From<T> for OneOrMany<T> {
    fn from(value: T) -> Self {
        OneOrMany::One(value)
    }
}

impl<T> From<Vec<T>> for OneOrMany<T> {
    fn from(values: Vec<T>) -> Self {
        OneOrMany::Many(values)
    }
}

impl<T: Clone> From<&[T]> for OneOrMany<T> {
    fn from(values: &[T]) -> Self {
        OneOrMany::Many(values.to_vec())
    }
}

impl Document {
    /// Resolves each name to a field key, warning about the ones that match
    /// nothing.
    pub(crate) fn resolve_keys<I, S>(&self, names: I, operation: &str) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .filter_map(|name| {
                let name = name.as_ref();
                let key = self.resolve_key(name);
                if key.is_none() {
                    warn!("{}(): field '{}' not found, skipping", operation, name);
                }
                key
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_or_many_into_vec() {
        assert_eq!(OneOrMany::<bool>::from(true).into_vec(), vec![true]);
        assert_eq!(OneOrMany::<i32>::from(vec![1, 2]).into_vec(), vec![1, 2]);
        assert_eq!(OneOrMany::<&str>::from(&["a", "b"][..]).into_vec(), vec!["a", "b"]);
    }
}
