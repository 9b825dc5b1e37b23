use crate::{config::PlannerConfig, document::Document, error::QueryError};
use model::core::kinds::OrderDir;
use std::fmt::Display;
use tracing::{debug, info};

/// Runs a row-count probe against the engine a document targets.
pub trait RowCounter {
    type Error: Display;

    fn count_rows(&mut self, sql: &str, engine: Option<&str>) -> Result<u64, Self::Error>;
}

impl<F, E> RowCounter for F
where
    F: FnMut(&str, Option<&str>) -> Result<u64, E>,
    E: Display,
{
    type Error = E;

    fn count_rows(&mut self, sql: &str, engine: Option<&str>) -> Result<u64, E> {
        self(sql, engine)
    }
}

impl Document {
    /// Copy of the document restricted to `limit` rows starting at `offset`.
    ///
    /// When `deterministic`, every included field without a direction is
    /// sorted ascending so consecutive windows never overlap.
    pub fn window(&self, offset: u64, limit: u64, deterministic: bool) -> Document {
        let mut doc = self.clone();
        if deterministic {
            for field in doc.fields.values_mut().filter(|f| f.included) {
                field.order.get_or_insert(OrderDir::Asc);
            }
        }
        doc.offset = Some(offset);
        doc.limit = Some(limit);
        doc
    }

    /// Splits `row_count` rows into windows of `chunk_size` rows.
    pub fn cut(
        &self,
        row_count: u64,
        chunk_size: u64,
        deterministic: bool,
    ) -> Result<Vec<Document>, QueryError> {
        if chunk_size == 0 {
            return Err(QueryError::Semantic(
                "cut() needs a chunk size greater than zero".to_string(),
            ));
        }

        let windows: Vec<Document> = (0..row_count)
            .step_by(chunk_size as usize)
            .map(|offset| self.window(offset, chunk_size, deterministic))
            .collect();

        debug!("Cut {} rows into {} windows", row_count, windows.len());
        Ok(windows)
    }

    /// Like [`Document::cut`], asking `counter` for the row count first.
    pub fn cut_with<C: RowCounter>(
        &self,
        counter: &mut C,
        chunk_size: u64,
        deterministic: bool,
    ) -> Result<Vec<Document>, QueryError> {
        let sql = self.count_sql_with(&PlannerConfig::compact())?;
        let row_count = counter
            .count_rows(&sql, self.engine.as_deref())
            .map_err(|e| QueryError::RowCount(e.to_string()))?;

        info!("Row count probe returned {} rows", row_count);
        self.cut(row_count, chunk_size, deterministic)
    }
}
