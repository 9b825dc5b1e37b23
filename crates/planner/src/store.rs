//! A JSON file holding named documents.
//!
//! The file is a single object mapping names to serialized documents. Saving
//! rewrites the whole file with the one entry inserted or replaced.

use crate::{document::Document, error::QueryError};
use serde_json::{Map, Value};
use std::{fs, path::Path};
use tracing::{debug, info};

fn load_entries(path: &Path) -> Result<Map<String, Value>, QueryError> {
    if !path.exists() {
        return Ok(Map::new());
    }

    let text = fs::read_to_string(path)?;
    if text.trim().is_empty() {
        return Ok(Map::new());
    }

    match serde_json::from_str(&text)? {
        Value::Object(entries) => Ok(entries),
        _ => Err(QueryError::Structural(format!(
            "store file {} must hold a JSON object",
            path.display()
        ))),
    }
}

impl Document {
    /// Stores the document under `name` in the file at `path`, creating the
    /// file when needed.
    pub fn save_json(&self, path: impl AsRef<Path>, name: &str) -> Result<(), QueryError> {
        let path = path.as_ref();
        let mut entries = load_entries(path)?;
        let replaced = entries.insert(name.to_string(), self.to_json()).is_some();

        fs::write(path, serde_json::to_string_pretty(&Value::Object(entries))?)?;

        if replaced {
            debug!("Replaced document '{}' in {}", name, path.display());
        } else {
            info!("Saved document '{}' to {}", name, path.display());
        }
        Ok(())
    }

    /// Loads and validates the document stored under `name`.
    pub fn read_json(path: impl AsRef<Path>, name: &str) -> Result<Self, QueryError> {
        let path = path.as_ref();
        let entries = load_entries(path)?;
        let value = entries
            .get(name)
            .ok_or_else(|| QueryError::NotFound(name.to_string()))?;
        Document::from_json(value)
    }

    /// Names of the documents stored in the file at `path`.
    pub fn stored_names(path: impl AsRef<Path>) -> Result<Vec<String>, QueryError> {
        Ok(load_entries(path.as_ref())?.keys().cloned().collect())
    }
}
