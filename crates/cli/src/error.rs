use planner::QueryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to read the document file: {0}")]
    DocumentRead(#[from] std::io::Error),

    #[error("Invalid query document: {0}")]
    Query(#[from] QueryError),

    #[error("Failed to serialize data to JSON: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}
