//! CLI error types.

use thiserror::Error;

use crate::api;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Errors surfaced to the terminal
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Query(#[from] api::Error),

    #[error("unknown encoding label: {0}")]
    UnknownEncoding(String),

    #[error("failed to serialize row: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
