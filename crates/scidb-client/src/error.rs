//! Error types for query execution.

use thiserror::Error;

/// Errors raised by an execution backend.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Failed to connect to {endpoint}: {message}")]
    Connect { endpoint: String, message: String },

    #[error("Not connected")]
    NotConnected,

    #[error("Query failed: {message}")]
    Execution { query: String, message: String },

    #[error("{backend} backend does not support {dialect} queries")]
    UnsupportedDialect {
        backend: &'static str,
        dialect: &'static str,
    },

    #[error("Unknown backend: {0}")]
    UnknownBackend(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// True when the database itself rejected or failed the query.
    pub fn is_execution_failure(&self) -> bool {
        matches!(self, ClientError::Execution { .. })
    }
}

/// Result type for execution operations.
pub type Result<T> = std::result::Result<T, ClientError>;
