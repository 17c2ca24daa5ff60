//! Error types for the splitter service.

use scidb_client::ClientError;
use thiserror::Error;
use tile_plan::PlanError;

/// Errors that end a split run.
#[derive(Error, Debug)]
pub enum SplitterError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to read configuration: {0}")]
    ConfigRead(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error("Failed to open session: {0}")]
    Session(#[source] ClientError),

    #[error("Tile {slice_index} ({target}) failed after {stored} stored tile(s): {source}")]
    TileFailed {
        position: usize,
        slice_index: i64,
        target: String,
        stored: usize,
        #[source]
        source: ClientError,
    },

    #[error("Failed to close session: {0}")]
    Disconnect(#[source] ClientError),
}

/// Result type for splitter operations.
pub type Result<T> = std::result::Result<T, SplitterError>;
