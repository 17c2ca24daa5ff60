//! Error types for tile planning.

use thiserror::Error;

/// Contract violations detected before any query is built.
#[derive(Error, Debug)]
pub enum PlanError {
    #[error("Invalid tile edge: {0} (must be positive)")]
    InvalidEdge(i64),

    #[error("Tile bounds overflow: origin {origin} + edge {edge}")]
    BoundsOverflow { origin: i64, edge: i64 },

    #[error("Malformed descriptor on line {line}: {message}")]
    MalformedDescriptor { line: usize, message: String },

    #[error("Duplicate slice index {slice_index} at positions {positions:?}")]
    DuplicateSlice {
        slice_index: i64,
        positions: Vec<usize>,
    },

    #[error("Failed to read descriptor file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse YAML descriptors: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type for tile planning operations.
pub type Result<T> = std::result::Result<T, PlanError>;
