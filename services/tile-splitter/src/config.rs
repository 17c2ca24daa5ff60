//! Splitter configuration.
//!
//! Built once at startup: defaults, then an optional YAML file, then
//! `SPLITTER_*` environment variables, then command-line flags. The result
//! is passed into the runner; nothing reads global state after that.

use crate::error::{Result, SplitterError};
use scidb_client::{Backend, Dialect, Endpoint};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tile_plan::{SourceArray, TileEdge, DEFAULT_TARGET_PREFIX};

/// Tiles processed per run unless configured otherwise. The benchmark
/// staging run stops after slice 19.
pub const DEFAULT_MAX_TILES: usize = 20;

/// Top-level splitter configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitterConfig {
    /// SciDB coordinator (iquery) or shim address
    pub endpoint: Endpoint,

    /// Execution backend
    pub backend: Backend,

    /// Query language of the emitted queries
    pub dialect: Dialect,

    /// Tile edge length in cells, both axes
    pub tile_edge: TileEdge,

    /// Stop after this many descriptors; `null` processes all of them
    pub max_tiles: Option<usize>,

    /// Prefix of the stored array names (`<prefix>_<slice>`)
    pub target_prefix: String,

    /// Array being split
    pub source: SourceArray,

    /// Descriptor file; the built-in benchmark table when unset
    pub tiles: Option<PathBuf>,

    /// Refuse to run when two descriptors share a slice index
    pub strict_duplicates: bool,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            endpoint: Endpoint::default(),
            backend: Backend::default(),
            dialect: Dialect::Afl,
            tile_edge: TileEdge::default(),
            max_tiles: Some(DEFAULT_MAX_TILES),
            target_prefix: DEFAULT_TARGET_PREFIX.to_string(),
            source: SourceArray::default(),
            tiles: None,
            strict_duplicates: false,
        }
    }
}

impl SplitterConfig {
    /// Load configuration from a YAML file. Missing keys keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Apply `SPLITTER_*` overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply `SPLITTER_*` overrides from an arbitrary lookup.
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("SPLITTER_HOST") {
            self.endpoint.host = host;
        }
        if let Some(port) = lookup("SPLITTER_PORT") {
            self.endpoint.port = parse_env("SPLITTER_PORT", &port)?;
        }
        if let Some(backend) = lookup("SPLITTER_BACKEND") {
            self.backend = backend
                .parse()
                .map_err(|e| SplitterError::InvalidConfig(format!("SPLITTER_BACKEND: {}", e)))?;
        }
        if let Some(edge) = lookup("SPLITTER_TILE_EDGE") {
            self.tile_edge = TileEdge::new(parse_env("SPLITTER_TILE_EDGE", &edge)?)?;
        }
        if let Some(max) = lookup("SPLITTER_MAX_TILES") {
            self.max_tiles = match max.trim() {
                "all" | "" => None,
                n => Some(parse_env("SPLITTER_MAX_TILES", n)?),
            };
        }
        if let Some(tiles) = lookup("SPLITTER_TILES") {
            self.tiles = Some(PathBuf::from(tiles));
        }
        Ok(())
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<()> {
        if self.max_tiles == Some(0) {
            return Err(SplitterError::InvalidConfig(
                "max_tiles must be > 0 (use null to process every descriptor)".to_string(),
            ));
        }
        if self.target_prefix.is_empty() {
            return Err(SplitterError::InvalidConfig(
                "target_prefix must not be empty".to_string(),
            ));
        }
        if self.source.name.is_empty() {
            return Err(SplitterError::InvalidConfig(
                "source.name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_env<T>(key: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| SplitterError::InvalidConfig(format!("{}='{}': {}", key, value, e)))
}
