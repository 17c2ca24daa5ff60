//! Tile splitter service.
//!
//! Splits the SS-DB `normal_obs` array into per-slice tile arrays by
//! submitting one `store(reshape(slice(...)))` query per tile descriptor.

pub mod config;
pub mod error;
pub mod runner;

pub use config::{SplitterConfig, DEFAULT_MAX_TILES};
pub use error::{Result, SplitterError};
pub use runner::{DuplicateReport, PlannedTile, RunSummary, TileSplitter};

use tile_plan::TileDescriptor;
use tracing::info;

/// Load the descriptors named by the config, or the built-in table.
pub fn load_tiles(config: &SplitterConfig) -> Result<Vec<TileDescriptor>> {
    let tiles = match &config.tiles {
        Some(path) => tile_plan::load_descriptors(path)?,
        None => tile_plan::normal_obs_tiles()?,
    };
    let origin = config
        .tiles
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "built-in".to_string());
    info!(count = tiles.len(), origin = %origin, "Loaded tile descriptors");
    Ok(tiles)
}
