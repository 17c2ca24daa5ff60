//! The SS-DB `normal_obs` tile table.
//!
//! 400 anchors, one per observation cycle. Entries 200-399 reuse the
//! footprints of entries 0-199 under their own slice indices.

use crate::descriptor::{parse_descriptors, TileDescriptor};
use crate::error::Result;

/// Tile edge the benchmark table was generated for.
pub const SAMPLE_TILE_EDGE: i64 = 7500;

const NORMAL_OBS_TILES: &str = include_str!("../data/normal_obs_tiles.csv");

/// The built-in descriptor table, in submission order.
pub fn normal_obs_tiles() -> Result<Vec<TileDescriptor>> {
    parse_descriptors(NORMAL_OBS_TILES)
}
