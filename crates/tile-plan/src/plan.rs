//! Tile plan computation.
//!
//! A plan carries the exact inclusive bounds of one tile in the destination
//! array. SciDB dimension ranges `lo:hi` are closed on both ends, so a tile
//! of edge `n` anchored at `x` spans `x:x+n-1`. Getting this off by one
//! silently produces mis-cropped tiles.

use crate::descriptor::TileDescriptor;
use crate::error::{PlanError, Result};
use crate::sample::SAMPLE_TILE_EDGE;
use serde::{Deserialize, Serialize};

/// Name prefix of the stored tile arrays.
pub const DEFAULT_TARGET_PREFIX: &str = "normal_obs";

/// Chunk overlap of every destination array. Tiles share no boundary data.
pub const CHUNK_OVERLAP: i64 = 0;

/// Tile edge length in cells. Always strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct TileEdge(i64);

impl TileEdge {
    pub fn new(edge: i64) -> Result<Self> {
        if edge <= 0 {
            return Err(PlanError::InvalidEdge(edge));
        }
        Ok(Self(edge))
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl Default for TileEdge {
    /// The benchmark edge, 7500 cells.
    fn default() -> Self {
        Self(SAMPLE_TILE_EDGE)
    }
}

impl TryFrom<i64> for TileEdge {
    type Error = PlanError;

    fn try_from(edge: i64) -> Result<Self> {
        Self::new(edge)
    }
}

impl From<TileEdge> for i64 {
    fn from(edge: TileEdge) -> i64 {
        edge.0
    }
}

/// Bounds, chunking and target name for one tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TilePlan {
    pub lower_x: i64,
    pub upper_x: i64,
    /// Chunk length along X
    pub edge_x: i64,
    pub lower_y: i64,
    pub upper_y: i64,
    /// Chunk length along Y
    pub edge_y: i64,
    pub slice_index: i64,
    pub target_array_name: String,
}

impl TilePlan {
    /// Replace the `normal_obs` prefix of the stored array name.
    pub fn with_target_prefix(mut self, prefix: &str) -> Self {
        self.target_array_name = target_name(prefix, self.slice_index);
        self
    }

    pub fn width(&self) -> i64 {
        self.upper_x - self.lower_x + 1
    }

    pub fn height(&self) -> i64 {
        self.upper_y - self.lower_y + 1
    }

    pub fn cell_count(&self) -> i64 {
        self.width() * self.height()
    }
}

/// Stored array name for a slice index.
pub fn target_name(prefix: &str, slice_index: i64) -> String {
    format!("{}_{}", prefix, slice_index)
}

fn inclusive_upper(origin: i64, edge: TileEdge) -> Result<i64> {
    origin
        .checked_add(edge.get() - 1)
        .ok_or(PlanError::BoundsOverflow {
            origin,
            edge: edge.get(),
        })
}

/// Compute the plan for one descriptor.
pub fn compute_plan(descriptor: &TileDescriptor, edge: TileEdge) -> Result<TilePlan> {
    Ok(TilePlan {
        lower_x: descriptor.origin_x,
        upper_x: inclusive_upper(descriptor.origin_x, edge)?,
        edge_x: edge.get(),
        lower_y: descriptor.origin_y,
        upper_y: inclusive_upper(descriptor.origin_y, edge)?,
        edge_y: edge.get(),
        slice_index: descriptor.slice_index,
        target_array_name: target_name(DEFAULT_TARGET_PREFIX, descriptor.slice_index),
    })
}
