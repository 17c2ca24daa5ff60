//! Tile planning for the SS-DB `normal_obs` split.
//!
//! Turns `(origin_x, origin_y, slice_index)` descriptors into tile plans and
//! renders each plan as a single AFL `store(reshape(slice(...)))` query.
//!
//! # Architecture
//!
//! Everything in this crate is pure. Submitting the rendered queries is the
//! job of `scidb-client` and the `tile-splitter` service.
//!
//! - [`descriptor`]: the input model plus parsing and duplicate detection
//! - [`plan`]: inclusive tile bounds and chunking for one descriptor
//! - [`query`]: source array description and query text
//! - [`sample`]: the built-in 400-entry benchmark table

pub mod descriptor;
pub mod error;
pub mod plan;
pub mod query;
pub mod sample;

// Re-exports
pub use descriptor::{
    find_duplicate_origins, find_duplicate_slices, load_descriptors, parse_descriptors,
    parse_yaml_descriptors, Duplicate, TileDescriptor,
};
pub use error::{PlanError, Result};
pub use plan::{compute_plan, TileEdge, TilePlan, DEFAULT_TARGET_PREFIX};
pub use query::{render_query, AttributeSpec, DimensionSpec, SchemaSpec, SourceArray};
pub use sample::{normal_obs_tiles, SAMPLE_TILE_EDGE};
