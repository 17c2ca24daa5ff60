//! Shared test utilities for the tile splitter workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Descriptor fixtures (benchmark anchors, negative origins)
//! - A recording executor that stands in for a SciDB session
//! - Temporary file helpers for config and descriptor files
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../../crates/test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{fixtures, RecordingExecutor};
//! ```

pub mod files;
pub mod fixtures;
pub mod recording;

// Re-export commonly used items at the crate root
pub use files::*;
pub use recording::{FailOn, RecordingExecutor, SessionLog};

/// Assert that a rendered query addresses the given slice and tile bounds.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_tile_query;
///
/// assert_tile_query!(query, slice = 0, x = (490205, 497704), y = (507962, 515461), edge = 7500);
/// ```
#[macro_export]
macro_rules! assert_tile_query {
    ($query:expr, slice = $z:expr, x = ($x0:expr, $x1:expr), y = ($y0:expr, $y1:expr), edge = $n:expr) => {{
        let query: &str = &$query;
        let slice = format!(",Z,{}),", $z);
        let dims = format!("[J={}:{},{},0,I={}:{},{},0]", $x0, $x1, $n, $y0, $y1, $n);
        let target = format!(",normal_obs_{})", $z);
        assert!(query.contains(&slice), "missing slice `{}` in {}", slice, query);
        assert!(query.contains(&dims), "missing dimensions `{}` in {}", dims, query);
        assert!(query.ends_with(&target), "missing target `{}` in {}", target, query);
    }};
}
