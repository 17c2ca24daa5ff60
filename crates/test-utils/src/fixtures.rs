//! Common descriptor fixtures.

use tile_plan::TileDescriptor;

/// First five anchors of the benchmark table.
pub fn benchmark_head() -> Vec<TileDescriptor> {
    vec![
        TileDescriptor::new(490205, 507962, 0),
        TileDescriptor::new(495230, 488864, 1),
        TileDescriptor::new(661084, 399169, 2),
        TileDescriptor::new(505281, 498915, 3),
        TileDescriptor::new(486183, 503940, 4),
    ]
}

/// `count` small tiles on a diagonal, slice indices `0..count`.
pub fn diagonal(count: i64, edge: i64) -> Vec<TileDescriptor> {
    (0..count)
        .map(|i| TileDescriptor::new(i * edge, i * edge, i))
        .collect()
}

/// Anchors left of and below the origin.
pub fn negative_origins() -> Vec<TileDescriptor> {
    vec![
        TileDescriptor::new(-10, 0, 5),
        TileDescriptor::new(0, -10, 6),
        TileDescriptor::new(-100, -100, 7),
    ]
}

/// Two descriptors that would store into the same array.
pub fn colliding_slices() -> Vec<TileDescriptor> {
    vec![
        TileDescriptor::new(0, 0, 3),
        TileDescriptor::new(100, 100, 4),
        TileDescriptor::new(200, 200, 3),
    ]
}

/// Render descriptors as `x,y,z` lines.
pub fn to_text(descriptors: &[TileDescriptor]) -> String {
    descriptors
        .iter()
        .map(|d| format!("{},{},{}\n", d.origin_x, d.origin_y, d.slice_index))
        .collect()
}
