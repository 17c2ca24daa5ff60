//! End-to-end tests for descriptor loading, plan computation and query text.

use std::io::Write;
use tile_plan::{
    compute_plan, load_descriptors, normal_obs_tiles, render_query, PlanError, SourceArray,
    TileDescriptor, TileEdge, SAMPLE_TILE_EDGE,
};

fn sample_edge() -> TileEdge {
    TileEdge::new(SAMPLE_TILE_EDGE).unwrap()
}

// ============================================================================
// Query text
// ============================================================================

#[test]
fn test_first_sample_query_matches_benchmark_text() {
    let tiles = normal_obs_tiles().unwrap();
    let plan = compute_plan(&tiles[0], sample_edge()).unwrap();
    let query = render_query(&plan, &SourceArray::default());

    assert_eq!(
        query,
        "store(reshape(slice(normal_obs,Z,0),<oid:int64 NULL,center:bool NULL,polygon:int32 NULL,sumPixel:int64 NULL,avgDist:double NULL,point:bool NULL>[J=490205:497704,7500,0,I=507962:515461,7500,0]),normal_obs_0)"
    );
}

#[test]
fn test_negative_origin_query() {
    let plan = compute_plan(&TileDescriptor::new(-10, 0, 5), TileEdge::new(100).unwrap()).unwrap();
    let query = render_query(&plan, &SourceArray::default());

    assert!(query.starts_with("store(reshape(slice(normal_obs,Z,5),"));
    assert!(query.contains("[J=-10:89,100,0,I=0:99,100,0]"));
    assert!(query.ends_with(",normal_obs_5)"));
}

#[test]
fn test_every_sample_query_has_exact_footprint() {
    let source = SourceArray::default();
    for tile in normal_obs_tiles().unwrap() {
        let plan = compute_plan(&tile, sample_edge()).unwrap();
        assert_eq!(plan.width(), SAMPLE_TILE_EDGE);
        assert_eq!(plan.height(), SAMPLE_TILE_EDGE);

        let query = render_query(&plan, &source);
        let x_dim = format!("J={}:{},7500,0", tile.origin_x, tile.origin_x + 7499);
        let y_dim = format!("I={}:{},7500,0", tile.origin_y, tile.origin_y + 7499);
        assert!(query.contains(&x_dim), "{query}");
        assert!(query.contains(&y_dim), "{query}");
        assert!(query.ends_with(&format!(",normal_obs_{})", tile.slice_index)));
    }
}

#[test]
fn test_custom_source_identifiers() {
    let source = SourceArray {
        name: "obs".to_string(),
        slice_dimension: "T".to_string(),
        x_dimension: "X".to_string(),
        y_dimension: "Y".to_string(),
        schema: tile_plan::SchemaSpec::raw("<v:double NULL>"),
    };
    let plan = compute_plan(&TileDescriptor::new(1, 2, 3), TileEdge::new(4).unwrap())
        .unwrap()
        .with_target_prefix("obs_tile");

    assert_eq!(
        render_query(&plan, &source),
        "store(reshape(slice(obs,T,3),<v:double NULL>[X=1:4,4,0,Y=2:5,4,0]),obs_tile_3)"
    );
}

// ============================================================================
// Descriptor files
// ============================================================================

#[test]
fn test_load_text_descriptor_file() {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(file, "# x,y,z").unwrap();
    writeln!(file, "490205,507962,0").unwrap();
    writeln!(file, "-10,0,5").unwrap();

    let tiles = load_descriptors(file.path()).unwrap();
    assert_eq!(tiles.len(), 2);
    assert_eq!(tiles[1], TileDescriptor::new(-10, 0, 5));
}

#[test]
fn test_load_yaml_descriptor_file() {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    writeln!(file, "- {{ origin_x: 1, origin_y: 2, slice_index: 3 }}").unwrap();

    let tiles = load_descriptors(file.path()).unwrap();
    assert_eq!(tiles, vec![TileDescriptor::new(1, 2, 3)]);
}

#[test]
fn test_load_missing_file() {
    let err = load_descriptors("/nonexistent/tiles.csv").unwrap_err();
    assert!(matches!(err, PlanError::FileRead(_)));
}
