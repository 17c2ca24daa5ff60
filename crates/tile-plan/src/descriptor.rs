//! Tile descriptors and descriptor sources.
//!
//! A descriptor anchors one tile: its lower-left corner in the source
//! array's coordinate space and the `Z` index to slice at. Descriptors are
//! read from plain text (`x,y,z` per line) or YAML.

use crate::error::{PlanError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::Hash;
use std::path::Path;
use tracing::debug;

/// One tile of the split: `(origin_x, origin_y, slice_index)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileDescriptor {
    /// Inclusive lower bound along the X (`J`) axis. May be negative.
    pub origin_x: i64,
    /// Inclusive lower bound along the Y (`I`) axis. May be negative.
    pub origin_y: i64,
    /// Index along the sliced dimension; also keys the stored array name.
    pub slice_index: i64,
}

impl TileDescriptor {
    pub fn new(origin_x: i64, origin_y: i64, slice_index: i64) -> Self {
        Self {
            origin_x,
            origin_y,
            slice_index,
        }
    }
}

impl From<(i64, i64, i64)> for TileDescriptor {
    fn from((origin_x, origin_y, slice_index): (i64, i64, i64)) -> Self {
        Self::new(origin_x, origin_y, slice_index)
    }
}

/// Parse descriptors from text, one `x,y,z` triple per line.
///
/// Blank lines and `#` comments are skipped. A triple may be wrapped in
/// parentheses and followed by a trailing comma, so a table pasted from a
/// tuple list parses unchanged.
pub fn parse_descriptors(text: &str) -> Result<Vec<TileDescriptor>> {
    let mut descriptors = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = match raw.find('#') {
            Some(pos) => &raw[..pos],
            None => raw,
        };
        let line = line.trim().trim_end_matches(',').trim();
        if line.is_empty() {
            continue;
        }

        let line = line
            .strip_prefix('(')
            .and_then(|l| l.strip_suffix(')'))
            .unwrap_or(line);

        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() != 3 {
            return Err(PlanError::MalformedDescriptor {
                line: line_no,
                message: format!("expected 3 fields, found {}", fields.len()),
            });
        }

        let mut values = [0i64; 3];
        for (slot, field) in values.iter_mut().zip(&fields) {
            *slot = field
                .parse()
                .map_err(|e| PlanError::MalformedDescriptor {
                    line: line_no,
                    message: format!("'{}': {}", field, e),
                })?;
        }

        descriptors.push(TileDescriptor::new(values[0], values[1], values[2]));
    }

    Ok(descriptors)
}

/// Parse descriptors from a YAML list of `{origin_x, origin_y, slice_index}`.
pub fn parse_yaml_descriptors(text: &str) -> Result<Vec<TileDescriptor>> {
    Ok(serde_yaml::from_str(text)?)
}

/// Load descriptors from a file. `.yaml`/`.yml` files are read as YAML,
/// everything else as `x,y,z` text.
pub fn load_descriptors(path: impl AsRef<Path>) -> Result<Vec<TileDescriptor>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;

    let descriptors = match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => parse_yaml_descriptors(&content)?,
        _ => parse_descriptors(&content)?,
    };

    debug!(path = %path.display(), count = descriptors.len(), "Loaded tile descriptors");
    Ok(descriptors)
}

/// A key that occurs more than once, with every position it occurs at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Duplicate<K> {
    pub key: K,
    pub positions: Vec<usize>,
}

fn find_duplicates<K, F>(descriptors: &[TileDescriptor], key_of: F) -> Vec<Duplicate<K>>
where
    K: Eq + Hash + Copy,
    F: Fn(&TileDescriptor) -> K,
{
    let mut seen: HashMap<K, Vec<usize>> = HashMap::new();
    for (pos, d) in descriptors.iter().enumerate() {
        seen.entry(key_of(d)).or_default().push(pos);
    }

    let mut duplicates: Vec<Duplicate<K>> = seen
        .into_iter()
        .filter(|(_, positions)| positions.len() > 1)
        .map(|(key, positions)| Duplicate { key, positions })
        .collect();

    // Report in order of first occurrence
    duplicates.sort_by_key(|d| d.positions[0]);
    duplicates
}

/// Slice indices that appear more than once. Each one would overwrite the
/// same stored array.
pub fn find_duplicate_slices(descriptors: &[TileDescriptor]) -> Vec<Duplicate<i64>> {
    find_duplicates(descriptors, |d| d.slice_index)
}

/// Footprints `(origin_x, origin_y)` that appear more than once.
pub fn find_duplicate_origins(descriptors: &[TileDescriptor]) -> Vec<Duplicate<(i64, i64)>> {
    find_duplicates(descriptors, |d| (d.origin_x, d.origin_y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_lines() {
        let text = "490205,507962,0\n495230,488864,1\n";
        let tiles = parse_descriptors(text).unwrap();
        assert_eq!(tiles.len(), 2);
        assert_eq!(tiles[0], TileDescriptor::new(490205, 507962, 0));
        assert_eq!(tiles[1], TileDescriptor::new(495230, 488864, 1));
    }

    #[test]
    fn test_parse_skips_comments_and_blank_lines() {
        let text = "# header\n\n  -10, 0, 5  # negative origin\n\n";
        let tiles = parse_descriptors(text).unwrap();
        assert_eq!(tiles, vec![TileDescriptor::new(-10, 0, 5)]);
    }

    #[test]
    fn test_parse_tuple_syntax() {
        let text = "(490205,507962,0),\n(495230, 488864, 1)\n";
        let tiles = parse_descriptors(text).unwrap();
        assert_eq!(tiles[0].slice_index, 0);
        assert_eq!(tiles[1].origin_y, 488864);
    }

    #[test]
    fn test_parse_wrong_field_count_reports_line() {
        let err = parse_descriptors("1,2,3\n4,5\n").unwrap_err();
        match err {
            PlanError::MalformedDescriptor { line, message } => {
                assert_eq!(line, 2);
                assert!(message.contains("expected 3 fields"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_non_numeric_field() {
        let err = parse_descriptors("1,abc,3").unwrap_err();
        assert!(matches!(err, PlanError::MalformedDescriptor { line: 1, .. }));
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
- origin_x: 490205
  origin_y: 507962
  slice_index: 0
- origin_x: -10
  origin_y: 0
  slice_index: 5
"#;
        let tiles = parse_yaml_descriptors(yaml).unwrap();
        assert_eq!(tiles.len(), 2);
        assert_eq!(tiles[1], TileDescriptor::new(-10, 0, 5));
    }

    #[test]
    fn test_duplicate_slices() {
        let tiles = vec![
            TileDescriptor::new(0, 0, 7),
            TileDescriptor::new(10, 10, 8),
            TileDescriptor::new(20, 20, 7),
        ];
        let dups = find_duplicate_slices(&tiles);
        assert_eq!(dups.len(), 1);
        assert_eq!(dups[0].key, 7);
        assert_eq!(dups[0].positions, vec![0, 2]);
    }

    #[test]
    fn test_duplicate_origins_ordered_by_first_occurrence() {
        let tiles = vec![
            TileDescriptor::new(5, 5, 0),
            TileDescriptor::new(1, 1, 1),
            TileDescriptor::new(1, 1, 2),
            TileDescriptor::new(5, 5, 3),
        ];
        let dups = find_duplicate_origins(&tiles);
        assert_eq!(dups.len(), 2);
        assert_eq!(dups[0].key, (5, 5));
        assert_eq!(dups[1].key, (1, 1));
    }

    #[test]
    fn test_no_duplicates() {
        let tiles = vec![TileDescriptor::new(0, 0, 0), TileDescriptor::new(0, 1, 1)];
        assert!(find_duplicate_slices(&tiles).is_empty());
        assert!(find_duplicate_origins(&tiles).is_empty());
    }
}
