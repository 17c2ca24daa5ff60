//! Temporary file helpers.

use std::io::Write;
use std::path::PathBuf;

/// Returns the workspace root directory.
pub fn workspace_root() -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    PathBuf::from(manifest_dir)
        .parent() // crates/
        .and_then(|p| p.parent()) // workspace root
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from(manifest_dir))
}

/// Writes `content` to a temporary file with the given suffix (e.g. `.yaml`).
///
/// The file is removed when the returned handle is dropped.
pub fn write_temp_file(suffix: &str, content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("Failed to create temporary file");
    file.write_all(content.as_bytes())
        .expect("Failed to write temporary file");
    file
}
