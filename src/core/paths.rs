//! Path normalization utilities
//!
//! Ensures all paths are normalized to use '/' as separator and gives the
//! resolver a deterministic absolute form to key its cache on.

use std::path::{Component, Path, PathBuf};

/// Normalize a path to use '/' as separator (for cross-platform consistency)
pub fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Resolve `path` against `base` and collapse `.` and `..` components
/// lexically, without touching the filesystem.
pub fn absolutize(path: &Path, base: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };

    let mut out = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

/// Check whether any component of `path` equals `segment` exactly.
/// Used for exclusion rules like `node_modules` or `dist`.
pub fn has_segment(path: &Path, segment: &str) -> bool {
    path.components().any(|c| match c {
        Component::Normal(name) => name.to_str() == Some(segment),
        _ => false,
    })
}
