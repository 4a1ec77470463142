//! Closure search
//!
//! Runs a literal text search across a resolved file set. The external rg
//! backend is preferred when available; any failure there degrades to the
//! built-in engine, so `search` itself never fails. Both engines emit the
//! same match contract, so callers cannot tell which one ran.

pub mod fallback;
pub mod rg;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::core::model::{SearchMatch, SearchOptions};
use crate::core::paths::{absolutize, normalize_path};
use crate::resolver::config;

pub use rg::is_rg_available;

/// Search `files` for `query`. Relative paths are resolved against the
/// project root enclosing `context_path`.
pub fn search(
    files: &[String],
    query: &str,
    options: SearchOptions,
    context_path: &Path,
) -> Vec<SearchMatch> {
    search_with_engines(files, query, options, context_path, true)
}

/// Like [`search`], but with the external engine optionally disabled.
pub fn search_with_engines(
    files: &[String],
    query: &str,
    options: SearchOptions,
    context_path: &Path,
    allow_external: bool,
) -> Vec<SearchMatch> {
    if files.is_empty() {
        return Vec::new();
    }

    let base = config::project_root_for(context_path);
    let paths: Vec<PathBuf> = files
        .iter()
        .map(|f| absolutize(Path::new(f), &base))
        .collect();

    let mut matches = None;
    if allow_external {
        match rg::run_rg(&paths, query, options, &base) {
            Ok(found) => {
                debug!(matches = found.len(), "rg backend completed");
                matches = Some(found);
            }
            Err(err) => {
                warn!(%err, "rg backend unavailable, using built-in engine");
            }
        }
    }
    let mut matches = matches.unwrap_or_else(|| fallback::run(&paths, query, options));

    // rg searches files in parallel, so order matches back to the input
    // file order to keep both engines' output identical.
    let order: HashMap<String, usize> = paths
        .iter()
        .enumerate()
        .map(|(i, p)| (normalize_path(p), i))
        .collect();
    matches.sort_by_key(|m| {
        (
            order.get(&m.file_path).copied().unwrap_or(usize::MAX),
            m.line_number,
            m.column,
        )
    });
    matches
}
