//! Dependency resolution
//!
//! Locates the enclosing project configuration, extracts import specifiers
//! from source text, and builds the bounded transitive dependency closure
//! of an entry file.

pub mod closure;
pub mod config;
pub mod imports;

pub use closure::{DependencyClosure, DependencyResolver, ResolverOptions, DEFAULT_MAX_DEPTH};

use std::path::PathBuf;

/// Fatal resolution failures. Everything else degrades: unresolvable
/// specifiers are dropped and unreadable non-entry files become leaves.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("no {} found in any ancestor of {}", config::CONFIG_FILE, .start.display())]
    ConfigNotFound { start: PathBuf },

    #[error("failed to read entry file {}", .path.display())]
    RootUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
