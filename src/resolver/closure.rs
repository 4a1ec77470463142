//! Dependency closure construction
//!
//! Builds the transitive set of files statically importable from an entry
//! file: breadth-first, deterministic, bounded by depth, and deduplicated
//! so cyclic import graphs terminate. Completed closures are cached by
//! normalized entry path; a repeat resolution reads no files.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::core::paths::{absolutize, has_segment, normalize_path};
use crate::resolver::config::{self, ProjectConfig};
use crate::resolver::imports::extract_imports;
use crate::resolver::ResolveError;

/// Default traversal depth bound.
pub const DEFAULT_MAX_DEPTH: usize = 5;

/// Extensions a specifier may resolve to, in priority order.
pub const RESOLVE_EXTENSIONS: [&str; 4] = ["ts", "tsx", "js", "jsx"];

/// Path segments that are never traversed into.
pub const EXCLUDED_SEGMENTS: [&str; 4] = ["node_modules", "dist", "build", "coverage"];

/// Traversal configuration.
#[derive(Debug, Clone)]
pub struct ResolverOptions {
    /// Nodes discovered beyond this depth are not expanded further.
    pub max_depth: usize,

    /// Follow `import type` edges into further traversal. Off by default:
    /// type-only imports are tracked but carry no runtime dependency.
    pub follow_type_imports: bool,

    /// Caller-supplied path segments excluded in addition to
    /// [`EXCLUDED_SEGMENTS`].
    pub exclude_segments: Vec<String>,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            follow_type_imports: false,
            exclude_segments: Vec::new(),
        }
    }
}

/// The resolved graph for one entry file.
///
/// Nodes are stored in discovery order; every node satisfies the extension
/// and exclusion filters, and no node appears twice.
#[derive(Debug, Clone)]
pub struct DependencyClosure {
    entry: PathBuf,
    nodes: Vec<PathBuf>,
    edges: HashMap<PathBuf, Vec<PathBuf>>,
}

impl DependencyClosure {
    pub fn entry(&self) -> &Path {
        &self.entry
    }

    /// The flattened, de-duplicated node set in discovery order.
    pub fn files(&self) -> &[PathBuf] {
        &self.nodes
    }

    /// The node set as normalized path strings, for rendering.
    pub fn file_strings(&self) -> Vec<String> {
        self.nodes.iter().map(|p| normalize_path(p)).collect()
    }

    /// Resolved import edges of one node. Empty for leaves and for nodes
    /// that were included but not expanded (depth bound).
    pub fn imports_of(&self, path: &Path) -> &[PathBuf] {
        self.edges.get(path).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Resolves dependency closures and caches them by entry file.
///
/// The cache is unbounded and never invalidated; acceptable for a
/// short-lived process, and both computations are pure so a stale repeat
/// call is idempotent rather than wrong.
#[derive(Debug, Default)]
pub struct DependencyResolver {
    options: ResolverOptions,
    cache: HashMap<PathBuf, DependencyClosure>,
}

impl DependencyResolver {
    pub fn new(options: ResolverOptions) -> Self {
        Self {
            options,
            cache: HashMap::new(),
        }
    }

    /// Resolve the closure for `file_path`. A second call with the same
    /// entry returns the cached closure without touching the filesystem.
    ///
    /// `ConfigNotFound` and an unreadable entry file are fatal; nothing is
    /// cached for a failed resolution.
    pub fn resolve(&mut self, file_path: &Path) -> Result<&DependencyClosure, ResolveError> {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let key = absolutize(file_path, &cwd);

        if !self.cache.contains_key(&key) {
            let closure = build_closure(&key, &self.options)?;
            debug!(
                entry = %key.display(),
                nodes = closure.len(),
                "dependency closure resolved"
            );
            self.cache.insert(key.clone(), closure);
        }

        Ok(&self.cache[&key])
    }
}

fn build_closure(
    entry: &PathBuf,
    options: &ResolverOptions,
) -> Result<DependencyClosure, ResolveError> {
    let config = config::locate(entry)?;
    debug!(config = %config.config_path.display(), "located project config");

    // An unreadable entry is fatal; any other unreadable node degrades to a leaf.
    let entry_content = fs::read_to_string(entry).map_err(|source| ResolveError::RootUnreadable {
        path: entry.clone(),
        source,
    })?;
    let mut entry_content = Some(entry_content);

    let mut nodes = vec![entry.clone()];
    let mut visited: HashSet<PathBuf> = HashSet::new();
    visited.insert(entry.clone());
    let mut edges: HashMap<PathBuf, Vec<PathBuf>> = HashMap::new();
    let mut queue: VecDeque<(PathBuf, usize)> = VecDeque::new();
    queue.push_back((entry.clone(), 0));

    while let Some((path, depth)) = queue.pop_front() {
        // The node itself is already included; only expand within the bound.
        if depth >= options.max_depth {
            continue;
        }

        let content = match entry_content.take() {
            Some(content) => content,
            None => match fs::read_to_string(&path) {
                Ok(content) => content,
                Err(err) => {
                    warn!(path = %path.display(), %err, "unreadable node kept as leaf");
                    continue;
                }
            },
        };

        let importer_dir = path.parent().unwrap_or_else(|| Path::new("/"));
        let mut resolved = Vec::new();

        for spec in extract_imports(&content) {
            if spec.type_only && !options.follow_type_imports {
                debug!(specifier = %spec.specifier, line = spec.line, "skipping type-only import");
                continue;
            }

            let Some(target) = resolve_specifier(&spec.specifier, importer_dir, &config) else {
                continue;
            };

            if is_excluded(&target, &options.exclude_segments) {
                debug!(target = %target.display(), "excluded from closure");
                continue;
            }

            resolved.push(target.clone());
            if visited.insert(target.clone()) {
                nodes.push(target.clone());
                queue.push_back((target, depth + 1));
            }
        }

        resolved.sort();
        resolved.dedup();
        edges.insert(path, resolved);
    }

    Ok(DependencyClosure {
        entry: entry.clone(),
        nodes,
        edges,
    })
}

/// Resolve one specifier to an existing file, or drop it.
///
/// Relative specifiers resolve against the importing file's directory,
/// root-absolute ones against the project base directory, and everything
/// else through the alias map. Bare package names with no alias match are
/// dropped, not errors.
fn resolve_specifier(
    specifier: &str,
    importer_dir: &Path,
    config: &ProjectConfig,
) -> Option<PathBuf> {
    if specifier.starts_with('.') {
        return try_candidates(&absolutize(Path::new(specifier), importer_dir));
    }

    if let Some(rest) = specifier.strip_prefix('/') {
        return try_candidates(&config.base_dir.join(rest));
    }

    let base = config.resolution_base();
    for alias in &config.paths {
        if let Some(expansions) = alias.expand(specifier) {
            for target in expansions {
                if let Some(found) = try_candidates(&absolutize(Path::new(&target), &base)) {
                    return Some(found);
                }
            }
        }
    }

    None
}

/// Probe a resolved base path: exact file, then appended extensions, then
/// `index.<ext>` inside a directory.
fn try_candidates(base: &Path) -> Option<PathBuf> {
    if base.is_file() && has_resolvable_extension(base) {
        return Some(base.to_path_buf());
    }

    for ext in RESOLVE_EXTENSIONS {
        let candidate = PathBuf::from(format!("{}.{}", base.display(), ext));
        if candidate.is_file() {
            return Some(candidate);
        }
    }

    for ext in RESOLVE_EXTENSIONS {
        let candidate = base.join(format!("index.{}", ext));
        if candidate.is_file() {
            return Some(candidate);
        }
    }

    None
}

fn has_resolvable_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| RESOLVE_EXTENSIONS.contains(&e))
        .unwrap_or(false)
}

fn is_excluded(path: &Path, extra_segments: &[String]) -> bool {
    let is_declaration = path
        .file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.ends_with(".d.ts"))
        .unwrap_or(false);
    if is_declaration {
        return true;
    }

    EXCLUDED_SEGMENTS.iter().any(|s| has_segment(path, s))
        || extra_segments.iter().any(|s| has_segment(path, s))
}
