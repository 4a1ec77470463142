//! Project configuration discovery
//!
//! Walks ancestor directories to find the nearest `tsconfig.json` and
//! extracts the pieces the resolver needs: the base directory, the optional
//! `compilerOptions.baseUrl`, and the `compilerOptions.paths` alias map.
//! tsconfig files are JSONC in the wild, so comments and trailing commas
//! are tolerated.

use std::path::{Path, PathBuf};
use tracing::warn;

use crate::resolver::ResolveError;

/// The recognized project configuration file name.
pub const CONFIG_FILE: &str = "tsconfig.json";

/// A single `compilerOptions.paths` entry, e.g. `"@/*": ["src/*"]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasPattern {
    pub pattern: String,
    pub targets: Vec<String>,
}

impl AliasPattern {
    /// Expand `specifier` against this pattern. Single-`*` patterns capture
    /// the middle segment and substitute it into each target; patterns
    /// without `*` must match exactly.
    pub fn expand(&self, specifier: &str) -> Option<Vec<String>> {
        match self.pattern.split_once('*') {
            Some((prefix, suffix)) => {
                if specifier.len() >= prefix.len() + suffix.len()
                    && specifier.starts_with(prefix)
                    && specifier.ends_with(suffix)
                {
                    let captured = &specifier[prefix.len()..specifier.len() - suffix.len()];
                    Some(
                        self.targets
                            .iter()
                            .map(|t| t.replacen('*', captured, 1))
                            .collect(),
                    )
                } else {
                    None
                }
            }
            None => (self.pattern == specifier).then(|| self.targets.clone()),
        }
    }
}

/// Identifies a project root. Immutable once resolved.
#[derive(Debug, Clone)]
pub struct ProjectConfig {
    pub config_path: PathBuf,
    pub base_dir: PathBuf,
    pub base_url: Option<String>,
    pub paths: Vec<AliasPattern>,
}

impl ProjectConfig {
    /// The directory non-relative specifiers resolve against:
    /// `base_dir` joined with `baseUrl` when one is configured.
    pub fn resolution_base(&self) -> PathBuf {
        match &self.base_url {
            Some(url) => self.base_dir.join(url),
            None => self.base_dir.clone(),
        }
    }
}

/// Find the nearest project config for `file_path` by walking upward from
/// its containing directory. No config up to the filesystem root is a hard
/// failure; nothing is synthesized.
pub fn locate(file_path: &Path) -> Result<ProjectConfig, ResolveError> {
    let mut dir = file_path.parent();

    while let Some(current) = dir {
        let candidate = current.join(CONFIG_FILE);
        if candidate.is_file() {
            return Ok(load(&candidate, current));
        }
        dir = current.parent();
    }

    Err(ResolveError::ConfigNotFound {
        start: file_path.to_path_buf(),
    })
}

/// The project root enclosing `context_path`, used to resolve relative
/// search inputs. Falls back to the path's own parent directory when no
/// project config exists.
pub fn project_root_for(context_path: &Path) -> PathBuf {
    match locate(context_path) {
        Ok(config) => config.base_dir,
        Err(_) => context_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
    }
}

/// The project root enclosing the directory `dir`, checking `dir` itself
/// before walking upward (unlike [`locate`], whose walk starts at the
/// argument's parent). Falls back to `dir` when no config exists, so
/// project-less lookups still read relative to where they were asked.
pub fn project_root_for_dir(dir: &Path) -> PathBuf {
    let mut current = Some(dir);

    while let Some(candidate) = current {
        if candidate.join(CONFIG_FILE).is_file() {
            return candidate.to_path_buf();
        }
        current = candidate.parent();
    }

    dir.to_path_buf()
}

/// Parse the located config. A malformed or unreadable config still yields
/// a usable `ProjectConfig` (the base directory is what resolution needs);
/// the alias map is simply empty.
fn load(config_path: &Path, base_dir: &Path) -> ProjectConfig {
    let mut config = ProjectConfig {
        config_path: config_path.to_path_buf(),
        base_dir: base_dir.to_path_buf(),
        base_url: None,
        paths: Vec::new(),
    };

    let raw = match std::fs::read_to_string(config_path) {
        Ok(raw) => raw,
        Err(err) => {
            warn!(path = %config_path.display(), %err, "failed to read project config");
            return config;
        }
    };

    let value: serde_json::Value = match serde_json::from_str(&sanitize_jsonc(&raw)) {
        Ok(value) => value,
        Err(err) => {
            warn!(path = %config_path.display(), %err, "failed to parse project config");
            return config;
        }
    };

    let compiler_options = value.get("compilerOptions");

    config.base_url = compiler_options
        .and_then(|o| o.get("baseUrl"))
        .and_then(|u| u.as_str())
        .map(str::to_string);

    if let Some(paths) = compiler_options
        .and_then(|o| o.get("paths"))
        .and_then(|p| p.as_object())
    {
        for (pattern, targets) in paths {
            let targets: Vec<String> = targets
                .as_array()
                .map(|arr| {
                    arr.iter()
                        .filter_map(|t| t.as_str().map(str::to_string))
                        .collect()
                })
                .unwrap_or_default();

            if !targets.is_empty() {
                config.paths.push(AliasPattern {
                    pattern: pattern.clone(),
                    targets,
                });
            }
        }
    }

    config
}

/// Strip `//` and `/* */` comments and trailing commas so the JSONC that
/// real tsconfig files contain parses as plain JSON. String contents are
/// left untouched.
fn sanitize_jsonc(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;
    let mut escaped = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            '/' if chars.peek() == Some(&'/') => {
                for next in chars.by_ref() {
                    if next == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for next in chars.by_ref() {
                    if prev == '*' && next == '/' {
                        break;
                    }
                    prev = next;
                }
            }
            ',' => {
                // Drop the comma if the next significant char closes a scope.
                let mut lookahead = chars.clone();
                let mut closes = false;
                for next in lookahead.by_ref() {
                    if next.is_whitespace() {
                        continue;
                    }
                    closes = next == '}' || next == ']';
                    break;
                }
                if !closes {
                    out.push(c);
                }
            }
            _ => out.push(c),
        }
    }

    out
}
