//! Import statement extraction
//!
//! Scans a source file's text for static `import`/`export ... from`
//! declarations, `require(...)` calls, and dynamic `import(...)` calls,
//! yielding the raw module specifiers. Type-only imports are flagged so the
//! traversal can skip them. Purely textual: a specifier inside a comment or
//! string literal is indistinguishable from a real one, which mirrors how
//! the rest of the ECMAScript tooling fallback paths behave.

use once_cell::sync::Lazy;
use regex::Regex;

/// `import ... from '<spec>'`, `import '<spec>'`, `import type ... from '<spec>'`.
/// The body class excludes quotes and semicolons so a match never crosses
/// statement boundaries, but multi-line import lists still work.
static IMPORT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\bimport\s+(type\s+)?(?:[^'";]*?from\s*)?['"]([^'"\n]+)['"]"#)
        .expect("valid regex")
});

/// `export ... from '<spec>'`, `export type ... from '<spec>'`.
static EXPORT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\bexport\s+(type\s+)?[^'";]*?from\s*['"]([^'"\n]+)['"]"#).expect("valid regex")
});

/// `require('<spec>')` and dynamic `import('<spec>')`.
static CALL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\b(?:require|import)\s*\(\s*['"]([^'"\n]+)['"]\s*\)"#).expect("valid regex")
});

/// One extracted import target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    /// The module specifier as written in the source.
    pub specifier: String,

    /// 1-based line of the specifier's statement.
    pub line: u32,

    /// `import type` / `export type` declarations carry no runtime edge.
    pub type_only: bool,
}

/// Extract every import specifier from `content`, in source order,
/// deduplicated by (line, specifier).
pub fn extract_imports(content: &str) -> Vec<ImportSpec> {
    let mut found: Vec<(usize, ImportSpec)> = Vec::new();

    for caps in IMPORT_RE.captures_iter(content) {
        let m = caps.get(0).map(|m| m.start()).unwrap_or(0);
        if let Some(spec) = caps.get(2) {
            found.push((
                m,
                ImportSpec {
                    specifier: spec.as_str().to_string(),
                    line: line_of(content, m),
                    type_only: caps.get(1).is_some(),
                },
            ));
        }
    }

    for caps in EXPORT_RE.captures_iter(content) {
        let m = caps.get(0).map(|m| m.start()).unwrap_or(0);
        if let Some(spec) = caps.get(2) {
            found.push((
                m,
                ImportSpec {
                    specifier: spec.as_str().to_string(),
                    line: line_of(content, m),
                    type_only: caps.get(1).is_some(),
                },
            ));
        }
    }

    for caps in CALL_RE.captures_iter(content) {
        let m = caps.get(0).map(|m| m.start()).unwrap_or(0);
        if let Some(spec) = caps.get(1) {
            found.push((
                m,
                ImportSpec {
                    specifier: spec.as_str().to_string(),
                    line: line_of(content, m),
                    type_only: false,
                },
            ));
        }
    }

    found.sort_by_key(|(offset, _)| *offset);

    let mut specs: Vec<ImportSpec> = Vec::new();
    for (_, spec) in found {
        if !specs
            .iter()
            .any(|s| s.line == spec.line && s.specifier == spec.specifier)
        {
            specs.push(spec);
        }
    }
    specs
}

fn line_of(content: &str, offset: usize) -> u32 {
    content[..offset].bytes().filter(|&b| b == b'\n').count() as u32 + 1
}
