//! ripgrep backend
//!
//! Invokes an external `rg` binary with `--json` and maps its event stream
//! onto the shared match model. The query is always passed as a fixed
//! string (`-F`), so both engines treat it literally. Any failure here is
//! reported to the caller, which falls back to the built-in engine.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::core::model::{MatchRange, SearchMatch, SearchOptions};
use crate::core::util::command_exists;

/// Cap on accepted engine output. Larger result sets fall back to the
/// built-in engine rather than being truncated mid-record.
pub const MAX_ENGINE_OUTPUT: usize = 1024 * 1024;

/// Overrides binary discovery; points at an `rg` executable directly.
pub const RG_PATH_ENV: &str = "DEPSEARCH_RG_PATH";

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("rg binary not found on PATH (set {RG_PATH_ENV} to override)")]
    NotFound,

    #[error("failed to invoke rg")]
    Invocation(#[from] std::io::Error),

    #[error("rg produced more than {MAX_ENGINE_OUTPUT} bytes of output")]
    OutputTooLarge,
}

/// Where a discovered rg binary came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RgSource {
    EnvOverride,
    PathLookup,
}

/// Locate the rg binary and report which discovery branch found it:
/// a valid env override wins, an invalid one falls through to PATH.
pub fn locate_rg() -> Option<(PathBuf, RgSource)> {
    if let Ok(path) = std::env::var(RG_PATH_ENV) {
        let path = PathBuf::from(path);
        if path.is_file() {
            return Some((path, RgSource::EnvOverride));
        }
    }
    command_exists("rg").then(|| (PathBuf::from("rg"), RgSource::PathLookup))
}

pub fn rg_binary() -> Option<PathBuf> {
    locate_rg().map(|(path, _)| path)
}

pub fn is_rg_available() -> bool {
    rg_binary().is_some()
}

/// Run rg over `files` and collect matches. Files are passed as-is;
/// the caller is responsible for absolutizing them.
pub fn run_rg(
    files: &[PathBuf],
    query: &str,
    options: SearchOptions,
    cwd: &Path,
) -> Result<Vec<SearchMatch>, EngineError> {
    let binary = rg_binary().ok_or(EngineError::NotFound)?;

    let mut cmd = Command::new(&binary);
    cmd.current_dir(cwd);
    cmd.args(["--json", "--no-messages", "-F"]);
    if !options.case_sensitive {
        cmd.arg("-i");
    }
    if options.whole_word {
        cmd.arg("-w");
    }
    cmd.arg("-e").arg(query);
    cmd.args(files);

    debug!(binary = %binary.display(), files = files.len(), "invoking rg");
    let output = cmd.output()?;

    // Exit code 1 means no matches; 2 is an engine error.
    if !matches!(output.status.code(), Some(0) | Some(1)) {
        return Err(EngineError::Invocation(std::io::Error::other(format!(
            "rg exited with status {:?}",
            output.status.code()
        ))));
    }
    if output.stdout.len() > MAX_ENGINE_OUTPUT {
        return Err(EngineError::OutputTooLarge);
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    Ok(parse_json_output(&stdout))
}

/// Parse rg's `--json` event stream. Only `match` events carry results;
/// `begin`/`end`/`summary` events and unparseable lines are skipped.
fn parse_json_output(output: &str) -> Vec<SearchMatch> {
    let mut matches = Vec::new();

    for line in output.lines() {
        let Ok(event) = serde_json::from_str::<serde_json::Value>(line) else {
            continue;
        };
        if event.get("type").and_then(|t| t.as_str()) != Some("match") {
            continue;
        }
        let Some(data) = event.get("data") else {
            continue;
        };

        let Some(path) = data
            .get("path")
            .and_then(|p| p.get("text"))
            .and_then(|t| t.as_str())
        else {
            continue;
        };
        let Some(line_number) = data.get("line_number").and_then(|n| n.as_u64()) else {
            continue;
        };
        let Some(text) = data
            .get("lines")
            .and_then(|l| l.get("text"))
            .and_then(|t| t.as_str())
        else {
            continue;
        };
        let match_text = text.trim_end_matches(['\n', '\r']).to_string();

        let Some(submatches) = data.get("submatches").and_then(|s| s.as_array()) else {
            continue;
        };

        for sub in submatches {
            let (Some(start), Some(end)) = (
                sub.get("start").and_then(|s| s.as_u64()),
                sub.get("end").and_then(|e| e.as_u64()),
            ) else {
                continue;
            };

            matches.push(SearchMatch {
                file_path: path.to_string(),
                line_number: line_number as u32,
                column: start as u32 + 1,
                match_text: match_text.clone(),
                range: MatchRange::on_line(
                    line_number as usize - 1,
                    start as usize,
                    end as usize,
                ),
            });
        }
    }

    matches
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_match_event() {
        let output = concat!(
            r#"{"type":"begin","data":{"path":{"text":"src/a.ts"}}}"#,
            "\n",
            r#"{"type":"match","data":{"path":{"text":"src/a.ts"},"lines":{"text":"import { cn } from './x'\n"},"line_number":3,"absolute_offset":40,"submatches":[{"match":{"text":"cn"},"start":9,"end":11}]}}"#,
            "\n",
            r#"{"type":"end","data":{"path":{"text":"src/a.ts"}}}"#,
            "\n",
        );

        let matches = parse_json_output(output);
        assert_eq!(matches.len(), 1);
        let m = &matches[0];
        assert_eq!(m.file_path, "src/a.ts");
        assert_eq!(m.line_number, 3);
        assert_eq!(m.column, 10);
        assert_eq!(m.match_text, "import { cn } from './x'");
        assert_eq!(m.range.start.line, 2);
        assert_eq!(m.range.start.character, 9);
        assert_eq!(m.range.end.character, 11);
    }

    #[test]
    fn test_parse_text_with_colons_survives() {
        let output = r#"{"type":"match","data":{"path":{"text":"a.ts"},"lines":{"text":"const url = 'http://x:8080';\n"},"line_number":1,"submatches":[{"match":{"text":"url"},"start":6,"end":9}]}}"#;
        let matches = parse_json_output(output);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].match_text, "const url = 'http://x:8080';");
        assert_eq!(matches[0].column, 7);
    }

    #[test]
    fn test_parse_multiple_submatches_on_one_line() {
        let output = r#"{"type":"match","data":{"path":{"text":"a.ts"},"lines":{"text":"foo foo\n"},"line_number":2,"submatches":[{"match":{"text":"foo"},"start":0,"end":3},{"match":{"text":"foo"},"start":4,"end":7}]}}"#;
        let matches = parse_json_output(output);
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].column, 1);
        assert_eq!(matches[1].column, 5);
        assert_eq!(matches[0].match_text, matches[1].match_text);
    }

    #[test]
    fn test_parse_skips_garbage_lines() {
        let output = "not json\n{\"type\":\"summary\",\"data\":{}}\n";
        assert!(parse_json_output(output).is_empty());
    }
}
