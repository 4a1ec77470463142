//! Built-in search engine
//!
//! Pure-Rust line scanner used when the external rg binary is missing or
//! misbehaves. The query is escaped before compilation, so it is always a
//! literal, and the produced records follow the same contract as the rg
//! backend: full line text, byte-based columns.

use std::path::PathBuf;

use regex::RegexBuilder;
use tracing::warn;

use crate::core::model::{MatchRange, SearchMatch, SearchOptions};
use crate::core::paths::normalize_path;

/// Scan `files` for literal occurrences of `query`.
///
/// Unreadable files are skipped with a warning; file content is read
/// lossily so stray invalid UTF-8 cannot abort the whole search.
pub fn run(files: &[PathBuf], query: &str, options: SearchOptions) -> Vec<SearchMatch> {
    let mut pattern = regex::escape(query);
    if options.whole_word {
        pattern = format!(r"\b{}\b", pattern);
    }

    let regex = match RegexBuilder::new(&pattern)
        .case_insensitive(!options.case_sensitive)
        .build()
    {
        Ok(regex) => regex,
        Err(err) => {
            warn!(%err, "failed to compile search pattern");
            return Vec::new();
        }
    };

    let mut matches = Vec::new();

    for file in files {
        let raw = match std::fs::read(file) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(path = %file.display(), %err, "skipping unreadable file");
                continue;
            }
        };
        let content = String::from_utf8_lossy(&raw);
        let file_path = normalize_path(file);

        for (index, line) in content.lines().enumerate() {
            for found in regex.find_iter(line) {
                matches.push(SearchMatch {
                    file_path: file_path.clone(),
                    line_number: index as u32 + 1,
                    column: found.start() as u32 + 1,
                    match_text: line.to_string(),
                    range: MatchRange::on_line(index, found.start(), found.end()),
                });
            }
        }
    }

    matches
}
