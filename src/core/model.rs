//! Shared data model
//!
//! Match records produced by the search engines and the outbound message
//! payloads consumed by a presentation layer. Both search engines must map
//! to the same `SearchMatch` contract before anything is rendered.

use serde::{Deserialize, Serialize};

/// Search behavior flags. Pure value, no identity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Match case exactly. Default: case-insensitive.
    #[serde(rename = "isCaseSensitive", default)]
    pub case_sensitive: bool,

    /// Require non-word boundaries on both sides of the match.
    #[serde(rename = "isWholeWord", default)]
    pub whole_word: bool,
}

/// Zero-based line/character position within a file. Characters are byte
/// offsets into the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

/// Zero-based span of the matched substring, usable for jump-to-location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRange {
    pub start: Position,
    pub end: Position,
}

impl MatchRange {
    /// Span within a single line.
    pub fn on_line(line: usize, start: usize, end: usize) -> Self {
        Self {
            start: Position {
                line: line as u32,
                character: start as u32,
            },
            end: Position {
                line: line as u32,
                character: end as u32,
            },
        }
    }
}

/// One located occurrence of the query.
///
/// `match_text` is always the full line with the trailing newline trimmed;
/// `range` carries the span of the matched substring. Both engines honor
/// this contract identically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMatch {
    pub file_path: String,

    /// 1-based line number.
    pub line_number: u32,

    /// 1-based byte column of the match start.
    pub column: u32,

    pub match_text: String,

    pub range: MatchRange,
}

/// Outbound messages for the presentation layer, tagged by `title`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "title")]
pub enum Message {
    #[serde(rename = "importResults", rename_all = "camelCase")]
    ImportResults {
        entry_file: String,
        query: String,
        import_results: Vec<SearchMatch>,
    },

    #[serde(rename = "searchError")]
    SearchError { msg: String },

    #[serde(rename = "setEntryFile", rename_all = "camelCase")]
    SetEntryFile { entry_file: String },

    #[serde(rename = "restoreState", rename_all = "camelCase")]
    RestoreState {
        entry_file: String,
        query: String,
        is_case_sensitive: bool,
        is_whole_word: bool,
        import_results: Vec<SearchMatch>,
    },
}
