//! Session state persistence
//!
//! The last completed search is written to `.depsearch/state.json` under
//! the project root, so a later session can restore the entry file, query,
//! flags, and results without re-running anything.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::model::{Message, SearchMatch, SearchOptions};

pub const STATE_DIR: &str = ".depsearch";
pub const STATE_FILE: &str = "state.json";

/// A completed search, as persisted between sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub entry_file: String,
    pub query: String,
    pub is_case_sensitive: bool,
    pub is_whole_word: bool,
    pub import_results: Vec<SearchMatch>,
    pub saved_at: DateTime<Utc>,
}

impl SessionState {
    pub fn new(
        entry_file: String,
        query: String,
        options: SearchOptions,
        import_results: Vec<SearchMatch>,
    ) -> Self {
        Self {
            entry_file,
            query,
            is_case_sensitive: options.case_sensitive,
            is_whole_word: options.whole_word,
            import_results,
            saved_at: Utc::now(),
        }
    }

    /// The restore message a presentation layer replays on startup.
    pub fn into_message(self) -> Message {
        Message::RestoreState {
            entry_file: self.entry_file,
            query: self.query,
            is_case_sensitive: self.is_case_sensitive,
            is_whole_word: self.is_whole_word,
            import_results: self.import_results,
        }
    }
}

fn state_path(project_root: &Path) -> PathBuf {
    project_root.join(STATE_DIR).join(STATE_FILE)
}

/// Persist `state` under `project_root`, creating the state directory if
/// needed. Overwrites any previous state.
pub fn save(project_root: &Path, state: &SessionState) -> Result<()> {
    let dir = project_root.join(STATE_DIR);
    fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create state directory {}", dir.display()))?;

    let path = dir.join(STATE_FILE);
    let json = serde_json::to_string_pretty(state).context("failed to serialize state")?;
    fs::write(&path, json)
        .with_context(|| format!("failed to write state file {}", path.display()))?;
    Ok(())
}

/// Load the persisted state under `project_root`, if any. A missing file
/// is `None`; a corrupt one is an error.
pub fn load(project_root: &Path) -> Result<Option<SessionState>> {
    let path = state_path(project_root);
    if !path.is_file() {
        return Ok(None);
    }

    let raw = fs::read_to_string(&path)
        .with_context(|| format!("failed to read state file {}", path.display()))?;
    let state = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse state file {}", path.display()))?;
    Ok(Some(state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::MatchRange;
    use tempfile::tempdir;

    fn sample_state() -> SessionState {
        SessionState::new(
            "src/a.ts".to_string(),
            "cn".to_string(),
            SearchOptions {
                case_sensitive: true,
                whole_word: false,
            },
            vec![SearchMatch {
                file_path: "src/b.ts".to_string(),
                line_number: 1,
                column: 10,
                match_text: "import { cn } from './x'".to_string(),
                range: MatchRange::on_line(0, 9, 11),
            }],
        )
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let temp = tempdir().unwrap();
        let state = sample_state();

        save(temp.path(), &state).unwrap();
        let loaded = load(temp.path()).unwrap().unwrap();

        assert_eq!(loaded, state);
    }

    #[test]
    fn test_load_without_state_is_none() {
        let temp = tempdir().unwrap();
        assert!(load(temp.path()).unwrap().is_none());
    }

    #[test]
    fn test_load_corrupt_state_is_error() {
        let temp = tempdir().unwrap();
        let dir = temp.path().join(STATE_DIR);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(STATE_FILE), "{broken").unwrap();

        assert!(load(temp.path()).is_err());
    }

    #[test]
    fn test_save_overwrites_previous_state() {
        let temp = tempdir().unwrap();
        let first = sample_state();
        save(temp.path(), &first).unwrap();

        let mut second = sample_state();
        second.query = "other".to_string();
        save(temp.path(), &second).unwrap();

        assert_eq!(load(temp.path()).unwrap().unwrap().query, "other");
    }

    #[test]
    fn test_into_message() {
        let msg = sample_state().into_message();
        match msg {
            Message::RestoreState {
                query,
                is_case_sensitive,
                ..
            } => {
                assert_eq!(query, "cn");
                assert!(is_case_sensitive);
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[test]
    fn test_state_serializes_camel_case() {
        let json = serde_json::to_string(&sample_state()).unwrap();
        assert!(json.contains("\"entryFile\""));
        assert!(json.contains("\"isCaseSensitive\""));
        assert!(json.contains("\"importResults\""));
        assert!(json.contains("\"savedAt\""));
    }
}
