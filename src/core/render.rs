//! Renderer module
//!
//! Renders outbound messages and file lists to the supported output
//! formats: jsonl, json, text.

use colored::Colorize;

use crate::core::model::{Message, SearchMatch};

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Jsonl,
    Json,
    Text,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jsonl" => Ok(OutputFormat::Jsonl),
            "json" => Ok(OutputFormat::Json),
            "text" | "txt" => Ok(OutputFormat::Text),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

/// Render configuration combining format and options
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderConfig {
    pub format: OutputFormat,
    pub pretty: bool,
}

impl RenderConfig {
    #[allow(dead_code)]
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            pretty: false,
        }
    }

    pub fn with_pretty(format: OutputFormat, pretty: bool) -> Self {
        Self { format, pretty }
    }
}

/// Renderer for messages and file lists
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Render one outbound message
    pub fn render_message(&self, message: &Message) -> String {
        match self.config.format {
            OutputFormat::Jsonl | OutputFormat::Json => self.to_json(message),
            OutputFormat::Text => render_message_text(message),
        }
    }

    /// Render a resolved closure as a file list
    pub fn render_files(&self, files: &[String]) -> String {
        match self.config.format {
            OutputFormat::Jsonl => files
                .iter()
                .map(|f| self.to_json(&serde_json::json!({ "path": f })))
                .collect::<Vec<_>>()
                .join("\n"),
            OutputFormat::Json => {
                let items: Vec<_> = files
                    .iter()
                    .map(|f| serde_json::json!({ "path": f }))
                    .collect();
                self.to_json(&items)
            }
            OutputFormat::Text => files.join("\n"),
        }
    }

    /// Render an arbitrary serializable report (doctor output and the like)
    pub fn render_report<T: serde::Serialize>(&self, value: &T) -> String {
        self.to_json(value)
    }

    fn to_json<T: serde::Serialize>(&self, value: &T) -> String {
        let rendered = if self.config.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        rendered.unwrap_or_else(|_| "{}".to_string())
    }
}

fn render_message_text(message: &Message) -> String {
    match message {
        Message::ImportResults {
            entry_file,
            query,
            import_results,
        } => {
            let mut out = format!(
                "{} matches for '{}' from {}\n",
                import_results.len(),
                query.bold(),
                entry_file
            );
            out.push_str(&render_matches_text(import_results));
            out
        }
        Message::SearchError { msg } => format!("{} {}", "error:".red().bold(), msg),
        Message::SetEntryFile { entry_file } => format!("entry file: {}", entry_file.cyan()),
        Message::RestoreState {
            entry_file,
            query,
            is_case_sensitive,
            is_whole_word,
            import_results,
        } => {
            let mut out = format!(
                "last search: '{}' from {} (case-sensitive: {}, whole-word: {})\n",
                query.bold(),
                entry_file,
                is_case_sensitive,
                is_whole_word
            );
            out.push_str(&render_matches_text(import_results));
            out
        }
    }
}

fn render_matches_text(matches: &[SearchMatch]) -> String {
    matches
        .iter()
        .map(|m| {
            format!(
                "{}:{}:{}: {}",
                m.file_path.cyan(),
                m.line_number.to_string().yellow(),
                m.column.to_string().yellow(),
                m.match_text
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
