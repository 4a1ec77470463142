//! Command-line interface

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::core::model::{Message, SearchOptions};
use crate::core::paths::{absolutize, normalize_path};
use crate::core::render::{OutputFormat, RenderConfig, Renderer};
use crate::resolver::{config, DependencyResolver, ResolverOptions, DEFAULT_MAX_DEPTH};
use crate::{doctor, search, state};

#[derive(Parser)]
#[command(
    name = "depsearch",
    version,
    about = "Search text across a source file's import dependency closure",
    long_about = "depsearch resolves the transitive import/require closure of an entry \
file (bounded by depth, with cycle and exclusion handling), then runs a literal \
text search across that closure. ripgrep is used when available, with a built-in \
engine as fallback; both produce identical match records."
)]
pub struct Cli {
    /// Output format: jsonl, json, or text
    #[arg(long, global = true, default_value = "jsonl")]
    pub format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve and print the dependency closure of an entry file
    #[command(long_about = "Resolve the transitive import closure of FILE and print the \
resulting file set in discovery order. Traversal is breadth-first, bounded by \
--max-depth, and skips declaration files plus excluded path segments.")]
    Deps {
        /// Entry source file
        file: PathBuf,

        /// Maximum traversal depth
        #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
        max_depth: usize,

        /// Traverse `import type` edges as well
        #[arg(long)]
        follow_type_imports: bool,

        /// Additional path segments to exclude (repeatable)
        #[arg(long = "exclude", value_name = "SEGMENT")]
        exclude: Vec<String>,
    },

    /// Search the dependency closure of an entry file for a literal query
    #[command(long_about = "Resolve the closure of FILE, then search every file in it for \
QUERY as a literal string. Emits an importResults message with one record per \
occurrence (full line text plus the matched span). Input and environment \
problems are reported as a searchError message rather than a failure exit.")]
    Search {
        /// Entry source file
        file: PathBuf,

        /// Literal text to search for
        query: String,

        /// Match case exactly
        #[arg(short = 'c', long)]
        case_sensitive: bool,

        /// Match whole words only
        #[arg(short = 'w', long)]
        whole_word: bool,

        /// Maximum traversal depth
        #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
        max_depth: usize,

        /// Skip the external rg backend and use the built-in engine
        #[arg(long)]
        no_rg: bool,

        /// Additional path segments to exclude (repeatable)
        #[arg(long = "exclude", value_name = "SEGMENT")]
        exclude: Vec<String>,
    },

    /// Replay the last saved search session
    State {
        /// Project root holding the saved state
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Report which search engine is available
    Doctor,
}

pub fn run(cli: Cli) -> Result<()> {
    let renderer = Renderer::with_config(RenderConfig::with_pretty(cli.format, cli.pretty));

    match cli.command {
        Commands::Deps {
            file,
            max_depth,
            follow_type_imports,
            exclude,
        } => run_deps(&renderer, &file, max_depth, follow_type_imports, exclude),
        Commands::Search {
            file,
            query,
            case_sensitive,
            whole_word,
            max_depth,
            no_rg,
            exclude,
        } => {
            let options = SearchOptions {
                case_sensitive,
                whole_word,
            };
            run_search(&renderer, &file, &query, options, max_depth, no_rg, exclude)
        }
        Commands::State { path } => run_state(&renderer, &path),
        Commands::Doctor => {
            let report = doctor::report();
            println!(
                "{}",
                doctor::render(&report, RenderConfig::with_pretty(cli.format, cli.pretty))
            );
            Ok(())
        }
    }
}

fn run_deps(
    renderer: &Renderer,
    file: &Path,
    max_depth: usize,
    follow_type_imports: bool,
    exclude: Vec<String>,
) -> Result<()> {
    let mut resolver = DependencyResolver::new(ResolverOptions {
        max_depth,
        follow_type_imports,
        exclude_segments: exclude,
    });
    let closure = resolver.resolve(file)?;
    tracing::debug!(entry = %closure.entry().display(), files = closure.len(), "closure ready");

    let message = Message::SetEntryFile {
        entry_file: normalize_path(file),
    };
    println!("{}", renderer.render_message(&message));
    println!("{}", renderer.render_files(&closure.file_strings()));
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_search(
    renderer: &Renderer,
    file: &Path,
    query: &str,
    options: SearchOptions,
    max_depth: usize,
    no_rg: bool,
    exclude: Vec<String>,
) -> Result<()> {
    // Bad input is a reported condition, not a failed process.
    if file.as_os_str().is_empty() {
        return emit_search_error(renderer, "no entry file selected");
    }
    if query.trim().is_empty() {
        return emit_search_error(renderer, "search query is empty");
    }

    let mut resolver = DependencyResolver::new(ResolverOptions {
        max_depth,
        follow_type_imports: false,
        exclude_segments: exclude,
    });
    let closure = match resolver.resolve(file) {
        Ok(closure) => closure,
        Err(err) => return emit_search_error(renderer, &err.to_string()),
    };

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let abs_entry = absolutize(file, &cwd);

    let files = closure.file_strings();
    let matches = search::search_with_engines(&files, query, options, &abs_entry, !no_rg);

    let entry_file = normalize_path(file);
    let message = Message::ImportResults {
        entry_file: entry_file.clone(),
        query: query.to_string(),
        import_results: matches.clone(),
    };
    println!("{}", renderer.render_message(&message));

    let project_root = config::project_root_for(&abs_entry);
    let session = state::SessionState::new(entry_file, query.to_string(), options, matches);
    if let Err(err) = state::save(&project_root, &session) {
        tracing::warn!(%err, "failed to persist session state");
    }

    Ok(())
}

fn run_state(renderer: &Renderer, path: &Path) -> Result<()> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    // State lives under the project root, so map PATH to the project
    // containing it rather than treating it as the state root directly.
    let root = config::project_root_for_dir(&absolutize(path, &cwd));

    match state::load(&root) {
        Ok(Some(session)) => {
            println!("{}", renderer.render_message(&session.into_message()));
            Ok(())
        }
        Ok(None) => emit_search_error(
            renderer,
            &format!("no saved session state under {}", root.display()),
        ),
        Err(err) => emit_search_error(renderer, &format!("{:#}", err)),
    }
}

fn emit_search_error(renderer: &Renderer, msg: &str) -> Result<()> {
    let message = Message::SearchError {
        msg: msg.to_string(),
    };
    println!("{}", renderer.render_message(&message));
    Ok(())
}
