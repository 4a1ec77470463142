mod cli;
mod core;
mod doctor;
mod resolver;
mod search;
mod state;

use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() {
    let args = cli::Cli::parse();

    let default_filter = if args.verbose {
        "depsearch=debug"
    } else if args.quiet {
        "depsearch=error"
    } else {
        "depsearch=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = cli::run(args) {
        eprintln!("error: {:#}", err);
        std::process::exit(1);
    }
}
