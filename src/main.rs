//! blogsift - find a site's blog and its articles in crawled HTML

use clap::Parser;
use colored::Colorize;

use blogsift::cli::{Cli, Commands};
use blogsift::error::Result;

mod commands;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        if let Some(hint) = e.hint() {
            eprintln!("{}", hint.dimmed());
        }
        std::process::exit(1);
    }
}

/// Log to stderr at warn, or debug with --verbose; RUST_LOG takes precedence
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Extract {
            input,
            json,
            verify_feeds,
            threshold,
        } => commands::cmd_extract(&input, json, verify_feeds, threshold),
        Commands::Score { input, json } => commands::cmd_score(&input, json),
        Commands::CheckUrl { urls } => commands::cmd_check_url(&urls),
        Commands::Completions { shell } => commands::cmd_completions(shell),
    }
}
