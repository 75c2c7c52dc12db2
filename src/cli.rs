use clap::{Parser, Subcommand, ValueEnum};

/// Shell types for completion generation
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

#[derive(Parser)]
#[command(name = "blogsift")]
#[command(author, version, about = "Find a site's blog and its articles in crawled HTML", long_about = None)]
#[command(after_help = r#"Examples:
  blogsift extract pages.json                 Detect the blog and list its articles
  blogsift extract pages.json --json          Same, as JSON for scripting
  crawler | blogsift extract -                Read pages from stdin
  blogsift score pages.json                   Show each page's blog score
  blogsift check-url https://ex.com/blog/x    Does a URL look like a post?

Input is a JSON array of crawled pages:
  [{"url": "https://example.com/blog", "html": "<html>...</html>"}]
"#)]
pub struct Cli {
    /// Show debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Detect the blog, pick its index page, and harvest articles
    #[command(after_help = r#"Examples:
  blogsift extract pages.json
  blogsift extract pages.json --json | jq '.articles[].url'
  blogsift extract pages.json --verify-feeds     Fetch feeds to confirm them
  blogsift extract pages.json --threshold 4      Stricter candidate filter
"#)]
    Extract {
        /// JSON file of pages, or - for stdin
        #[arg(value_name = "INPUT")]
        input: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Fetch each discovered feed and keep only real RSS/Atom feeds
        #[arg(long)]
        verify_feeds: bool,

        /// Override the candidate score threshold (0-10)
        #[arg(long)]
        threshold: Option<f32>,
    },

    /// Show the blog score and fired signals of every page
    Score {
        /// JSON file of pages, or - for stdin
        #[arg(value_name = "INPUT")]
        input: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check whether URLs look like individual blog posts
    CheckUrl {
        /// URLs to check
        #[arg(required = true)]
        urls: Vec<String>,
    },

    /// Generate shell completions
    #[command(after_help = r#"Examples:
  blogsift completions bash > ~/.local/share/bash-completion/completions/blogsift
  blogsift completions zsh > ~/.zfunc/_blogsift
  blogsift completions fish > ~/.config/fish/completions/blogsift.fish
"#)]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: CompletionShell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_extract_flags() {
        let cli = Cli::parse_from(["blogsift", "-v", "extract", "pages.json", "--json", "--threshold", "3.5"]);
        assert!(cli.verbose);
        match cli.command {
            Commands::Extract { input, json, verify_feeds, threshold } => {
                assert_eq!(input, "pages.json");
                assert!(json);
                assert!(!verify_feeds);
                assert_eq!(threshold, Some(3.5));
            }
            _ => panic!("expected extract"),
        }
    }
}
