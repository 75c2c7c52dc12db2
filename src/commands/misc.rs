use std::io;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use colored::Colorize;

use blogsift::cli::{Cli, CompletionShell};
use blogsift::error::Result;
use blogsift::urls::is_blog_post_url;

/// Print whether each URL passes the article-URL predicate
pub fn cmd_check_url(urls: &[String]) -> Result<()> {
    for url in urls {
        let verdict = if is_blog_post_url(url) {
            "post".green()
        } else {
            "not a post".yellow()
        };
        println!("{:<12} {}", verdict, url);
    }
    Ok(())
}

/// Generate shell completions
pub fn cmd_completions(shell: CompletionShell) -> Result<()> {
    let mut cmd = Cli::command();
    let shell = match shell {
        CompletionShell::Bash => Shell::Bash,
        CompletionShell::Zsh => Shell::Zsh,
        CompletionShell::Fish => Shell::Fish,
        CompletionShell::Powershell => Shell::PowerShell,
    };
    generate(shell, &mut cmd, "blogsift", &mut io::stdout());
    Ok(())
}
