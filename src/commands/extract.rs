use colored::Colorize;

use blogsift::config::Config;
use blogsift::error::Result;
use blogsift::{feeds, BlogExtractionResult, Extractor};

use super::load_pages;

/// Run the full pipeline over a page list and print the result
pub fn cmd_extract(input: &str, json: bool, verify_feeds: bool, threshold: Option<f32>) -> Result<()> {
    let mut config = Config::load()?;
    if let Some(threshold) = threshold {
        config = config.with_score_threshold(threshold)?;
    }

    let pages = load_pages(input)?;
    let extractor = Extractor::new(config);
    let mut result = extractor.extract(&pages);

    if verify_feeds && !result.rss_feeds.is_empty() {
        result.rss_feeds = feeds::verify_feeds(&result.rss_feeds, extractor.config().verify_timeout());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    print_result(&result, pages.len());
    Ok(())
}

fn print_result(result: &BlogExtractionResult, page_count: usize) {
    if !result.has_blog {
        println!("No blog found in {} page(s).", page_count);
        return;
    }

    println!();
    if let Some(ref url) = result.blog_url {
        println!("{} {}", "Blog:".bold(), url.cyan());
    }

    if result.rss_feeds.is_empty() {
        println!("{} none", "Feeds:".bold());
    } else {
        println!("{}", "Feeds:".bold());
        for feed in &result.rss_feeds {
            println!("  {}", feed);
        }
    }

    println!();
    if result.articles.is_empty() {
        println!("No articles harvested.");
        return;
    }

    println!("{} ({})", "Articles".bold(), result.articles.len());
    for (i, article) in result.articles.iter().enumerate() {
        println!("\n  {}. {}", i + 1, article.title.bold());
        println!("     {}", article.url.dimmed());
        let mut details = Vec::new();
        if let Some(ref date) = article.date {
            details.push(date.clone());
        }
        if let Some(ref author) = article.author {
            details.push(format!("by {}", author));
        }
        if !details.is_empty() {
            println!("     {}", details.join(" | "));
        }
        if let Some(ref excerpt) = article.excerpt {
            println!("     {}", truncate_str(excerpt, 100));
        }
    }
    println!();
}

/// Truncate a string to max_len characters (not bytes), adding "..." if truncated.
fn truncate_str(s: &str, max_len: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", chars[..max_len.saturating_sub(3)].iter().collect::<String>())
    }
}
