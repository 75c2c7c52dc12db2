//! Feed discovery - RSS/Atom URLs referenced by candidate pages
//!
//! Discovery is pure: it only reads link tags and anchors already captured in
//! `PageFacts`. When nothing is found it guesses well-known feed paths on the
//! site's origin. `verify_feeds` is the only networked function here and is
//! never called by the pipeline itself.

use std::collections::HashSet;
use std::time::Duration;

use crate::error::{BlogError, Result};
use crate::scoring::ScoredPage;
use crate::urls;

/// Paths tried on the site origin when no page references a feed
pub const WELL_KNOWN_FEED_PATHS: &[&str] = &[
    "/feed",
    "/rss",
    "/atom.xml",
    "/feed.xml",
    "/rss.xml",
    "/blog/feed",
    "/news/feed",
    "/articles/feed",
    "/index.xml",
];

/// Collect feed URLs from candidates, falling back to well-known paths
///
/// Output is deduplicated and ordered by first appearance.
pub fn discover_feeds(candidates: &[ScoredPage], fallback_paths: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut feeds = Vec::new();

    for candidate in candidates {
        let facts = &candidate.facts;
        for url in facts.feed_links.iter().chain(facts.feed_anchors.iter()) {
            if seen.insert(url.clone()) {
                feeds.push(url.clone());
            }
        }
    }

    if !feeds.is_empty() {
        return feeds;
    }

    let origin = match candidates.iter().find_map(|c| urls::site_origin(c.url())) {
        Some(origin) => origin,
        None => return feeds,
    };
    log::debug!("no feeds referenced, guessing well-known paths on {}", origin);

    for path in fallback_paths {
        let guess = format!("{}{}", origin, path);
        if url::Url::parse(&guess).is_ok() && seen.insert(guess.clone()) {
            feeds.push(guess);
        }
    }
    feeds
}

/// Default fallback paths as owned strings
pub fn default_feed_paths() -> Vec<String> {
    WELL_KNOWN_FEED_PATHS.iter().map(|p| p.to_string()).collect()
}

/// Fetch a URL and parse it as RSS, Atom, or JSON Feed
pub fn fetch_feed(agent: &ureq::Agent, url: &str) -> Result<feed_rs::model::Feed> {
    let response = agent
        .get(url)
        .header(
            "User-Agent",
            "Mozilla/5.0 (compatible; blogsift/0.1; feed verification)",
        )
        .call()?;
    let body = response.into_body().read_to_vec()?;

    feed_rs::parser::parse(body.as_slice())
        .map_err(|e| BlogError::FeedParseError(format!("{}: {}", url, e)))
}

/// Keep only the URLs that actually serve a parsable feed
///
/// Performs one blocking request per URL. Unreachable or unparsable URLs
/// are dropped and logged.
pub fn verify_feeds(candidates: &[String], timeout: Duration) -> Vec<String> {
    let agent: ureq::Agent = ureq::Agent::config_builder()
        .timeout_global(Some(timeout))
        .build()
        .into();

    candidates
        .iter()
        .filter(|url| match fetch_feed(&agent, url) {
            Ok(feed) => {
                log::debug!("verified feed {} ({} entries)", url, feed.entries.len());
                true
            }
            Err(e) => {
                log::debug!("dropping feed {}: {}", url, e);
                false
            }
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::score_page;
    use crate::types::Page;

    #[test]
    fn test_link_tags_and_anchors_are_collected() {
        let page = score_page(&Page::new(
            "https://ex.com/blog",
            r#"<html><head>
                <link rel="alternate" type="application/rss+xml" href="/feed">
                <link rel="alternate" type="application/atom+xml" href="https://ex.com/atom.xml">
            </head><body>
                <a href="/blog/rss">Subscribe</a>
                <a href="/feed">Feed again</a>
            </body></html>"#,
        ));

        let feeds = discover_feeds(&[page], &default_feed_paths());
        assert_eq!(
            feeds,
            vec![
                "https://ex.com/feed".to_string(),
                "https://ex.com/atom.xml".to_string(),
                "https://ex.com/blog/rss".to_string(),
            ]
        );
    }

    #[test]
    fn test_fallback_guesses_on_origin() {
        let page = score_page(&Page::new("https://ex.com/blog/", "<html></html>"));
        let feeds = discover_feeds(&[page], &default_feed_paths());

        assert_eq!(feeds.len(), WELL_KNOWN_FEED_PATHS.len());
        assert!(feeds.contains(&"https://ex.com/feed".to_string()));
        assert!(feeds.contains(&"https://ex.com/index.xml".to_string()));
    }

    #[test]
    fn test_no_candidates_no_feeds() {
        assert!(discover_feeds(&[], &default_feed_paths()).is_empty());
    }

    #[test]
    fn test_feeds_across_candidates_are_deduplicated() {
        let html = r#"<html><head><link type="application/rss+xml" href="/feed"></head></html>"#;
        let a = score_page(&Page::new("https://ex.com/blog", html));
        let b = score_page(&Page::new("https://ex.com/news", html));
        assert_eq!(discover_feeds(&[a, b], &[]), vec!["https://ex.com/feed".to_string()]);
    }
}
