//! Index selection - which candidate is the blog's listing page
//!
//! The blog score measures how much a page looks like blog content; a single
//! post scores high on that. The index score instead rewards listing shape:
//! a short keyword path, many repeated entries, pagination, and sidebar widgets.

use url::Url;

use crate::error::Result;
use crate::page_facts::PageFacts;
use crate::scoring::ScoredPage;
use crate::urls;

/// Each entry is (threshold, weight): the first threshold the count exceeds wins
const ARTICLE_COUNT_BANDS: &[(usize, f32)] = &[(5, 3.0), (2, 2.0), (0, 0.5)];
const POST_COUNT_BANDS: &[(usize, f32)] = &[(5, 2.5), (2, 1.5), (0, 0.5)];

const SINGLE_KEYWORD_PATH: f32 = 3.0;
const KEYWORD_INDEX_PATH: f32 = 2.0;
const UNDATED_PATH: f32 = 0.5;
const PAGINATION: f32 = 3.0;
const TAXONOMY_WIDGET: f32 = 1.5;
const ARCHIVE_WIDGET: f32 = 1.5;
const RECENT_POSTS_WIDGET: f32 = 1.5;
const ROOT_WITH_POSTS: f32 = 1.0;
const TITLE_KEYWORD: f32 = 1.5;
const H1_KEYWORD: f32 = 2.0;
const METADATA_PAGINATION: f32 = 2.0;
const METADATA_MULTIPLE_ARTICLES: f32 = 2.0;
const METADATA_CATEGORIES: f32 = 1.5;
const METADATA_FEED: f32 = 1.5;
const FEED_LINK: f32 = 2.0;
/// Divisor applied to the blog score carried over as a tie-breaker
const BLOG_SCORE_DIVISOR: f32 = 5.0;

fn band(count: usize, bands: &[(usize, f32)]) -> f32 {
    bands
        .iter()
        .find(|(threshold, _)| count > *threshold)
        .map(|(_, weight)| *weight)
        .unwrap_or(0.0)
}

/// Score for the URL path shape alone
fn path_score(segments: &[String], has_date: bool) -> f32 {
    match segments {
        [only] if urls::is_blog_keyword(only) => SINGLE_KEYWORD_PATH,
        [first, second] if urls::is_blog_keyword(first) && urls::is_index_segment(second) => {
            KEYWORD_INDEX_PATH
        }
        _ if !has_date => UNDATED_PATH,
        _ => 0.0,
    }
}

/// Index score from facts alone (no URL parsing)
fn facts_index_score(facts: &PageFacts, blog_score: f32) -> f32 {
    let mut score = path_score(&facts.path_segments, facts.has_date_in_url);

    score += band(facts.article_count, ARTICLE_COUNT_BANDS);
    score += band(facts.post_count, POST_COUNT_BANDS);

    if facts.has_pagination {
        score += PAGINATION;
    }
    if facts.has_sidebar_taxonomy || facts.has_tag_markup {
        score += TAXONOMY_WIDGET;
    }
    if facts.has_archive_widget {
        score += ARCHIVE_WIDGET;
    }
    if facts.has_recent_posts {
        score += RECENT_POSTS_WIDGET;
    }
    if facts.is_root && (facts.article_count > 0 || facts.post_count > 0) {
        score += ROOT_WITH_POSTS;
    }

    if facts.title.as_deref().map(urls::text_has_blog_keyword).unwrap_or(false) {
        score += TITLE_KEYWORD;
    }
    if facts.h1.as_deref().map(urls::text_has_blog_keyword).unwrap_or(false) {
        score += H1_KEYWORD;
    }

    let metadata = &facts.metadata;
    if metadata.has_pagination {
        score += METADATA_PAGINATION;
    }
    if metadata.has_multiple_articles {
        score += METADATA_MULTIPLE_ARTICLES;
    }
    if metadata.has_categories {
        score += METADATA_CATEGORIES;
    }
    if metadata.has_feed() {
        score += METADATA_FEED;
    }
    if !facts.feed_links.is_empty() {
        score += FEED_LINK;
    }

    score + blog_score / BLOG_SCORE_DIVISOR
}

/// Index score of one candidate, failing if its URL does not parse
pub fn index_score(candidate: &ScoredPage) -> Result<f32> {
    Url::parse(candidate.url())?;
    Ok(facts_index_score(&candidate.facts, candidate.blog_score))
}

/// Pick the candidate most likely to be the blog index
///
/// A single candidate is the index by definition. Otherwise the highest
/// index score wins, earliest candidate on ties. Candidates whose score
/// cannot be computed are skipped; if none can be, the first candidate wins.
pub fn select_index(candidates: &[ScoredPage]) -> Option<&ScoredPage> {
    let first = candidates.first()?;
    if candidates.len() == 1 {
        return Some(first);
    }

    let mut best: Option<(&ScoredPage, f32)> = None;
    for candidate in candidates {
        let score = match index_score(candidate) {
            Ok(s) => s,
            Err(e) => {
                log::warn!("could not compute index score for {}: {}", candidate.url(), e);
                continue;
            }
        };
        log::debug!("index score {:.2} for {}", score, candidate.url());

        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((candidate, score)),
        }
    }

    Some(best.map(|(page, _)| page).unwrap_or(first))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;
    use crate::scoring::score_page;
    use crate::types::Page;

    fn scored(url: &str, html: &str) -> ScoredPage {
        score_page(&Page::new(url, html))
    }

    #[test]
    fn test_bands() {
        assert_eq!(band(0, ARTICLE_COUNT_BANDS), 0.0);
        assert_eq!(band(1, ARTICLE_COUNT_BANDS), 0.5);
        assert_eq!(band(3, ARTICLE_COUNT_BANDS), 2.0);
        assert_eq!(band(6, ARTICLE_COUNT_BANDS), 3.0);
        assert_eq!(band(6, POST_COUNT_BANDS), 2.5);
    }

    #[test]
    fn test_path_shapes() {
        let seg = |s: &[&str]| s.iter().map(|x| x.to_string()).collect::<Vec<_>>();
        assert_eq!(path_score(&seg(&["blog"]), false), SINGLE_KEYWORD_PATH);
        assert_eq!(path_score(&seg(&["news", "page2"]), false), KEYWORD_INDEX_PATH);
        assert_eq!(path_score(&seg(&["about"]), false), UNDATED_PATH);
        assert_eq!(path_score(&seg(&["blog", "2023", "05", "x"]), true), 0.0);
    }

    #[test]
    fn test_single_candidate_is_index() {
        let only = scored("https://ex.com/some/deep/post-with-a-long-slug", "<html></html>");
        let candidates = vec![only];
        assert_eq!(
            select_index(&candidates).map(|p| p.url()),
            Some("https://ex.com/some/deep/post-with-a-long-slug")
        );
    }

    #[test]
    fn test_empty_candidates() {
        assert!(select_index(&[]).is_none());
    }

    #[test]
    fn test_ties_go_to_first_candidate() {
        let html = "<html><body><article></article></body></html>";
        let candidates = vec![
            scored("https://ex.com/blog", html),
            scored("https://ex.com/news", html),
        ];
        assert_eq!(select_index(&candidates).map(|p| p.url()), Some("https://ex.com/blog"));
    }

    #[test]
    fn test_unscorable_candidates_fall_back_to_first() {
        let candidates = vec![
            ScoredPage {
                page: Page::new("::bad::", ""),
                blog_score: 5.0,
                facts: PageFacts::default(),
                document: Document::empty(),
            },
            ScoredPage {
                page: Page::new("also bad", ""),
                blog_score: 4.0,
                facts: PageFacts::default(),
                document: Document::empty(),
            },
        ];
        assert_eq!(select_index(&candidates).map(|p| p.url()), Some("::bad::"));
    }

    #[test]
    fn test_listing_beats_post() {
        let listing = scored(
            "https://ex.com/blog",
            r#"<html><body>
                <article class="post"><h2>One</h2></article>
                <article class="post"><h2>Two</h2></article>
                <article class="post"><h2>Three</h2></article>
                <div class="widget_recent_entries"></div>
            </body></html>"#,
        );
        let post = scored(
            "https://ex.com/blog/2024/01/02/a-single-post",
            r#"<html><body><article class="post"><h1>A single post</h1></article></body></html>"#,
        );
        let candidates = vec![post, listing];
        assert_eq!(select_index(&candidates).map(|p| p.url()), Some("https://ex.com/blog"));
    }

    #[test]
    fn test_atom_feed_counts_like_rss() {
        let page = |link_type: &str| {
            scored(
                "https://ex.com/blog",
                &format!(
                    r#"<html><head><link rel="alternate" type="{}" href="/feed"></head>
                    <body><article></article></body></html>"#,
                    link_type
                ),
            )
        };
        let rss = index_score(&page("application/rss+xml")).unwrap();
        let atom = index_score(&page("application/atom+xml")).unwrap();
        let none = index_score(&page("text/css")).unwrap();

        assert!((rss - atom).abs() < 1e-6, "rss {} vs atom {}", rss, atom);
        assert!(atom - none >= METADATA_FEED + FEED_LINK);
    }
}
