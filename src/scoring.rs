//! Page scoring - how "blog-like" is each crawled page
//!
//! Every signal is a boolean predicate over `PageFacts` paired with a weight in
//! `BLOG_SIGNAL_WEIGHTS`. A page's score is the sum of the weights of the
//! signals that fire, plus three times its metadata indicator fraction,
//! clamped to [0, 10].

use std::fmt;

use serde::Serialize;
use url::Url;

use crate::dom::Document;
use crate::error::Result;
use crate::page_facts::PageFacts;
use crate::types::Page;
use crate::urls;

/// Minimum blog score for a page to become a candidate
pub const BLOG_SCORE_THRESHOLD: f32 = 2.5;

/// Upper bound of the blog score
pub const MAX_BLOG_SCORE: f32 = 10.0;

/// Weight applied to `BlogMetadata::blog_indicator_score`
pub const INDICATOR_WEIGHT: f32 = 3.0;

/// A discrete blog signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlogSignal {
    UrlBlogKeyword,
    UrlBlogSubpath,
    UrlDatePattern,
    TitleKeyword,
    HeadingKeyword,
    ManyArticles,
    SomeArticles,
    ManyPostClasses,
    SomePostClasses,
    Pagination,
    DateMarkup,
    AuthorMarkup,
    Comments,
    TagMarkup,
    SocialShare,
    BlogBodyClass,
    CmsFingerprint,
    FeedLink,
    BlogSchema,
}

/// Signal weights. The scorer is a fold over this table.
pub const BLOG_SIGNAL_WEIGHTS: &[(BlogSignal, f32)] = &[
    (BlogSignal::UrlBlogKeyword, 2.0),
    (BlogSignal::UrlBlogSubpath, 1.0),
    (BlogSignal::UrlDatePattern, 1.5),
    (BlogSignal::TitleKeyword, 1.5),
    (BlogSignal::HeadingKeyword, 1.0),
    (BlogSignal::ManyArticles, 2.0),
    (BlogSignal::SomeArticles, 1.0),
    (BlogSignal::ManyPostClasses, 1.5),
    (BlogSignal::SomePostClasses, 0.8),
    (BlogSignal::Pagination, 1.5),
    (BlogSignal::DateMarkup, 1.0),
    (BlogSignal::AuthorMarkup, 0.8),
    (BlogSignal::Comments, 0.8),
    (BlogSignal::TagMarkup, 1.0),
    (BlogSignal::SocialShare, 0.5),
    (BlogSignal::BlogBodyClass, 1.5),
    (BlogSignal::CmsFingerprint, 1.5),
    (BlogSignal::FeedLink, 2.0),
    (BlogSignal::BlogSchema, 1.5),
];

impl BlogSignal {
    /// Whether this signal fires for a page
    pub fn fires(self, facts: &PageFacts) -> bool {
        match self {
            BlogSignal::UrlBlogKeyword => {
                facts.path_segments.iter().any(|s| urls::is_blog_keyword(s))
            }
            BlogSignal::UrlBlogSubpath => {
                facts.path_segments.iter().any(|s| urls::is_blog_subpath(s))
            }
            BlogSignal::UrlDatePattern => facts.has_date_in_url,
            BlogSignal::TitleKeyword => facts
                .title
                .as_deref()
                .map(urls::text_has_blog_keyword)
                .unwrap_or(false),
            BlogSignal::HeadingKeyword => {
                facts.headings.iter().any(|h| urls::text_has_blog_keyword(h))
            }
            BlogSignal::ManyArticles => facts.article_count > 3,
            BlogSignal::SomeArticles => (1..=3).contains(&facts.article_count),
            BlogSignal::ManyPostClasses => facts.post_count > 3,
            BlogSignal::SomePostClasses => (1..=3).contains(&facts.post_count),
            BlogSignal::Pagination => facts.has_pagination,
            BlogSignal::DateMarkup => facts.has_date_markup,
            BlogSignal::AuthorMarkup => facts.has_author_markup,
            BlogSignal::Comments => facts.has_comments,
            BlogSignal::TagMarkup => facts.has_tag_markup,
            BlogSignal::SocialShare => facts.has_social_share,
            BlogSignal::BlogBodyClass => facts.has_blog_body_class,
            BlogSignal::CmsFingerprint => {
                facts.cms.map(|c| c.is_blog_platform()).unwrap_or(false)
            }
            BlogSignal::FeedLink => facts.metadata.has_feed(),
            BlogSignal::BlogSchema => facts.metadata.has_any_schema(),
        }
    }
}

impl fmt::Display for BlogSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BlogSignal::UrlBlogKeyword => "blog keyword in URL",
            BlogSignal::UrlBlogSubpath => "blog subpath in URL",
            BlogSignal::UrlDatePattern => "date in URL",
            BlogSignal::TitleKeyword => "blog keyword in title",
            BlogSignal::HeadingKeyword => "blog keyword in heading",
            BlogSignal::ManyArticles => "more than 3 <article> elements",
            BlogSignal::SomeArticles => "1-3 <article> elements",
            BlogSignal::ManyPostClasses => "more than 3 post elements",
            BlogSignal::SomePostClasses => "1-3 post elements",
            BlogSignal::Pagination => "pagination",
            BlogSignal::DateMarkup => "dates",
            BlogSignal::AuthorMarkup => "author bylines",
            BlogSignal::Comments => "comment section",
            BlogSignal::TagMarkup => "tags or categories",
            BlogSignal::SocialShare => "share buttons",
            BlogSignal::BlogBodyClass => "blog body class",
            BlogSignal::CmsFingerprint => "blog CMS",
            BlogSignal::FeedLink => "RSS/Atom link tag",
            BlogSignal::BlogSchema => "blog schema.org markup",
        };
        f.write_str(label)
    }
}

/// A page together with its blog score, extracted facts, and parsed HTML
///
/// The document is kept so later stages work from the same parse.
#[derive(Debug, Clone)]
pub struct ScoredPage {
    pub page: Page,
    /// In [0, 10]
    pub blog_score: f32,
    pub facts: PageFacts,
    pub document: Document,
}

impl ScoredPage {
    pub fn url(&self) -> &str {
        &self.page.url
    }

    pub fn metadata(&self) -> &crate::page_facts::BlogMetadata {
        &self.facts.metadata
    }
}

/// Signals that fire for a page, with their weights, in table order
pub fn explain(facts: &PageFacts) -> Vec<(BlogSignal, f32)> {
    BLOG_SIGNAL_WEIGHTS
        .iter()
        .copied()
        .filter(|(signal, _)| signal.fires(facts))
        .collect()
}

/// Blog score of a page from its facts
pub fn blog_score(facts: &PageFacts) -> f32 {
    let signals: f32 = explain(facts).iter().map(|(_, weight)| weight).sum();
    let indicators = facts.metadata.blog_indicator_score() * INDICATOR_WEIGHT;
    (signals + indicators).clamp(0.0, MAX_BLOG_SCORE)
}

/// Score one page, failing if its URL does not parse
pub fn try_score_page(page: &Page) -> Result<ScoredPage> {
    let base = Url::parse(&page.url)?;
    let document = Document::parse(&page.html);
    let facts = PageFacts::from_document(&page.url, Some(&base), &page.html, &document);
    let score = blog_score(&facts);

    log::debug!("scored {} at {:.2} ({})", page.url, score, facts.summary());

    Ok(ScoredPage {
        page: page.clone(),
        blog_score: score,
        facts,
        document,
    })
}

/// Score one page. A page that cannot be scored gets 0, empty facts, and an
/// empty document.
pub fn score_page(page: &Page) -> ScoredPage {
    try_score_page(page).unwrap_or_else(|e| {
        log::warn!("could not score {}: {}", page.url, e);
        ScoredPage {
            page: page.clone(),
            blog_score: 0.0,
            facts: PageFacts {
                url: page.url.clone(),
                ..Default::default()
            },
            document: Document::empty(),
        }
    })
}

/// Score every page, preserving input order
pub fn score_pages(pages: &[Page]) -> Vec<ScoredPage> {
    pages.iter().map(score_page).collect()
}

/// Keep pages scoring at least `threshold`, highest first, stable on ties
pub fn filter_candidates(scored: Vec<ScoredPage>, threshold: f32) -> Vec<ScoredPage> {
    let mut candidates: Vec<ScoredPage> = scored
        .into_iter()
        .filter(|p| p.blog_score >= threshold)
        .collect();
    candidates.sort_by(|a, b| b.blog_score.total_cmp(&a.blog_score));
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facts(url: &str, html: &str) -> PageFacts {
        PageFacts::new(url, html)
    }

    #[test]
    fn test_weight_table_covers_every_signal_once() {
        let mut seen = Vec::new();
        for (signal, weight) in BLOG_SIGNAL_WEIGHTS {
            assert!(*weight > 0.0);
            assert!(!seen.contains(signal), "duplicate signal {:?}", signal);
            seen.push(*signal);
        }
        assert_eq!(seen.len(), 19);
    }

    #[test]
    fn test_empty_page_scores_zero() {
        let f = facts("https://ex.com/about", "<html><body></body></html>");
        assert_eq!(blog_score(&f), 0.0);
        assert!(explain(&f).is_empty());
    }

    #[test]
    fn test_url_signals_in_isolation() {
        let f = facts("https://ex.com/blog", "<html></html>");
        assert_eq!(explain(&f), vec![(BlogSignal::UrlBlogKeyword, 2.0)]);

        let f = facts("https://ex.com/tag/rust", "<html></html>");
        assert_eq!(explain(&f), vec![(BlogSignal::UrlBlogSubpath, 1.0)]);

        let f = facts("https://ex.com/2023/05/hello", "<html></html>");
        assert_eq!(explain(&f), vec![(BlogSignal::UrlDatePattern, 1.5)]);
    }

    #[test]
    fn test_article_count_bands_are_exclusive() {
        let many = "<article></article>".repeat(4);
        let f = facts("https://ex.com/x", &format!("<html><body>{}</body></html>", many));
        assert!(BlogSignal::ManyArticles.fires(&f));
        assert!(!BlogSignal::SomeArticles.fires(&f));

        let f = facts("https://ex.com/x", "<html><body><article></article></body></html>");
        assert!(!BlogSignal::ManyArticles.fires(&f));
        assert!(BlogSignal::SomeArticles.fires(&f));
    }

    #[test]
    fn test_score_is_clamped() {
        let html = r#"
            <html><head>
                <title>Blog</title>
                <meta name="generator" content="WordPress 6.4">
                <link rel="alternate" type="application/rss+xml" href="/feed">
                <script type="application/ld+json">{"@type":"Blog"}</script>
            </head>
            <body class="blog">
                <h1>Our Blog</h1>
                <article class="post"><time>2024-01-01</time><span class="author">A</span></article>
                <article class="post"><div class="comments"></div><a rel="tag" href="/tag/x">x</a></article>
                <article class="post"><div class="share"></div></article>
                <article class="post"></article>
                <nav class="pagination"></nav>
            </body></html>
        "#;
        let f = facts("https://ex.com/blog/category/2023/05/", html);
        assert_eq!(blog_score(&f), MAX_BLOG_SCORE);
    }

    #[test]
    fn test_unparsable_url_scores_zero() {
        let page = Page::new("not a url", "<html><body><article></article></body></html>");
        let scored = score_page(&page);
        assert_eq!(scored.blog_score, 0.0);
        assert_eq!(scored.metadata().blog_indicator_score(), 0.0);
        assert!(try_score_page(&page).is_err());
    }

    #[test]
    fn test_filter_sorts_descending_and_stable() {
        let make = |url: &str, score: f32| ScoredPage {
            page: Page::new(url, ""),
            blog_score: score,
            facts: PageFacts::default(),
            document: Document::empty(),
        };
        let scored = vec![
            make("a", 3.0),
            make("b", 1.0),
            make("c", 5.0),
            make("d", 3.0),
            make("e", 2.5),
        ];
        let kept = filter_candidates(scored, BLOG_SCORE_THRESHOLD);
        let urls: Vec<&str> = kept.iter().map(|p| p.url()).collect();
        assert_eq!(urls, vec!["c", "a", "d", "e"]);
    }
}
