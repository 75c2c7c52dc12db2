//! PageFacts - Unified blog-signal extraction from a crawled page
//!
//! Facts are computed once per page in a single DOM pass and then read by
//! both the page scorer and the index selector, so the two scoring functions
//! always agree on what the page contains.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::dom::Document;
use crate::urls;

/// Written dates in visible text: "March 3, 2024", "2024-03-03", "03/03/2024"
static INLINE_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(jan|feb|mar|apr|may|jun|jul|aug|sep|sept|oct|nov|dec)[a-z]*\.?\s+\d{1,2}(st|nd|rd|th)?,?\s+\d{4}\b|\b\d{4}-\d{2}-\d{2}\b|\b\d{1,2}/\d{1,2}/\d{4}\b",
    )
    .expect("Invalid inline date regex")
});

pub(crate) const ARTICLE_SELECTOR: &str = "article";
pub(crate) const POST_CLASS_SELECTOR: &str =
    ".post, .blog-post, .entry, .hentry, .type-post, .post-item, .blog-item, .news-item, .article-item";
const PAGINATION_SELECTOR: &str =
    ".pagination, .pager, .nav-links, .page-numbers, .wp-pagenavi, .load-more, [class*='pagination'], a[rel='next'], link[rel='next']";
const DATE_SELECTOR: &str =
    "time, .date, .post-date, .entry-date, .published, .pubdate, [class*='date']";
const AUTHOR_SELECTOR: &str =
    ".author, .byline, .post-author, .entry-author, [rel='author'], [class*='author']";
const COMMENT_SELECTOR: &str =
    "#comments, .comments, .comment-list, .comments-area, #disqus_thread, [class*='comment']";
const TAG_SELECTOR: &str =
    ".tags, .tag, .categories, .category, .post-tags, .post-categories, .cat-links, .tag-links, a[rel~='tag']";
const SHARE_SELECTOR: &str =
    ".share, .social-share, .sharing, .share-buttons, .sharedaddy, [class*='share']";
const BLOG_BODY_SELECTOR: &str =
    "body.blog, body.single-post, body.archive, body.post-template, body.post-template-default, body.tag-template, #blog, #blog-posts, .blog-container, .blog-list, .blog-posts";
const SIDEBAR_TAXONOMY_SELECTOR: &str =
    ".widget_categories, .widget_tag_cloud, .tagcloud, .tag-cloud, .category-list, .widget-categories, aside .categories, .sidebar .categories";
const ARCHIVE_WIDGET_SELECTOR: &str =
    ".widget_archive, .widget_calendar, #wp-calendar, .archive-list, .archives, .widget-archive";
const RECENT_POSTS_SELECTOR: &str =
    ".widget_recent_entries, .recent-posts, .latest-posts, .recent-entries, .widget-recent-posts";
const RSS_LINK_SELECTOR: &str = "link[type='application/rss+xml']";
const ATOM_LINK_SELECTOR: &str = "link[type='application/atom+xml']";

/// Content management system recognized from generator tags or asset paths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cms {
    WordPress,
    Drupal,
    Ghost,
    Blogger,
    Medium,
}

impl Cms {
    /// WordPress, Drupal and Ghost are the ones that earn the CMS bonus in scoring
    pub fn is_blog_platform(self) -> bool {
        matches!(self, Cms::WordPress | Cms::Drupal | Cms::Ghost)
    }
}

/// Fixed set of boolean blog indicators for one page
///
/// Stateless: a pure function of one page's DOM, recomputed on every run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogMetadata {
    pub is_wordpress: bool,
    pub is_drupal: bool,
    pub is_ghost: bool,
    pub is_blogger: bool,
    pub is_medium: bool,
    pub has_rss_feed: bool,
    pub has_atom_feed: bool,
    pub has_blog_schema: bool,
    pub has_article_schema: bool,
    pub has_blog_posting_schema: bool,
    pub has_news_article_schema: bool,
    pub has_og_article: bool,
    pub has_published_time_meta: bool,
    pub has_pagination: bool,
    pub has_multiple_articles: bool,
    pub has_categories: bool,
    pub has_tags: bool,
    pub has_author_info: bool,
    pub has_comments: bool,
    pub has_archive: bool,
}

impl BlogMetadata {
    pub const FIELD_COUNT: usize = 20;

    fn flags(&self) -> [bool; Self::FIELD_COUNT] {
        [
            self.is_wordpress,
            self.is_drupal,
            self.is_ghost,
            self.is_blogger,
            self.is_medium,
            self.has_rss_feed,
            self.has_atom_feed,
            self.has_blog_schema,
            self.has_article_schema,
            self.has_blog_posting_schema,
            self.has_news_article_schema,
            self.has_og_article,
            self.has_published_time_meta,
            self.has_pagination,
            self.has_multiple_articles,
            self.has_categories,
            self.has_tags,
            self.has_author_info,
            self.has_comments,
            self.has_archive,
        ]
    }

    /// Fraction of indicators that are set, in [0, 1]
    pub fn blog_indicator_score(&self) -> f32 {
        let set = self.flags().iter().filter(|f| **f).count();
        set as f32 / Self::FIELD_COUNT as f32
    }

    /// Any schema.org blog or article type
    pub fn has_any_schema(&self) -> bool {
        self.has_blog_schema
            || self.has_article_schema
            || self.has_blog_posting_schema
            || self.has_news_article_schema
    }

    pub fn has_feed(&self) -> bool {
        self.has_rss_feed || self.has_atom_feed
    }
}

/// Everything the scorers need to know about one page
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageFacts {
    /// Page URL as given
    pub url: String,
    /// Lowercased, non-empty path segments (empty if the URL did not parse)
    pub path_segments: Vec<String>,
    /// Whether the URL path is `/`
    pub is_root: bool,
    /// Whether the URL path carries a blog date
    pub has_date_in_url: bool,

    /// `<title>` text
    pub title: Option<String>,
    /// First `<h1>` text
    pub h1: Option<String>,
    /// Text of every h1, h2 and h3
    pub headings: Vec<String>,
    /// Meta generator tag
    pub meta_generator: Option<String>,
    pub cms: Option<Cms>,

    // === Structure ===
    pub article_count: usize,
    pub post_count: usize,
    pub has_pagination: bool,
    pub has_date_markup: bool,
    pub has_author_markup: bool,
    pub has_comments: bool,
    pub has_tag_markup: bool,
    pub has_social_share: bool,
    pub has_blog_body_class: bool,
    pub has_sidebar_taxonomy: bool,
    pub has_archive_widget: bool,
    pub has_recent_posts: bool,

    // === Feeds ===
    /// `<link type="application/rss+xml|atom+xml">` hrefs, resolved
    pub feed_links: Vec<String>,
    /// Anchor hrefs mentioning feed/rss/atom, resolved
    pub feed_anchors: Vec<String>,

    pub metadata: BlogMetadata,
}

impl PageFacts {
    /// Extract facts from a page. Never fails: an unparsable URL only
    /// leaves the URL-derived fields empty and disables href resolution.
    pub fn new(url: &str, html: &str) -> Self {
        let document = Document::parse(html);
        let base = Url::parse(url).ok();
        Self::from_document(url, base.as_ref(), html, &document)
    }

    pub(crate) fn from_document(
        url: &str,
        base: Option<&Url>,
        html: &str,
        document: &Document,
    ) -> Self {
        let mut facts = Self {
            url: url.to_string(),
            ..Default::default()
        };

        if let Some(base) = base {
            facts.path_segments = urls::path_segments(base);
            facts.is_root = facts.path_segments.is_empty();
            facts.has_date_in_url = urls::has_date_pattern(&base.path().to_lowercase());
        }

        facts.extract_text_signals(document);
        facts.extract_structure(document);
        facts.detect_cms(html, document);
        if let Some(base) = base {
            facts.discover_feeds(document, base);
        }
        facts.metadata = facts.build_metadata(html, document);
        facts
    }

    /// Title, h1 and heading text
    fn extract_text_signals(&mut self, document: &Document) {
        self.title = document
            .first("title")
            .map(|t| t.text())
            .filter(|t| !t.is_empty());
        self.h1 = document
            .first("h1")
            .map(|h| h.text())
            .filter(|t| !t.is_empty());
        self.headings = document
            .find("h1, h2, h3")
            .iter()
            .map(|h| h.text())
            .filter(|t| !t.is_empty())
            .collect();
    }

    /// Counts and presence of blog-shaped markup
    fn extract_structure(&mut self, document: &Document) {
        self.article_count = document.count(ARTICLE_SELECTOR);
        self.post_count = document.count(POST_CLASS_SELECTOR);
        self.has_pagination = document.exists(PAGINATION_SELECTOR);
        self.has_date_markup = document.exists(DATE_SELECTOR)
            || INLINE_DATE_RE.is_match(&document.body_text());
        self.has_author_markup = document.exists(AUTHOR_SELECTOR);
        self.has_comments = document.exists(COMMENT_SELECTOR);
        self.has_tag_markup = document.exists(TAG_SELECTOR);
        self.has_social_share = document.exists(SHARE_SELECTOR);
        self.has_blog_body_class = document.exists(BLOG_BODY_SELECTOR);
        self.has_sidebar_taxonomy = document.exists(SIDEBAR_TAXONOMY_SELECTOR);
        self.has_archive_widget = document.exists(ARCHIVE_WIDGET_SELECTOR);
        self.has_recent_posts = document.exists(RECENT_POSTS_SELECTOR);
    }

    /// CMS from the generator meta tag, falling back to well-known asset paths
    fn detect_cms(&mut self, html: &str, document: &Document) {
        self.meta_generator = document
            .first("meta[name='generator']")
            .and_then(|m| m.attr("content"))
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        let generator = self
            .meta_generator
            .as_deref()
            .unwrap_or_default()
            .to_lowercase();
        let lower_html = html.to_lowercase();

        self.cms = if generator.contains("wordpress")
            || lower_html.contains("/wp-content/")
            || lower_html.contains("/wp-includes/")
        {
            Some(Cms::WordPress)
        } else if generator.contains("drupal")
            || lower_html.contains("/sites/default/files/")
            || lower_html.contains("drupal.settings")
        {
            Some(Cms::Drupal)
        } else if generator.contains("ghost")
            || lower_html.contains("/ghost/api/")
            || lower_html.contains("ghost-portal")
        {
            Some(Cms::Ghost)
        } else if generator.contains("blogger") || lower_html.contains(".blogspot.com") {
            Some(Cms::Blogger)
        } else if lower_html.contains("cdn-client.medium.com") {
            Some(Cms::Medium)
        } else {
            None
        };
    }

    /// Feed `<link>` tags and feed-looking anchors, resolved against the page URL
    fn discover_feeds(&mut self, document: &Document, base: &Url) {
        let link_selector = format!("{}, {}", RSS_LINK_SELECTOR, ATOM_LINK_SELECTOR);
        for link in document.find(&link_selector) {
            if let Some(resolved) = link.attr("href").and_then(|h| urls::resolve_url(base, h)) {
                push_unique(&mut self.feed_links, resolved);
            }
        }

        for anchor in document.find("a[href]") {
            let href = match anchor.attr("href") {
                Some(h) if urls::is_navigable_href(h) => h,
                _ => continue,
            };
            let lower = href.to_lowercase();
            if lower.contains("feed") || lower.contains("rss") || lower.contains("atom") {
                if let Some(resolved) = urls::resolve_url(base, href) {
                    push_unique(&mut self.feed_anchors, resolved);
                }
            }
        }
    }

    /// Derive the boolean indicator record
    fn build_metadata(&self, html: &str, document: &Document) -> BlogMetadata {
        let json_ld = json_ld_fingerprint(document);
        let og_type = document
            .first("meta[property='og:type']")
            .and_then(|m| m.attr("content"))
            .unwrap_or_default()
            .to_lowercase();

        BlogMetadata {
            is_wordpress: self.cms == Some(Cms::WordPress),
            is_drupal: self.cms == Some(Cms::Drupal),
            is_ghost: self.cms == Some(Cms::Ghost),
            is_blogger: self.cms == Some(Cms::Blogger),
            is_medium: self.cms == Some(Cms::Medium),
            has_rss_feed: document.exists(RSS_LINK_SELECTOR),
            has_atom_feed: document.exists(ATOM_LINK_SELECTOR),
            has_blog_schema: json_ld.contains(r#""@type":"blog""#),
            has_article_schema: json_ld.contains(r#""@type":"article""#),
            has_blog_posting_schema: json_ld.contains(r#""@type":"blogposting""#),
            has_news_article_schema: json_ld.contains(r#""@type":"newsarticle""#),
            has_og_article: og_type == "article",
            has_published_time_meta: document.exists("meta[property='article:published_time']")
                || html.contains("datePublished"),
            has_pagination: self.has_pagination,
            has_multiple_articles: self.article_count > 1 || self.post_count > 1,
            has_categories: self.has_sidebar_taxonomy
                || document.exists(".categories, .category, .cat-links, .post-categories"),
            has_tags: self.has_tag_markup,
            has_author_info: self.has_author_markup,
            has_comments: self.has_comments,
            has_archive: self.has_archive_widget,
        }
    }

    /// One-line description of the interesting facts, for diagnostics
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();

        if let Some(cms) = self.cms {
            parts.push(format!("CMS: {:?}", cms));
        }
        if let Some(gen) = &self.meta_generator {
            parts.push(format!("Generator: {}", gen));
        }
        if !self.feed_links.is_empty() {
            parts.push(format!("{} feed(s)", self.feed_links.len()));
        }
        if self.metadata.has_any_schema() {
            parts.push("Blog schema".to_string());
        }
        if self.has_pagination {
            parts.push("Pagination".to_string());
        }

        parts.push(format!(
            "{} article(s), {} post(s)",
            self.article_count, self.post_count
        ));
        parts.push(format!(
            "Indicators: {:.2}",
            self.metadata.blog_indicator_score()
        ));

        parts.join(" | ")
    }
}

/// Lowercased, whitespace-free concatenation of every JSON-LD script
///
/// Schema detection is a substring check on this text, not a JSON parse:
/// `"@type": "Blog"` and `"@type":"blog"` both become `"@type":"blog"`.
fn json_ld_fingerprint(document: &Document) -> String {
    document
        .find(r#"script[type="application/ld+json"]"#)
        .iter()
        .flat_map(|script| script.text_nodes())
        .flat_map(|text| text.chars())
        .filter(|c| !c.is_whitespace())
        .flat_map(|c| c.to_lowercase())
        .collect()
}

fn push_unique(list: &mut Vec<String>, value: String) {
    if !list.contains(&value) {
        list.push(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wordpress_blog_facts() {
        let html = r#"
            <!DOCTYPE html>
            <html>
            <head>
                <title>Company Blog</title>
                <meta name="generator" content="WordPress 6.4.2">
                <link rel="alternate" type="application/rss+xml" href="/feed/" title="RSS">
            </head>
            <body class="blog">
                <article class="post"><h2>One</h2><time datetime="2024-01-01">Jan 1</time></article>
                <article class="post"><h2>Two</h2><span class="byline">By Jo</span></article>
                <nav class="pagination"><a href="/blog/page/2">Next</a></nav>
            </body>
            </html>
        "#;

        let facts = PageFacts::new("https://example.com/blog", html);

        assert_eq!(facts.title.as_deref(), Some("Company Blog"));
        assert_eq!(facts.cms, Some(Cms::WordPress));
        assert_eq!(facts.article_count, 2);
        assert_eq!(facts.post_count, 2);
        assert!(facts.has_pagination);
        assert!(facts.has_date_markup);
        assert!(facts.has_author_markup);
        assert!(facts.has_blog_body_class);
        assert_eq!(facts.feed_links, vec!["https://example.com/feed/".to_string()]);
        assert!(facts.metadata.is_wordpress);
        assert!(facts.metadata.has_rss_feed);
        assert!(facts.metadata.has_multiple_articles);
        assert_eq!(facts.path_segments, vec!["blog".to_string()]);
    }

    #[test]
    fn test_empty_page_has_no_indicators() {
        let facts = PageFacts::new("https://example.com/about", "<html><body></body></html>");
        assert_eq!(facts.metadata, BlogMetadata::default());
        assert_eq!(facts.metadata.blog_indicator_score(), 0.0);
        assert!(facts.cms.is_none());
        assert!(!facts.is_root);
    }

    #[test]
    fn test_json_ld_substring_detection() {
        let html = r#"
            <html><head>
            <script type="application/ld+json">
            { "@context": "https://schema.org", "@type": "Blog", "name": "Notes" }
            </script>
            <script type="application/ld+json">{"@type":"BlogPosting"}</script>
            </head><body></body></html>
        "#;

        let facts = PageFacts::new("https://example.com/", html);
        assert!(facts.metadata.has_blog_schema);
        assert!(facts.metadata.has_blog_posting_schema);
        assert!(!facts.metadata.has_news_article_schema);
        assert!(facts.is_root);
    }

    #[test]
    fn test_inline_date_in_text_counts_as_date_markup() {
        let html = "<html><body><p>Published March 3rd, 2024 by the team</p></body></html>";
        let facts = PageFacts::new("https://example.com/x", html);
        assert!(facts.has_date_markup);
    }

    #[test]
    fn test_feed_anchor_discovery() {
        let html = r##"
            <html><body>
                <a href="/rss.xml">RSS</a>
                <a href="#feed">skip</a>
                <a href="mailto:feed@example.com">mail</a>
                <a href="/about">About</a>
            </body></html>
        "##;
        let facts = PageFacts::new("https://example.com/news/", html);
        assert_eq!(facts.feed_anchors, vec!["https://example.com/rss.xml".to_string()]);
        assert!(facts.feed_links.is_empty());
    }

    #[test]
    fn test_indicator_score_fraction() {
        let metadata = BlogMetadata {
            has_rss_feed: true,
            has_pagination: true,
            ..Default::default()
        };
        assert!((metadata.blog_indicator_score() - 0.1).abs() < 1e-6);
    }
}
