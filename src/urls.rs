//! URL shape heuristics: blog keywords, dated paths, and the article-URL predicate

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

/// Path segments that name a blog or news section outright
pub const DIRECT_BLOG_KEYWORDS: &[&str] = &[
    "blog",
    "blogs",
    "news",
    "articles",
    "insights",
    "press",
    "posts",
    "stories",
    "updates",
    "journal",
    "newsroom",
    "magazine",
];

/// Path segments that live underneath a blog (taxonomy, archives, paging)
pub const BLOG_SUBPATHS: &[&str] = &[
    "category",
    "categories",
    "tag",
    "tags",
    "author",
    "authors",
    "archive",
    "archives",
    "page",
    "entry",
    "entries",
    "post",
    "topics",
];

/// `/YYYY/MM/`, `/YYYY/MM/DD/`, `/YYYY-MM`, or a month name as a path segment
static BLOG_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)/\d{4}/\d{1,2}(/\d{1,2})?(/|$)|/\d{4}-\d{2}|/(january|february|march|april|may|june|july|august|september|october|november|december)(/|$)",
    )
    .expect("Invalid blog date regex")
});

/// WordPress-style permalinks: `?p=123` or `/p/123`
static WP_POST_ID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[?&]p=\d+|/p/\d+").expect("Invalid post id regex")
});

static INDEX_SEGMENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(index|home|page\d*)$").expect("Invalid index segment regex")
});

/// Non-empty, lowercased path segments of a parsed URL
pub fn path_segments(url: &Url) -> Vec<String> {
    url.path()
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|s| s.to_lowercase())
        .collect()
}

pub fn is_blog_keyword(segment: &str) -> bool {
    DIRECT_BLOG_KEYWORDS.contains(&segment)
}

pub fn is_blog_subpath(segment: &str) -> bool {
    BLOG_SUBPATHS.contains(&segment)
}

/// Whether `index`, `home`, `page`, or `page2` etc.
pub fn is_index_segment(segment: &str) -> bool {
    INDEX_SEGMENT_RE.is_match(segment)
}

/// Whether a URL path carries a blog-style date
pub fn has_date_pattern(path: &str) -> bool {
    BLOG_DATE_RE.is_match(path)
}

/// Whether free text contains a direct blog keyword as a whole word
///
/// Matching on words keeps "WordPress" from counting as "press".
pub fn text_has_blog_keyword(text: &str) -> bool {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .any(is_blog_keyword)
}

/// Resolve a possibly-relative href against a base URL
///
/// Returns `None` for hrefs that do not form a valid URL.
pub fn resolve_url(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    base.join(href).ok().map(|u| u.to_string())
}

/// Hrefs that never point at content: fragments, scripts, mail and phone links
pub fn is_navigable_href(href: &str) -> bool {
    let lower = href.trim().to_lowercase();
    !(lower.is_empty()
        || lower.starts_with('#')
        || lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:"))
}

/// Scheme and host of a URL, e.g. `https://example.com`
pub fn site_origin(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    Some(match parsed.port() {
        Some(port) => format!("{}://{}:{}", parsed.scheme(), host, port),
        None => format!("{}://{}", parsed.scheme(), host),
    })
}

/// Whether a URL looks like an individual blog post rather than navigation
///
/// Any one of the following is enough:
/// - a path segment is a direct blog keyword or a blog subpath
/// - the path carries a blog date
/// - a WordPress-style `?p=N` or `/p/N` permalink
/// - the path ends in `.html` or `.php`
/// - three or more segments under `/blog/`
/// - a final segment longer than 10 characters (slug)
pub fn is_blog_post_url(url: &str) -> bool {
    let parsed = match Url::parse(url) {
        Ok(u) => u,
        Err(_) => return false,
    };

    let path = parsed.path().to_lowercase();
    let segments = path_segments(&parsed);

    if segments.iter().any(|s| is_blog_keyword(s)) {
        return true;
    }
    if has_date_pattern(&path) {
        return true;
    }
    if segments.iter().any(|s| is_blog_subpath(s)) {
        return true;
    }

    let with_query = match parsed.query() {
        Some(q) => format!("{}?{}", path, q),
        None => path.clone(),
    };
    if WP_POST_ID_RE.is_match(&with_query) {
        return true;
    }
    if path.ends_with(".html") || path.ends_with(".php") {
        return true;
    }
    if segments.len() >= 3 && segments[0] == "blog" {
        return true;
    }

    segments
        .last()
        .map(|s| s.chars().count() > 10)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blog_post_url_positive() {
        assert!(is_blog_post_url("https://ex.com/blog/first-post"));
        assert!(is_blog_post_url("https://ex.com/2023/05/hello"));
        assert!(is_blog_post_url("https://ex.com/category/rust"));
        assert!(is_blog_post_url("https://ex.com/?p=123"));
        assert!(is_blog_post_url("https://ex.com/p/42"));
        assert!(is_blog_post_url("https://ex.com/x/story.html"));
        assert!(is_blog_post_url("https://ex.com/why-rust-is-great"));
    }

    #[test]
    fn test_blog_post_url_negative() {
        assert!(!is_blog_post_url("https://ex.com/"));
        assert!(!is_blog_post_url("https://ex.com/about"));
        assert!(!is_blog_post_url("https://ex.com/contact-us"));
        assert!(!is_blog_post_url("not a url"));
        assert!(!is_blog_post_url("/blog/relative"));
    }

    #[test]
    fn test_date_patterns() {
        assert!(has_date_pattern("/2023/05/"));
        assert!(has_date_pattern("/blog/2023/05/15/slug"));
        assert!(has_date_pattern("/archive/2023-05"));
        assert!(has_date_pattern("/news/march/"));
        assert!(!has_date_pattern("/products/12345"));
    }

    #[test]
    fn test_keyword_matching_is_word_based() {
        assert!(text_has_blog_keyword("Company Blog"));
        assert!(text_has_blog_keyword("Latest News & Updates"));
        assert!(!text_has_blog_keyword("Powered by WordPress"));
        assert!(!text_has_blog_keyword("Newsletter signup"));
    }

    #[test]
    fn test_resolve_relative_image() {
        let base = Url::parse("https://ex.com/blog/post-1").unwrap();
        assert_eq!(
            resolve_url(&base, "/img/a.png").as_deref(),
            Some("https://ex.com/img/a.png")
        );
        assert_eq!(
            resolve_url(&base, "second").as_deref(),
            Some("https://ex.com/blog/second")
        );
        assert_eq!(resolve_url(&base, "  "), None);
    }

    #[test]
    fn test_site_origin() {
        assert_eq!(site_origin("https://ex.com/blog/x").as_deref(), Some("https://ex.com"));
        assert_eq!(
            site_origin("http://localhost:8080/a").as_deref(),
            Some("http://localhost:8080")
        );
        assert_eq!(site_origin("garbage"), None);
    }

    #[test]
    fn test_index_segment() {
        assert!(is_index_segment("index"));
        assert!(is_index_segment("page2"));
        assert!(!is_index_segment("pages"));
    }
}
