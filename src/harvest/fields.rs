//! Per-field extractors applied to one article container element
//!
//! Each extractor walks an ordered list of selectors and returns the first
//! non-empty value. A missing field is `None`, never an error.

use url::Url;

use crate::dom::{self, Node};
use crate::normalize::{collapse_whitespace, strip_author_prefix, word_similarity};
use crate::types::ArticleRecord;
use crate::urls;

const TITLE_SELECTORS: &[&str] = &[
    "h1",
    "h2",
    "h3",
    "h4",
    ".title",
    ".entry-title",
    ".post-title",
    ".headline",
    "a[rel='bookmark']",
    ".card-title",
    ".article-title",
];

const EXCERPT_SELECTORS: &[&str] = &[
    ".excerpt",
    ".entry-summary",
    ".summary",
    ".post-excerpt",
    ".description",
    ".teaser-text",
    ".entry-content",
];

const IMAGE_SELECTORS: &[&str] = &[
    ".featured-image img",
    ".post-thumbnail img",
    ".wp-post-image",
    "img",
];

const IMAGE_ATTRS: &[&str] = &["src", "data-src", "data-lazy-src"];

const DATE_SELECTORS: &[&str] = &[
    "time[datetime]",
    "time",
    ".date",
    ".post-date",
    ".entry-date",
    ".published",
    ".pubdate",
    "[class*='date']",
];

const AUTHOR_SELECTORS: &[&str] = &[
    ".author",
    ".byline",
    ".post-author",
    ".entry-author",
    "[rel='author']",
    "[class*='author']",
];

/// Fallback title: a text node between these lengths, in characters
const FALLBACK_TITLE_MIN: usize = 10;
const FALLBACK_TITLE_MAX: usize = 100;

/// Link text counts as "descriptive" beyond this many characters
const DESCRIPTIVE_LINK_LEN: usize = 20;
const TITLE_LINK_SIMILARITY: f32 = 0.7;

/// Extract every field from a container
///
/// The returned record may have an empty title or URL; the caller decides
/// whether it is acceptable.
pub fn extract_record(container: Node<'_>, base: &Url) -> ArticleRecord {
    let (title, title_url) = extract_title(container, base);
    let title = title.unwrap_or_default();
    let url = title_url
        .or_else(|| extract_url(container, base, &title))
        .unwrap_or_default();

    ArticleRecord {
        title,
        url,
        excerpt: extract_excerpt(container),
        image_url: extract_image(container, base),
        date: extract_date(container),
        author: extract_author(container),
    }
}

/// Resolved href of a navigable link, if any
fn link_target(link: Node<'_>, base: &Url) -> Option<String> {
    link.attr("href")
        .filter(|h| urls::is_navigable_href(h))
        .and_then(|h| urls::resolve_url(base, h))
}

/// Title text, plus the URL of the link the title sits in or wraps
pub fn extract_title(container: Node<'_>, base: &Url) -> (Option<String>, Option<String>) {
    for css in TITLE_SELECTORS {
        let found = container
            .find(css)
            .into_iter()
            .map(|el| (el, el.text()))
            .find(|(_, text)| !text.is_empty());

        if let Some((el, text)) = found {
            let title_url = if el.tag() == "a" {
                link_target(el, base)
            } else {
                el.find("a[href]")
                    .into_iter()
                    .find_map(|a| link_target(a, base))
            };
            return (Some(text), title_url);
        }
    }

    let fallback = container
        .text_nodes()
        .map(collapse_whitespace)
        .find(|t| (FALLBACK_TITLE_MIN..=FALLBACK_TITLE_MAX).contains(&t.chars().count()));
    (fallback, None)
}

/// Best article link in a container
///
/// Prefers a link whose text resembles the title or is long enough to be
/// descriptive; otherwise the first usable href.
pub fn extract_url(container: Node<'_>, base: &Url, title: &str) -> Option<String> {
    let links = container.find("a[href]");

    let preferred = links.iter().find_map(|link| {
        let text = link.text();
        let resembles_title = !title.is_empty() && word_similarity(&text, title) > TITLE_LINK_SIMILARITY;
        if resembles_title || text.chars().count() > DESCRIPTIVE_LINK_LEN {
            link_target(*link, base)
        } else {
            None
        }
    });

    preferred.or_else(|| links.iter().find_map(|link| link_target(*link, base)))
}

/// Where field selectors are applied
#[derive(Clone, Copy)]
enum Scope<'s, 'a> {
    /// Descendants of one container
    Within(Node<'a>),
    /// A run of sibling elements and their descendants
    Section(&'s [Node<'a>]),
}

impl<'a> Scope<'_, 'a> {
    fn select(&self, css: &str) -> Vec<Node<'a>> {
        match self {
            Scope::Within(container) => container.find(css),
            Scope::Section(nodes) => {
                let sel = match dom::selector(css) {
                    Some(sel) => sel,
                    None => return Vec::new(),
                };
                nodes
                    .iter()
                    .flat_map(|n| {
                        let own = n.matches(&sel).then_some(*n);
                        own.into_iter().chain(n.find_with(&sel))
                    })
                    .collect()
            }
        }
    }
}

pub fn extract_excerpt(container: Node<'_>) -> Option<String> {
    excerpt_in(Scope::Within(container))
}

/// First image source, resolved to an absolute URL
pub fn extract_image(container: Node<'_>, base: &Url) -> Option<String> {
    image_in(Scope::Within(container), base)
}

/// `datetime` attribute or visible text of the first date element
pub fn extract_date(container: Node<'_>) -> Option<String> {
    date_in(Scope::Within(container))
}

/// Author name with any "by" prefix removed
pub fn extract_author(container: Node<'_>) -> Option<String> {
    author_in(Scope::Within(container))
}

/// Optional fields from a heading and the siblings that follow it
///
/// Title and URL are left empty.
pub fn extract_section(nodes: &[Node<'_>], base: &Url) -> ArticleRecord {
    let scope = Scope::Section(nodes);
    ArticleRecord {
        excerpt: excerpt_in(scope),
        image_url: image_in(scope, base),
        date: date_in(scope),
        author: author_in(scope),
        ..Default::default()
    }
}

fn excerpt_in(scope: Scope<'_, '_>) -> Option<String> {
    EXCERPT_SELECTORS
        .iter()
        .chain(std::iter::once(&"p"))
        .find_map(|css| first_text(scope, css))
}

fn image_in(scope: Scope<'_, '_>, base: &Url) -> Option<String> {
    IMAGE_SELECTORS.iter().find_map(|css| {
        scope.select(css).into_iter().find_map(|img| {
            IMAGE_ATTRS
                .iter()
                .filter_map(|attr| img.attr(attr))
                .map(str::trim)
                .find(|src| !src.is_empty() && !src.starts_with("data:"))
                .and_then(|src| urls::resolve_url(base, src))
        })
    })
}

fn date_in(scope: Scope<'_, '_>) -> Option<String> {
    DATE_SELECTORS.iter().find_map(|css| {
        scope.select(css).into_iter().find_map(|el| {
            el.attr("datetime")
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(String::from)
                .or_else(|| Some(el.text()).filter(|t| !t.is_empty()))
        })
    })
}

fn author_in(scope: Scope<'_, '_>) -> Option<String> {
    AUTHOR_SELECTORS.iter().find_map(|css| {
        scope
            .select(css)
            .into_iter()
            .map(|el| strip_author_prefix(&el.text()))
            .find(|a| !a.is_empty())
    })
}

fn first_text(scope: Scope<'_, '_>, css: &str) -> Option<String> {
    scope
        .select(css)
        .into_iter()
        .map(|el| el.text())
        .find(|t| !t.is_empty())
}
