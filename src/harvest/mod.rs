//! Article harvesting from candidate pages
//!
//! `Harvest` is the accumulator threaded through every candidate page of one
//! run: it owns the seen-URL set and the accepted records, so nothing about a
//! run leaks into another.

pub mod fields;

use std::collections::HashSet;

use url::Url;

use crate::dom::{self, Document, Node};
use crate::types::{ArticleRecord, Page};
use crate::urls;

/// Article containers, tried in order
pub const CONTAINER_SELECTORS: &[&str] = &[
    "article",
    ".post, .blog-post",
    ".entry",
    ".news-item",
    ".article",
    ".item, .card",
    ".excerpt",
    ".teaser",
    "[class*='blog-'], [id*='blog-'], [class*='post-'], [id*='post-']",
];

/// Item-level elements that can enclose a bare article link
const CONTENT_CONTAINER_SELECTOR: &str =
    "article, .post, .blog-post, .entry, .hentry, .type-post, .post-item, .blog-item, .news-item, .article-item, .card, .item, .teaser, li";

const HEADING_TAGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];
const HEADING_SELECTOR: &str = "h1, h2, h3, h4, h5, h6";

/// Hrefs containing any of these are never articles
const EXCLUDED_HREF_PARTS: &[&str] = &[
    "login", "logout", "signup", "sign-up", "register", "cart", "checkout", "account",
];

const MIN_LINK_TITLE_CHARS: usize = 5;
const MAX_LINK_TITLE_CHARS: usize = 200;

/// Fewer accumulated records than this after a page's structured pass
/// triggers the fallback pass on that page
pub const DEFAULT_FALLBACK_MIN_RECORDS: usize = 3;

/// Accumulated article records and the URLs already taken
#[derive(Debug, Default)]
pub struct Harvest {
    seen: HashSet<String>,
    records: Vec<ArticleRecord>,
    fallback_min_records: usize,
}

impl Harvest {
    pub fn new() -> Self {
        Self::with_fallback_min(DEFAULT_FALLBACK_MIN_RECORDS)
    }

    pub fn with_fallback_min(fallback_min_records: usize) -> Self {
        Self {
            fallback_min_records,
            ..Default::default()
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in encounter order
    pub fn records(&self) -> &[ArticleRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<ArticleRecord> {
        self.records
    }

    /// Accept a record if it has a title and URL, is new, and looks like a post
    fn accept(&mut self, record: ArticleRecord) -> bool {
        if record.title.trim().is_empty() || record.url.is_empty() {
            return false;
        }
        if self.seen.contains(&record.url) || !urls::is_blog_post_url(&record.url) {
            return false;
        }
        self.seen.insert(record.url.clone());
        self.records.push(record);
        true
    }

    /// Harvest one candidate page: structured pass, then the fallback pass
    /// if the run has accumulated too few records so far
    ///
    /// Returns the number of records added.
    pub fn harvest_page(&mut self, page: &Page) -> usize {
        self.harvest_document(&page.url, &Document::parse(&page.html))
    }

    /// Same as `harvest_page` for a document that is already parsed.
    /// A page whose URL does not parse contributes nothing.
    pub fn harvest_document(&mut self, url: &str, document: &Document) -> usize {
        let base = match Url::parse(url) {
            Ok(u) => u,
            Err(e) => {
                log::warn!("skipping harvest of {}: {}", url, e);
                return 0;
            }
        };

        let mut added = self.structured_pass(document, &base);
        if self.records.len() < self.fallback_min_records {
            log::debug!(
                "only {} record(s) after {}, running link fallback",
                self.records.len(),
                url
            );
            added += self.fallback_pass(document, &base);
        }
        added
    }

    /// Extract one record per known article container
    pub fn structured_pass(&mut self, document: &Document, base: &Url) -> usize {
        let mut added = 0;
        for css in CONTAINER_SELECTORS {
            for container in document.find(css) {
                let record = fields::extract_record(container, base);
                if self.accept(record) {
                    added += 1;
                }
            }
        }
        log::debug!("structured pass on {} added {}", base, added);
        added
    }

    /// Build records from bare anchors when markup gave too little
    pub fn fallback_pass(&mut self, document: &Document, base: &Url) -> usize {
        let container_sel = dom::selector(CONTENT_CONTAINER_SELECTOR);
        let mut added = 0;

        for anchor in document.find("a[href]") {
            let (url, title) = match link_entry(anchor, base) {
                Some(entry) => entry,
                None => continue,
            };
            if self.seen.contains(&url) {
                continue;
            }

            let mut record = ArticleRecord {
                title,
                url,
                ..Default::default()
            };
            enrich_from_context(anchor, base, container_sel.as_ref(), &mut record);

            if self.accept(record) {
                added += 1;
            }
        }
        log::debug!("fallback pass on {} added {}", base, added);
        added
    }
}

/// Resolved URL and text of an anchor that could stand alone as an article
fn link_entry(anchor: Node<'_>, base: &Url) -> Option<(String, String)> {
    let href = anchor.attr("href").filter(|h| urls::is_navigable_href(h))?;
    let lower = href.to_lowercase();
    if EXCLUDED_HREF_PARTS.iter().any(|part| lower.contains(part)) {
        return None;
    }
    let url = urls::resolve_url(base, href).filter(|u| urls::is_blog_post_url(u))?;

    let title = anchor.text();
    let title_len = title.chars().count();
    if !(MIN_LINK_TITLE_CHARS..=MAX_LINK_TITLE_CHARS).contains(&title_len) {
        return None;
    }
    Some((url, title))
}

/// Whether `scope` encloses only the entry for `url`: at most one heading,
/// and no link entry pointing anywhere else
fn holds_single_entry(scope: Node<'_>, base: &Url, url: &str) -> bool {
    scope.find(HEADING_SELECTOR).len() <= 1
        && scope
            .find("a[href]")
            .into_iter()
            .filter_map(|a| link_entry(a, base))
            .all(|(other, _)| other == url)
}

/// Fill optional fields of a link-only record from the markup around the link
///
/// Uses the nearest item container that holds this entry alone. Failing
/// that, the parent of the enclosing heading if it holds this entry alone,
/// else the heading and the siblings up to the next heading.
fn enrich_from_context(
    anchor: Node<'_>,
    base: &Url,
    container_sel: Option<&scraper::Selector>,
    record: &mut ArticleRecord,
) {
    let container = container_sel.and_then(|sel| {
        anchor
            .ancestors()
            .find(|n| n.matches(sel))
            .filter(|n| holds_single_entry(*n, base, &record.url))
    });
    if let Some(container) = container {
        record.backfill(ArticleRecord {
            excerpt: fields::extract_excerpt(container),
            image_url: fields::extract_image(container, base),
            date: fields::extract_date(container),
            author: fields::extract_author(container),
            ..Default::default()
        });
        return;
    }

    let heading = match anchor.ancestors().find(|n| HEADING_TAGS.contains(&n.tag())) {
        Some(h) => h,
        None => return,
    };
    if let Some(parent) = heading
        .parent()
        .filter(|p| holds_single_entry(*p, base, &record.url))
    {
        let excerpt = parent
            .find("p")
            .into_iter()
            .map(|p| p.text())
            .find(|t| !t.is_empty());
        record.backfill(ArticleRecord {
            excerpt,
            image_url: fields::extract_image(parent, base),
            date: fields::extract_date(parent),
            ..Default::default()
        });
        return;
    }

    let section: Vec<Node<'_>> = std::iter::once(heading)
        .chain(
            heading
                .next_siblings()
                .take_while(|n| !HEADING_TAGS.contains(&n.tag()) && n.find(HEADING_SELECTOR).is_empty()),
        )
        .collect();
    record.backfill(fields::extract_section(&section, base));
}
