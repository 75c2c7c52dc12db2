use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

// Pre-compiled regex for whitespace normalization (compile once, use many times)
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s+").expect("Invalid whitespace regex pattern")
});

/// Leading "by", "posted by", "written by", "author:" on bylines
static AUTHOR_PREFIX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(?:(?:posted|written)\s+by\b|by\b|author\s*:)\s*:?\s*")
        .expect("Invalid author prefix regex")
});

/// Collapse runs of whitespace into a single space and trim
pub fn collapse_whitespace(content: &str) -> String {
    WHITESPACE_RE.replace_all(content, " ").trim().to_string()
}

/// Strip a byline prefix such as "Posted by" from an author string
pub fn strip_author_prefix(author: &str) -> String {
    AUTHOR_PREFIX_RE.replace(author, "").trim().to_string()
}

/// Jaccard similarity of the lowercase word sets of two strings
///
/// Returns 0.0 when either side has no words.
pub fn word_similarity(a: &str, b: &str) -> f32 {
    let words = |s: &str| -> HashSet<String> {
        s.split_whitespace().map(|w| w.to_lowercase()).collect()
    };
    let left = words(a);
    let right = words(b);
    if left.is_empty() || right.is_empty() {
        return 0.0;
    }

    let intersection = left.intersection(&right).count();
    let union = left.union(&right).count();
    intersection as f32 / union as f32
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%B %d, %Y",
    "%B %d %Y",
    "%b %d, %Y",
    "%b %d %Y",
    "%b. %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%m/%d/%Y",
    "%d.%m.%Y",
];

/// Parse a date string as found in `datetime` attributes or visible text
///
/// Accepts RFC 3339, RFC 2822, and a handful of common written formats.
/// Returns `None` for anything else; callers keep the raw string.
pub fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let s = collapse_whitespace(raw);
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(&s) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(&s) {
        return Some(dt.naive_utc());
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(&s, format) {
            return Some(dt);
        }
    }
    // Ordinal suffixes ("March 3rd, 2024") trip up chrono
    let cleaned = strip_ordinals(&s);
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(&cleaned, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    None
}

fn strip_ordinals(s: &str) -> String {
    static ORDINAL_RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"(\d{1,2})(st|nd|rd|th)\b").expect("Invalid ordinal regex")
    });
    ORDINAL_RE.replace_all(s, "$1").to_string()
}
