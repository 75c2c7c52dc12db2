//! Deduplication and ranking of harvested articles

use std::cmp::Ordering;
use std::collections::HashSet;

use chrono::NaiveDateTime;

use crate::normalize::parse_date;
use crate::types::ArticleRecord;

/// Maximum number of articles in a result
pub const MAX_ARTICLES: usize = 15;

/// Newest first; parsed dates before unparsable ones, which keep their order
fn by_recency(a: &Option<NaiveDateTime>, b: &Option<NaiveDateTime>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Order records for output and cap the list
///
/// Records carrying a date come first, newest first. Records without a date
/// follow in encounter order. The first occurrence of a URL wins and at most
/// `limit` records are returned.
pub fn rank_articles(records: Vec<ArticleRecord>, limit: usize) -> Vec<ArticleRecord> {
    let (dated, undated): (Vec<ArticleRecord>, Vec<ArticleRecord>) = records
        .into_iter()
        .partition(|r| r.date.as_deref().map(|d| !d.trim().is_empty()).unwrap_or(false));

    let mut dated: Vec<(Option<NaiveDateTime>, ArticleRecord)> = dated
        .into_iter()
        .map(|r| (r.date.as_deref().and_then(parse_date), r))
        .collect();
    dated.sort_by(|(a, _), (b, _)| by_recency(a, b));

    let mut seen = HashSet::new();
    dated
        .into_iter()
        .map(|(_, r)| r)
        .chain(undated)
        .filter(|r| seen.insert(r.url.clone()))
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(url: &str, date: Option<&str>) -> ArticleRecord {
        ArticleRecord {
            title: url.to_string(),
            url: url.to_string(),
            date: date.map(String::from),
            ..Default::default()
        }
    }

    fn urls(records: &[ArticleRecord]) -> Vec<&str> {
        records.iter().map(|r| r.url.as_str()).collect()
    }

    #[test]
    fn test_dated_first_newest_first() {
        let ranked = rank_articles(
            vec![
                record("a", None),
                record("b", Some("2023-01-01")),
                record("c", Some("2024-06-01")),
                record("d", None),
                record("e", Some("March 3, 2024")),
            ],
            MAX_ARTICLES,
        );
        assert_eq!(urls(&ranked), vec!["c", "e", "b", "a", "d"]);
    }

    #[test]
    fn test_unparsable_dates_kept_in_order_after_parsed() {
        let ranked = rank_articles(
            vec![
                record("x", Some("last week")),
                record("y", Some("2020-01-01")),
                record("z", Some("a while ago")),
                record("w", None),
            ],
            MAX_ARTICLES,
        );
        assert_eq!(urls(&ranked), vec!["y", "x", "z", "w"]);
    }

    #[test]
    fn test_duplicates_removed_and_capped() {
        let mut records: Vec<ArticleRecord> =
            (0..20).map(|i| record(&format!("u{}", i), None)).collect();
        records.push(record("u3", Some("2024-01-01")));

        let ranked = rank_articles(records, MAX_ARTICLES);
        assert_eq!(ranked.len(), MAX_ARTICLES);
        assert_eq!(ranked[0].url, "u3");
        let unique: HashSet<&str> = urls(&ranked).into_iter().collect();
        assert_eq!(unique.len(), ranked.len());
    }

    #[test]
    fn test_blank_date_counts_as_undated() {
        let ranked = rank_articles(
            vec![record("a", Some("  ")), record("b", Some("2024-01-01"))],
            MAX_ARTICLES,
        );
        assert_eq!(urls(&ranked), vec!["b", "a"]);
    }
}
