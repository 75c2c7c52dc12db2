//! Core data types passed into and out of the extraction pipeline

use serde::{Deserialize, Serialize};

/// A crawled page: the URL it was fetched from and its raw HTML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub url: String,
    pub html: String,
}

impl Page {
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            html: html.into(),
        }
    }
}

/// A single article harvested from a listing page
///
/// `title` and `url` are always non-empty for records that leave the harvester.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleRecord {
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

impl ArticleRecord {
    /// Fill any missing optional field from `other`, never overwriting
    pub fn backfill(&mut self, other: ArticleRecord) {
        if self.excerpt.is_none() {
            self.excerpt = other.excerpt;
        }
        if self.image_url.is_none() {
            self.image_url = other.image_url;
        }
        if self.date.is_none() {
            self.date = other.date;
        }
        if self.author.is_none() {
            self.author = other.author;
        }
    }
}

/// Final output of one pipeline run over a site's pages
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogExtractionResult {
    pub has_blog: bool,
    pub blog_url: Option<String>,
    pub articles: Vec<ArticleRecord>,
    pub rss_feeds: Vec<String>,
}

impl BlogExtractionResult {
    /// The zero result: no blog, no articles, no feeds
    pub fn empty() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backfill_keeps_existing_fields() {
        let mut record = ArticleRecord {
            title: "First".into(),
            url: "https://ex.com/blog/first".into(),
            date: Some("2024-01-01".into()),
            ..Default::default()
        };
        record.backfill(ArticleRecord {
            date: Some("1999-01-01".into()),
            author: Some("Jane".into()),
            ..Default::default()
        });

        assert_eq!(record.date.as_deref(), Some("2024-01-01"));
        assert_eq!(record.author.as_deref(), Some("Jane"));
    }

    #[test]
    fn test_result_serializes_camel_case() {
        let json = serde_json::to_value(BlogExtractionResult::empty()).unwrap();
        assert_eq!(json["hasBlog"], false);
        assert!(json["blogUrl"].is_null());
        assert!(json["rssFeeds"].as_array().unwrap().is_empty());
    }
}
