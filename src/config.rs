use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{BlogError, Result};
use crate::feeds;
use crate::harvest::DEFAULT_FALLBACK_MIN_RECORDS;
use crate::rank::MAX_ARTICLES;
use crate::scoring::{BLOG_SCORE_THRESHOLD, MAX_BLOG_SCORE};

/// Extraction configuration. Defaults reproduce the stock heuristics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Minimum blog score for a page to be a candidate
    #[serde(default = "default_threshold")]
    pub score_threshold: f32,

    /// Maximum number of articles returned
    #[serde(default = "default_max_articles")]
    pub max_articles: usize,

    /// Below this many accumulated records, the link fallback runs on a page
    #[serde(default = "default_fallback_min")]
    pub fallback_min_records: usize,

    /// Feed paths guessed on the site origin when no page references a feed
    #[serde(default = "feeds::default_feed_paths")]
    pub feed_paths: Vec<String>,

    /// Per-request timeout for optional feed verification
    #[serde(default = "default_verify_timeout")]
    pub verify_timeout_secs: u64,
}

fn default_threshold() -> f32 {
    BLOG_SCORE_THRESHOLD
}

fn default_max_articles() -> usize {
    MAX_ARTICLES
}

fn default_fallback_min() -> usize {
    DEFAULT_FALLBACK_MIN_RECORDS
}

fn default_verify_timeout() -> u64 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            score_threshold: default_threshold(),
            max_articles: default_max_articles(),
            fallback_min_records: default_fallback_min(),
            feed_paths: feeds::default_feed_paths(),
            verify_timeout_secs: default_verify_timeout(),
        }
    }
}

impl Config {
    /// Load configuration from `$BLOGSIFT_CONFIG` or the default location
    ///
    /// A missing file yields the defaults.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_toml_str(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse and validate a TOML configuration string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Replace the candidate threshold, rejecting values outside [0, 10]
    pub fn with_score_threshold(mut self, threshold: f32) -> Result<Self> {
        self.score_threshold = threshold;
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<()> {
        if !(0.0..=MAX_BLOG_SCORE).contains(&self.score_threshold) {
            return Err(BlogError::ConfigError(format!(
                "score_threshold must be between 0 and {}, got {}",
                MAX_BLOG_SCORE, self.score_threshold
            )));
        }
        if self.max_articles == 0 {
            return Err(BlogError::ConfigError(
                "max_articles must be at least 1".into(),
            ));
        }
        if let Some(bad) = self.feed_paths.iter().find(|p| !p.starts_with('/')) {
            return Err(BlogError::ConfigError(format!(
                "feed path '{}' must start with '/'",
                bad
            )));
        }
        Ok(())
    }

    pub fn verify_timeout(&self) -> Duration {
        Duration::from_secs(self.verify_timeout_secs)
    }

    /// Get the config file path
    ///
    /// Supports BLOGSIFT_CONFIG environment variable override
    pub fn config_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var("BLOGSIFT_CONFIG") {
            return Ok(PathBuf::from(path));
        }
        let dirs = ProjectDirs::from("", "", "blogsift")
            .ok_or_else(|| BlogError::ConfigError("Could not determine config directory".into()))?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}
