//! The extraction pipeline: score, filter, select index, discover feeds,
//! harvest, rank
//!
//! Each stage takes the previous stage's output by reference and produces a
//! new value; the only mutable state is the `Harvest` accumulator local to
//! one run.

use std::panic::{self, AssertUnwindSafe};

use crate::config::Config;
use crate::feeds;
use crate::harvest::Harvest;
use crate::index;
use crate::rank;
use crate::scoring::{self, ScoredPage};
use crate::types::{BlogExtractionResult, Page};

/// Runs the pipeline with a fixed configuration
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    config: Config,
}

impl Extractor {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Score every page, in input order
    pub fn score(&self, pages: &[Page]) -> Vec<ScoredPage> {
        scoring::score_pages(pages)
    }

    /// Whether a scored page clears the candidate threshold
    pub fn is_candidate(&self, page: &ScoredPage) -> bool {
        page.blog_score >= self.config.score_threshold
    }

    /// Extract the blog of one site from its crawled pages
    ///
    /// Never fails: a panic anywhere in the pipeline yields the zero result.
    pub fn extract(&self, pages: &[Page]) -> BlogExtractionResult {
        match panic::catch_unwind(AssertUnwindSafe(|| self.run(pages))) {
            Ok(result) => result,
            Err(_) => {
                log::warn!("extraction aborted over {} page(s), returning empty result", pages.len());
                BlogExtractionResult::empty()
            }
        }
    }

    fn run(&self, pages: &[Page]) -> BlogExtractionResult {
        let scored = self.score(pages);
        let candidates = scoring::filter_candidates(scored, self.config.score_threshold);
        if candidates.is_empty() {
            log::debug!("no page of {} reached {:.1}", pages.len(), self.config.score_threshold);
            return BlogExtractionResult::empty();
        }
        log::debug!("{} candidate page(s)", candidates.len());

        let blog_url = index::select_index(&candidates).map(|p| p.url().to_string());
        let rss_feeds = feeds::discover_feeds(&candidates, &self.config.feed_paths);

        let mut harvest = Harvest::with_fallback_min(self.config.fallback_min_records);
        for candidate in &candidates {
            harvest.harvest_document(candidate.url(), &candidate.document);
        }
        let articles = rank::rank_articles(harvest.into_records(), self.config.max_articles);

        BlogExtractionResult {
            has_blog: true,
            blog_url,
            articles,
            rss_feeds,
        }
    }
}

/// Extract with the default configuration
pub fn extract(pages: &[Page]) -> BlogExtractionResult {
    Extractor::default().extract(pages)
}
