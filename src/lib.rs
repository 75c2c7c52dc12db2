pub mod cli;
pub mod config;
pub mod dom;
pub mod error;
pub mod feeds;
pub mod harvest;
pub mod index;
pub mod normalize;
pub mod page_facts;
pub mod pipeline;
pub mod rank;
pub mod scoring;
pub mod types;
pub mod urls;

pub use error::{BlogError, Result};
pub use pipeline::{extract, Extractor};
pub use types::{ArticleRecord, BlogExtractionResult, Page};
