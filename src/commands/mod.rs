//! Command implementations for the blogsift CLI

mod extract;
mod misc;
mod score;

pub use extract::*;
pub use misc::*;
pub use score::*;

use std::io::Read;

use blogsift::error::{BlogError, Result};
use blogsift::Page;

/// Read a JSON array of pages from a file path, or stdin for "-"
pub fn load_pages(input: &str) -> Result<Vec<Page>> {
    let content = if input == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(input)?
    };

    let pages: Vec<Page> = serde_json::from_str(&content)?;
    if pages.is_empty() {
        return Err(BlogError::InputError(format!("no pages in {}", input)));
    }
    Ok(pages)
}
