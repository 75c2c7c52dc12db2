use thiserror::Error;

#[derive(Error, Debug)]
pub enum BlogError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] ureq::Error),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    UrlParseError(#[from] url::ParseError),

    #[error("Invalid input: {0}")]
    InputError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Feed parsing error: {0}")]
    FeedParseError(String),
}

impl BlogError {
    /// Get an actionable hint for how to resolve this error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            BlogError::HttpError(_) => Some(
                "Feed verification needs network access; drop --verify-feeds to skip it"
            ),
            BlogError::JsonError(_) | BlogError::InputError(_) => Some(
                "Input must be a JSON array of pages:\n  [{\"url\": \"https://example.com/blog\", \"html\": \"<html>...</html>\"}]"
            ),
            BlogError::TomlError(_) | BlogError::ConfigError(_) => Some(
                "Check --threshold and your config file, or point BLOGSIFT_CONFIG at a valid one"
            ),
            BlogError::UrlParseError(_) => Some(
                "URLs must be absolute, e.g. https://example.com/blog"
            ),
            BlogError::FeedParseError(_) => Some(
                "Check that the URL points to a valid RSS or Atom feed"
            ),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, BlogError>;
