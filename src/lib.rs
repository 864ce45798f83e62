//! Bilingual-Harvest: an English/Welsh parallel text harvester
//!
//! This crate reads a site's sitemap, pairs English pages with their Welsh
//! counterparts, extracts the main text of both, keeps the pairs that look
//! like genuine translations and writes them out as JSON lines.

pub mod config;
pub mod crawler;
pub mod output;
pub mod quality;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Bilingual-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP status {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Sitemap error for {url}: {source}")]
    Sitemap { url: String, source: SitemapError },

    #[error("No content region found in {url}")]
    NoContent { url: String },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Record serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Worker task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl HarvestError {
    /// Returns true if retrying the same request may succeed
    ///
    /// Timeouts, connection failures, HTTP 408, HTTP 429 and HTTP 5xx are
    /// transient. Everything else is permanent.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout { .. } => true,
            Self::Http { source, .. } => {
                source.is_timeout()
                    || source.is_connect()
                    || source.is_request()
                    || source.is_body()
            }
            Self::HttpStatus { status, .. } => {
                matches!(*status, 408 | 429) || (500..600).contains(status)
            }
            _ => false,
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid CSS selector: {0}")]
    InvalidSelector(String),
}

/// Sitemap document errors
#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("invalid XML: {0}")]
    InvalidXml(String),

    #[error("document has no root element")]
    MissingRoot,

    #[error("unknown root element <{0}>")]
    UnknownRoot(String),

    #[error("XPath error: {0}")]
    XPath(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for Bilingual-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for sitemap parsing
pub type SitemapResult<T> = std::result::Result<T, SitemapError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use output::{BilingualRecord, JsonlWriter};
pub use quality::QualityChecker;
pub use state::PairOutcome;
pub use self::url::{derive_pairs, normalize_url, PageCandidatePair};
