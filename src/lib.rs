//! Mailtrawl: a rate-limited social-graph email crawler
//!
//! This crate crawls a social graph hosted behind an HTTP+HTML interface:
//! for each seed user it walks the paginated follower listing, then fetches
//! every follower's profile page and persists each non-empty email address
//! to an append-only text file.

pub mod config;
pub mod crawler;
pub mod output;

use thiserror::Error;

/// Main error type for mailtrawl operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Retries exhausted for {url}")]
    RetriesExhausted { url: String },

    #[error("Throttle gate closed")]
    ThrottleClosed,

    #[error("Sink write error: {0}")]
    Sink(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl CrawlError {
    /// Whether this error originated in the transport layer (network error,
    /// bad status, timeout, or retry exhaustion thereof) rather than the
    /// sink or setup.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            CrawlError::Http { .. }
                | CrawlError::Timeout { .. }
                | CrawlError::RetriesExhausted { .. }
        )
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
}

/// Result type alias for mailtrawl operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Coordinator, CookieJar, Fetcher, PageExtract, ThrottleGate};
pub use output::{FileSink, Sink};
