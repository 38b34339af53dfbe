//! Site-Indexer: a same-domain site crawler
//!
//! This crate crawls a website from a seed URL, follows internal links, and
//! records every page's content and the link graph into a SQLite database.
//! An interrupted crawl can be resumed from a dump of its pending frontier.

pub mod config;
pub mod crawler;
pub mod storage;
pub mod url;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Site-Indexer operations
#[derive(Debug, Error)]
pub enum IndexerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] crawler::FetchError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("Corrupt frontier dump {} at line {line}: {message}", path.display())]
    CorruptDump {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
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

/// URL-specific errors
///
/// Every variant means "not a page link": callers extracting links drop the
/// candidate instead of retrying it.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UrlError {
    #[error("Empty link")]
    Empty,

    #[error("Not a page link: {0}")]
    NotPageLink(String),

    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Missing host in URL: {0}")]
    MissingHost(String),
}

/// Result type alias for Site-Indexer operations
pub type Result<T> = std::result::Result<T, IndexerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlEngine, CrawlSummary, Fetcher, HttpFetcher, Page, RequestOptions};
pub use storage::{SqliteStore, Store};
pub use self::url::{extract_domain, normalize_url, registrable_domain, same_site};
