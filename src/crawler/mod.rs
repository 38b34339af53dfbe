//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the `Fetcher` trait
//! - HTML parsing and link extraction
//! - Page construction and content digests
//! - The status cache and the FIFO frontier
//! - The crawl engine and the events it reports

mod cache;
mod engine;
mod fetcher;
mod frontier;
mod observer;
mod page;
mod parser;

pub use cache::StatusCache;
pub use engine::{CrawlEngine, CrawlSummary};
pub use fetcher::{
    build_http_client, FetchError, FetchResponse, Fetcher, HttpFetcher, RequestOptions,
    DEFAULT_TIMEOUT_SECS,
};
pub use frontier::{Frontier, QueuedUrl};
pub use observer::{CrawlEvent, CrawlObserver, TracingObserver};
pub use page::{content_digest, Page};
pub use parser::{parse_html, ParsedDocument};
