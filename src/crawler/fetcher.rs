//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - The `Fetcher` trait the engine is generic over
//! - Building the HTTP client
//! - GET requests with caller-supplied headers and timeout
//! - Error classification (timeouts vs. other transport failures)

use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Default per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Maximum number of redirects followed for a single fetch
const MAX_REDIRECTS: usize = 10;

/// Errors raised when a fetch could not complete
///
/// An HTTP error status is not a `FetchError`: the response is returned and
/// the caller decides what the status means.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Transport error for {url}: {message}")]
    Transport { url: String, message: String },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

impl FetchError {
    /// The URL whose fetch failed, if known
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Timeout { url } | Self::Transport { url, .. } => Some(url),
            Self::Client(_) => None,
        }
    }
}

/// Options passed unmodified to every fetch of a crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOptions {
    /// Extra request headers (e.g. a `User-Agent` override)
    pub headers: BTreeMap<String, String>,

    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            headers: BTreeMap::new(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl RequestOptions {
    /// Adds a request header, replacing any previous value for the same name
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Raw result of one completed HTTP GET
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// HTTP status code
    pub status: u16,

    /// Final URL after redirects
    pub resolved_url: Url,

    /// Content-Type header value, lowercased (empty if absent)
    pub content_type: String,

    /// Response body
    pub body: Vec<u8>,
}

/// Performs one HTTP GET per call
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches `url`, passing the options through to the request
    ///
    /// Returns the response for any HTTP status; fails only when the
    /// request could not complete (network, DNS, timeout).
    async fn fetch(&self, url: &Url, options: &RequestOptions) -> Result<FetchResponse, FetchError>;
}

#[async_trait]
impl<T: Fetcher + ?Sized> Fetcher for std::sync::Arc<T> {
    async fn fetch(&self, url: &Url, options: &RequestOptions) -> Result<FetchResponse, FetchError> {
        (**self).fetch(url, options).await
    }
}

/// Builds the HTTP client used by `HttpFetcher`
///
/// The client's own user agent is only a default: a `User-Agent` entry in
/// `RequestOptions::headers` overrides it per request.
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// `Fetcher` backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, FetchError> {
        Ok(Self {
            client: build_http_client()?,
        })
    }

    /// Wraps an existing client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url, options: &RequestOptions) -> Result<FetchResponse, FetchError> {
        let mut request = self.client.get(url.clone()).timeout(options.timeout);
        for (name, value) in &options.headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status().as_u16();
        let resolved_url = response.url().clone();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_lowercase();

        let body = response
            .bytes()
            .await
            .map_err(|e| classify_error(url, e))?
            .to_vec();

        tracing::trace!("GET {} -> {} ({} bytes)", url, status, body.len());

        Ok(FetchResponse {
            status,
            resolved_url,
            content_type,
            body,
        })
    }
}

/// Maps a reqwest error onto the fetch error taxonomy
fn classify_error(url: &Url, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_connect() {
        FetchError::Transport {
            url: url.to_string(),
            message: format!("Connection failed: {}", error),
        }
    } else {
        FetchError::Transport {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}
