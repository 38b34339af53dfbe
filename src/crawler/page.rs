//! Page construction from fetch results

use crate::crawler::fetcher::FetchResponse;
use crate::crawler::parser::parse_html;
use crate::url::{normalize_url, same_site};
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use url::Url;

/// Content types whose documents are parsed for links
const HYPERTEXT_TYPES: &[&str] = &["text/html", "application/xhtml+xml"];

/// One fetched page
///
/// Built once from a `FetchResponse` and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    status: u16,
    url: Url,
    resolved_url: Url,
    canonical_url: Url,
    content_type: String,
    content: Vec<u8>,
    internal_links: BTreeSet<Url>,
}

impl Page {
    /// Builds a page from the response to a request for `requested`
    ///
    /// Available hypertext responses are parsed: the canonical hint (if any)
    /// replaces the resolved URL as the page's identity, and every anchor on
    /// the same registrable domain becomes an internal link. Other responses
    /// keep their body but have no links.
    pub fn from_response(requested: Url, response: FetchResponse) -> Self {
        let FetchResponse {
            status,
            resolved_url,
            content_type,
            body,
        } = response;

        let mut resolved_url = resolved_url;
        resolved_url.set_fragment(None);
        let content_type = content_type.to_lowercase();

        let mut canonical_url = resolved_url.clone();
        let mut internal_links = BTreeSet::new();

        if is_success(status) && is_hypertext(&content_type) {
            let html = String::from_utf8_lossy(&body);
            let parsed = parse_html(&html);

            if let Some(hint) = parsed.canonical {
                match normalize_url(&hint, Some(&resolved_url)) {
                    Ok(url) => canonical_url = url,
                    Err(e) => tracing::debug!("Ignoring canonical hint on {}: {}", resolved_url, e),
                }
            }

            for href in &parsed.hrefs {
                match normalize_url(href, Some(&resolved_url)) {
                    Ok(link) if same_site(&link, &resolved_url) => {
                        internal_links.insert(link);
                    }
                    Ok(_) => {}
                    Err(e) => tracing::trace!("Dropping link {:?} on {}: {}", href, resolved_url, e),
                }
            }
        }

        Self {
            status,
            url: requested,
            resolved_url,
            canonical_url,
            content_type,
            content: body,
            internal_links,
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    /// The URL that was requested
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The URL after redirects
    pub fn resolved_url(&self) -> &Url {
        &self.resolved_url
    }

    /// The dedup key for the content table
    pub fn canonical_url(&self) -> &Url {
        &self.canonical_url
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn internal_links(&self) -> &BTreeSet<Url> {
        &self.internal_links
    }

    /// Returns true for a 2xx status
    pub fn is_available(&self) -> bool {
        is_success(self.status)
    }

    /// Returns true if the page is available hypertext whose links can be followed
    pub fn is_crawlable(&self) -> bool {
        self.is_available() && is_hypertext(&self.content_type)
    }

    /// Hex-encoded SHA-256 of the content
    pub fn digest(&self) -> String {
        content_digest(&self.content)
    }
}

/// Computes the hex-encoded SHA-256 digest of page content
///
/// The digest is stored alongside the content for change detection; it is
/// never used as a dedup key.
pub fn content_digest(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    hex::encode(hasher.finalize())
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Checks the media type part of a Content-Type value
fn is_hypertext(content_type: &str) -> bool {
    let media_type = content_type.split(';').next().unwrap_or("").trim();
    HYPERTEXT_TYPES.contains(&media_type)
}
