//! Crawl events and the observer they are reported to
//!
//! The engine is handed an observer at construction and reports every
//! crawl-level decision to it. `TracingObserver` forwards events to
//! `tracing`; tests and front-ends can install their own.

use crate::crawler::engine::CrawlSummary;
use crate::crawler::fetcher::FetchError;
use url::Url;

/// Something the engine did or decided
#[derive(Debug)]
pub enum CrawlEvent<'a> {
    /// A run is starting with this many queued URLs
    Started { frontier: usize },

    /// A frontier URL was fetched
    PageFetched { url: &'a Url, status: u16 },

    /// A page answered with a non-2xx status and will not be stored
    PageUnavailable { url: &'a Url, status: u16 },

    /// Content for this canonical URL was already stored
    PageSkipped { canonical_url: &'a Url },

    /// Content was written for a page
    PageStored { canonical_url: &'a Url, links: usize },

    /// The store rejected a duplicate content key; the write was rolled back
    DuplicateContent { canonical_url: &'a Url },

    /// Edges left pending by an aborted run received this URL's status
    PendingLinksResolved { url: &'a Url, status: u16, links: usize },

    /// A link target was fetched to learn its status
    LinkProbed { url: &'a Url, status: u16 },

    /// A probed link target was queued for processing
    Enqueued { url: &'a Url },

    /// A fetch failed and the run is aborting
    FetchFailed { url: &'a Url, error: &'a FetchError },

    /// Periodic progress report
    Progress { processed: usize, frontier: usize },

    /// The frontier drained
    Finished { summary: &'a CrawlSummary },
}

/// Receives crawl events from the engine
pub trait CrawlObserver: Send + Sync {
    fn on_event(&self, event: &CrawlEvent<'_>);
}

/// Observer that logs every event through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl CrawlObserver for TracingObserver {
    fn on_event(&self, event: &CrawlEvent<'_>) {
        match event {
            CrawlEvent::Started { frontier } => {
                tracing::info!("Crawl started with {} queued URLs", frontier);
            }
            CrawlEvent::PageFetched { url, status } => {
                tracing::debug!("Fetched {} ({})", url, status);
            }
            CrawlEvent::PageUnavailable { url, status } => {
                tracing::info!("Page unavailable: {} ({})", url, status);
            }
            CrawlEvent::PageSkipped { canonical_url } => {
                tracing::info!("Page already processed: {}", canonical_url);
            }
            CrawlEvent::PageStored {
                canonical_url,
                links,
            } => {
                tracing::info!("Stored {} ({} internal links)", canonical_url, links);
            }
            CrawlEvent::DuplicateContent { canonical_url } => {
                tracing::warn!(
                    "Content for {} was stored concurrently; write rolled back",
                    canonical_url
                );
            }
            CrawlEvent::PendingLinksResolved { url, status, links } => {
                tracing::debug!("Resolved {} pending links to {} ({})", links, url, status);
            }
            CrawlEvent::LinkProbed { url, status } => {
                tracing::debug!("Probed {} ({})", url, status);
            }
            CrawlEvent::Enqueued { url } => {
                tracing::trace!("Queued {}", url);
            }
            CrawlEvent::FetchFailed { url, error } => {
                tracing::error!("Error occurred while opening {}: {}", url, error);
            }
            CrawlEvent::Progress {
                processed,
                frontier,
            } => {
                tracing::info!(
                    "Progress: {} pages processed, {} in frontier",
                    processed,
                    frontier
                );
            }
            CrawlEvent::Finished { summary } => {
                tracing::info!(
                    "Crawl completed: {} pages stored, {} skipped, {} links recorded in {:?}",
                    summary.pages_stored,
                    summary.pages_skipped,
                    summary.links_recorded,
                    summary.elapsed
                );
            }
        }
    }
}
