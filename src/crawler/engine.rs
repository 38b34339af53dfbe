//! Crawl engine - main traversal logic
//!
//! This module contains the crawl loop that coordinates all aspects of
//! the crawling process, including:
//! - Draining the frontier in FIFO order
//! - Skipping pages whose content is already stored
//! - Probing link targets once and caching their status
//! - Recording the link graph
//! - Leaving the frontier intact when a fetch fails, for dump/restore

use crate::crawler::cache::StatusCache;
use crate::crawler::fetcher::{FetchError, Fetcher, RequestOptions};
use crate::crawler::frontier::{Frontier, QueuedUrl};
use crate::crawler::observer::{CrawlEvent, CrawlObserver, TracingObserver};
use crate::crawler::page::Page;
use crate::storage::{ContentRecord, LinkEdge, StorageError, Store, PENDING_STATUS};
use crate::url::normalize_url;
use crate::IndexerError;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

/// Number of processed pages between progress reports
const PROGRESS_INTERVAL: usize = 10;

/// Counters for one run of the engine
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlSummary {
    /// Frontier entries handled
    pub pages_processed: usize,

    /// Frontier URLs that had to be fetched (entries without a probed page)
    pub pages_fetched: usize,

    /// Link targets fetched to learn their status
    pub probes: usize,

    /// Pages whose content was written
    pub pages_stored: usize,

    /// Pages whose content was already stored
    pub pages_skipped: usize,

    /// Frontier pages with a non-2xx status
    pub pages_unavailable: usize,

    /// Link edges written
    pub links_recorded: usize,

    /// Wall-clock time of the run
    pub elapsed: Duration,
}

/// Orchestrates fetcher, status cache, frontier and store
///
/// The engine processes one URL at a time: every check against the status
/// cache, the frontier or the store is followed by its write before the next
/// fetch is awaited.
pub struct CrawlEngine<F, S> {
    fetcher: F,
    store: S,
    options: RequestOptions,
    frontier: Frontier,
    cache: StatusCache,
    observer: Arc<dyn CrawlObserver>,
}

impl<F: Fetcher, S: Store> CrawlEngine<F, S> {
    /// Creates an engine with an empty frontier and status cache
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Performs every page and probe fetch
    /// * `store` - Receives content and link records
    /// * `options` - Headers and timeout passed to every fetch
    pub fn new(fetcher: F, store: S, options: RequestOptions) -> Self {
        Self {
            fetcher,
            store,
            options,
            frontier: Frontier::new(),
            cache: StatusCache::new(),
            observer: Arc::new(TracingObserver),
        }
    }

    /// Replaces the default `TracingObserver`
    pub fn with_observer(mut self, observer: Arc<dyn CrawlObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Normalizes a seed URL and queues it
    pub fn seed(&mut self, raw: &str) -> Result<Url, IndexerError> {
        let url = normalize_url(raw, None)?;
        if !self.frontier.push(QueuedUrl::new(url.clone())) {
            tracing::debug!("Seed {} is already queued", url);
        }
        Ok(url)
    }

    /// Queues an optional seed, then drains the frontier
    ///
    /// Pass `None` to continue with whatever the frontier already holds,
    /// e.g. after `restore`.
    pub async fn start(&mut self, seed: Option<&str>) -> Result<CrawlSummary, IndexerError> {
        if let Some(raw) = seed {
            let url = self.seed(raw)?;
            tracing::info!("Crawl started at: {}", url);
        }
        self.run().await
    }

    /// Drains the frontier
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlSummary)` - The frontier is empty
    /// * `Err(IndexerError)` - The run was aborted; the URL being processed
    ///   is back at the front of the frontier
    pub async fn run(&mut self) -> Result<CrawlSummary, IndexerError> {
        let start_time = Instant::now();
        let mut summary = CrawlSummary::default();

        self.observer.on_event(&CrawlEvent::Started {
            frontier: self.frontier.len(),
        });

        while let Some(entry) = self.frontier.pop() {
            self.process(entry, &mut summary).await?;
            summary.pages_processed += 1;

            if summary.pages_processed % PROGRESS_INTERVAL == 0 {
                self.observer.on_event(&CrawlEvent::Progress {
                    processed: summary.pages_processed,
                    frontier: self.frontier.len(),
                });
            }
        }

        summary.elapsed = start_time.elapsed();
        self.observer
            .on_event(&CrawlEvent::Finished { summary: &summary });

        Ok(summary)
    }

    /// Writes the pending URLs to `path`
    pub fn dump(&self, path: &Path) -> Result<usize, IndexerError> {
        let count = self.frontier.dump(path)?;
        tracing::info!("Dumped {} pending URLs to {}", count, path.display());
        Ok(count)
    }

    /// Queues the URLs listed in a dump file
    pub fn restore(&mut self, path: &Path) -> Result<usize, IndexerError> {
        let count = self.frontier.restore(path)?;
        tracing::info!("Restored {} pending URLs from {}", count, path.display());
        Ok(count)
    }

    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    pub fn status_cache(&self) -> &StatusCache {
        &self.cache
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Handles one frontier entry
    async fn process(
        &mut self,
        entry: QueuedUrl,
        summary: &mut CrawlSummary,
    ) -> Result<(), IndexerError> {
        let QueuedUrl { url, page } = entry;

        let page = match page {
            Some(page) => page,
            None => match self.fetch_page(&url).await {
                Ok(page) => {
                    summary.pages_fetched += 1;
                    self.observer.on_event(&CrawlEvent::PageFetched {
                        url: &url,
                        status: page.status(),
                    });
                    page
                }
                Err(error) => {
                    self.observer.on_event(&CrawlEvent::FetchFailed {
                        url: &url,
                        error: &error,
                    });
                    self.frontier.push_front(QueuedUrl::new(url));
                    return Err(error.into());
                }
            },
        };

        self.cache.record(url.clone(), page.status());

        match self.store.resolve_pending_links(url.as_str(), page.status()) {
            Ok(0) => {}
            Ok(links) => self.observer.on_event(&CrawlEvent::PendingLinksResolved {
                url: &url,
                status: page.status(),
                links,
            }),
            Err(e) => {
                self.frontier.push_front(QueuedUrl::with_page(url, page));
                return Err(e.into());
            }
        }

        if !page.is_available() {
            summary.pages_unavailable += 1;
            self.observer.on_event(&CrawlEvent::PageUnavailable {
                url: &url,
                status: page.status(),
            });
            return Ok(());
        }

        if !self.store_page(&url, &page, summary)? {
            return Ok(());
        }

        self.fan_out(&page, summary).await
    }

    /// Stores a page's content unless it is already stored
    ///
    /// Returns whether the content was written. On a storage failure the
    /// URL is put back in the frontier before the error propagates.
    fn store_page(
        &mut self,
        url: &Url,
        page: &Page,
        summary: &mut CrawlSummary,
    ) -> Result<bool, IndexerError> {
        let canonical_url = page.canonical_url();

        let stored = self
            .store
            .has_content(canonical_url.as_str())
            .and_then(|exists| {
                if exists {
                    return Ok(false);
                }
                self.store
                    .store_content(&ContentRecord::from_page(page))
                    .map(|()| true)
            });

        match stored {
            Ok(true) => {
                summary.pages_stored += 1;
                self.observer.on_event(&CrawlEvent::PageStored {
                    canonical_url,
                    links: page.internal_links().len(),
                });
                Ok(true)
            }
            Ok(false) => {
                summary.pages_skipped += 1;
                self.observer
                    .on_event(&CrawlEvent::PageSkipped { canonical_url });
                Ok(false)
            }
            Err(StorageError::Duplicate(_)) => {
                summary.pages_skipped += 1;
                self.observer
                    .on_event(&CrawlEvent::DuplicateContent { canonical_url });
                Ok(false)
            }
            Err(e) => {
                self.frontier
                    .push_front(QueuedUrl::with_page(url.clone(), page.clone()));
                Err(e.into())
            }
        }
    }

    /// Records an edge for every internal link, probing unknown targets
    async fn fan_out(&mut self, page: &Page, summary: &mut CrawlSummary) -> Result<(), IndexerError> {
        let source = page.canonical_url().as_str();
        let links: Vec<&Url> = page.internal_links().iter().collect();
        let mut edges = Vec::with_capacity(links.len());

        for (index, &link) in links.iter().enumerate() {
            if let Some(status) = self.cache.lookup(link) {
                edges.push(LinkEdge::new(link.as_str(), status));
                continue;
            }

            let probed = match self.fetch_page(link).await {
                Ok(probed) => probed,
                Err(error) => {
                    self.observer.on_event(&CrawlEvent::FetchFailed { url: link, error: &error });
                    self.abort_fan_out(source, link, &links[index + 1..], edges, summary)?;
                    return Err(error.into());
                }
            };

            summary.probes += 1;
            let status = probed.status();
            self.observer
                .on_event(&CrawlEvent::LinkProbed { url: link, status });
            self.cache.record(link.clone(), status);
            edges.push(LinkEdge::new(link.as_str(), status));

            self.enqueue_probed(link, probed)?;
        }

        self.store.store_links(source, &edges)?;
        summary.links_recorded += edges.len();
        Ok(())
    }

    /// Saves what a failed fan-out has learned and requeues what it has not
    ///
    /// Every edge of the page is written. Targets with a known status get
    /// it; the failed target and every remaining unknown target get
    /// `PENDING_STATUS` and go to the front of the frontier, in link order,
    /// so the next run fetches them first and fills in their status.
    fn abort_fan_out(
        &mut self,
        source: &str,
        failed: &Url,
        remaining: &[&Url],
        mut edges: Vec<LinkEdge>,
        summary: &mut CrawlSummary,
    ) -> Result<(), IndexerError> {
        let mut requeue = vec![failed.clone()];
        edges.push(LinkEdge::new(failed.as_str(), PENDING_STATUS));

        for &link in remaining {
            match self.cache.lookup(link) {
                Some(status) => edges.push(LinkEdge::new(link.as_str(), status)),
                None => {
                    edges.push(LinkEdge::new(link.as_str(), PENDING_STATUS));
                    requeue.push(link.clone());
                }
            }
        }

        for url in requeue.into_iter().rev() {
            self.frontier.push_front(QueuedUrl::new(url));
        }

        self.store.store_links(source, &edges)?;
        summary.links_recorded += edges.len();
        Ok(())
    }

    /// Queues a probed link target if it is worth processing
    ///
    /// A target already queued without a page (restored or requeued) gets
    /// the probed page attached so it is not fetched again. Otherwise only
    /// crawlable pages whose canonical URL is not stored yet are queued;
    /// anything else stays a leaf of the link graph.
    fn enqueue_probed(&mut self, link: &Url, probed: Page) -> Result<(), IndexerError> {
        if self.frontier.contains(link) {
            if self.frontier.attach_page(link, probed) {
                tracing::trace!("Attached fetched page to queued {}", link);
            }
            return Ok(());
        }

        if !probed.is_crawlable() {
            return Ok(());
        }

        if self.store.has_content(probed.canonical_url().as_str())? {
            return Ok(());
        }

        if self.frontier.push(QueuedUrl::with_page(link.clone(), probed)) {
            self.observer.on_event(&CrawlEvent::Enqueued { url: link });
        }
        Ok(())
    }

    async fn fetch_page(&self, url: &Url) -> Result<Page, FetchError> {
        let response = self.fetcher.fetch(url, &self.options).await?;
        Ok(Page::from_response(url.clone(), response))
    }
}
