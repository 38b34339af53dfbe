//! Crawl frontier: the URLs waiting to be processed
//!
//! This module handles:
//! - FIFO ordering (shallow pages are processed before deep ones)
//! - Membership tracking so a URL is queued at most once
//! - Dumping pending URLs to a text file and restoring them after a crash

use crate::crawler::page::Page;
use crate::url::normalize_url;
use crate::IndexerError;
use std::collections::{HashSet, VecDeque};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use url::Url;

/// A URL queued for processing
#[derive(Debug, Clone)]
pub struct QueuedUrl {
    /// The URL to process
    pub url: Url,

    /// The page already fetched for this URL while probing it, if any
    pub page: Option<Page>,
}

impl QueuedUrl {
    pub fn new(url: Url) -> Self {
        Self { url, page: None }
    }

    /// A URL whose page was fetched while probing a link
    pub fn with_page(url: Url, page: Page) -> Self {
        Self {
            url,
            page: Some(page),
        }
    }
}

/// FIFO queue of pending URLs with set semantics
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<QueuedUrl>,
    members: HashSet<Url>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry to the back of the queue
    ///
    /// # Returns
    ///
    /// * `true` - The entry was queued
    /// * `false` - The URL was already queued; nothing changed
    pub fn push(&mut self, entry: QueuedUrl) -> bool {
        if !self.members.insert(entry.url.clone()) {
            return false;
        }
        self.queue.push_back(entry);
        true
    }

    /// Puts an entry back at the front of the queue
    ///
    /// Used when processing of `entry` was aborted, so that it is the first
    /// URL handled by the next run.
    pub fn push_front(&mut self, entry: QueuedUrl) -> bool {
        if !self.members.insert(entry.url.clone()) {
            return false;
        }
        self.queue.push_front(entry);
        true
    }

    /// Removes and returns the oldest entry
    pub fn pop(&mut self) -> Option<QueuedUrl> {
        let entry = self.queue.pop_front()?;
        self.members.remove(&entry.url);
        Some(entry)
    }

    /// Attaches an already-fetched page to a queued entry that has none
    ///
    /// # Returns
    ///
    /// * `true` - The entry now carries `page`
    /// * `false` - `url` is not queued, or its entry already has a page
    pub fn attach_page(&mut self, url: &Url, page: Page) -> bool {
        match self
            .queue
            .iter_mut()
            .find(|entry| entry.url == *url && entry.page.is_none())
        {
            Some(entry) => {
                entry.page = Some(page);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, url: &Url) -> bool {
        self.members.contains(url)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Pending URLs in processing order
    pub fn urls(&self) -> impl Iterator<Item = &Url> {
        self.queue.iter().map(|entry| &entry.url)
    }

    /// Writes every pending URL to `path`, one per line
    ///
    /// Pages attached to entries are not written; restored entries are
    /// fetched again.
    ///
    /// # Returns
    ///
    /// The number of URLs written
    pub fn dump(&self, path: &Path) -> std::io::Result<usize> {
        let mut writer = BufWriter::new(File::create(path)?);
        for url in self.urls() {
            writeln!(writer, "{}", url)?;
        }
        writer.flush()?;
        Ok(self.len())
    }

    /// Appends the URLs listed in a dump file to the back of the queue
    ///
    /// Each line is normalized the way links are, so restored entries share
    /// membership keys with discovered links. Blank lines are skipped and
    /// URLs already queued are ignored. A line that is not an absolute page
    /// URL makes the whole file corrupt.
    ///
    /// # Returns
    ///
    /// The number of URLs added
    pub fn restore(&mut self, path: &Path) -> Result<usize, IndexerError> {
        let reader = BufReader::new(File::open(path)?);
        let mut urls = Vec::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let url = normalize_url(line, None).map_err(|e| IndexerError::CorruptDump {
                path: path.to_path_buf(),
                line: index + 1,
                message: e.to_string(),
            })?;
            urls.push(url);
        }

        // Validate the whole file before touching the queue
        let added = urls
            .into_iter()
            .filter(|url| self.push(QueuedUrl::new(url.clone())))
            .count();

        Ok(added)
    }
}
