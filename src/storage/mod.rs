//! Storage module for persisting crawl data
//!
//! This module handles all database operations for the crawler, including:
//! - SQLite database initialization and schema management
//! - The content table, keyed by canonical URL
//! - The link table (source → destination edges with the observed status)

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStore;
pub use traits::{Store, StorageError, StorageResult};

use crate::crawler::Page;

use std::path::Path;

/// Default database file name inside the output directory
pub const DEFAULT_DATABASE_NAME: &str = "result.db";

/// Opens or creates a store database
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
/// * `fresh` - Delete an existing database first
pub fn open_store(path: &Path, fresh: bool) -> StorageResult<SqliteStore> {
    if fresh && path.exists() {
        tracing::info!("Removing existing database {}", path.display());
        std::fs::remove_file(path)?;

        // WAL sidecar files left by an unclean shutdown
        for suffix in ["-wal", "-shm"] {
            let mut sidecar = path.as_os_str().to_owned();
            sidecar.push(suffix);
            let sidecar = Path::new(&sidecar);
            if sidecar.exists() {
                std::fs::remove_file(sidecar)?;
            }
        }
    }
    SqliteStore::new(path)
}

/// Edge status for a destination that has not been fetched yet
///
/// Written when a link fan-out is cut short by a transport failure; the
/// real status replaces it once the destination is fetched.
pub const PENDING_STATUS: u16 = 0;

/// Content row to be written for one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRecord {
    pub url: String,
    pub status: u16,
    pub content_type: String,
    pub content: Vec<u8>,
    pub digest: String,
}

impl ContentRecord {
    /// Builds the record for a page, keyed by its canonical URL
    pub fn from_page(page: &Page) -> Self {
        Self {
            url: page.canonical_url().to_string(),
            status: page.status(),
            content_type: page.content_type().to_string(),
            content: page.content().to_vec(),
            digest: page.digest(),
        }
    }
}

/// Content row as read back from the store
#[derive(Debug, Clone)]
pub struct StoredContent {
    pub url: String,
    pub status: u16,
    pub content_type: String,
    pub content: Vec<u8>,
    pub digest: String,
    pub stored_at: String,
}

/// One outgoing link of a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkEdge {
    /// Normalized destination URL
    pub dest: String,

    /// Status observed for the destination
    pub status: u16,
}

impl LinkEdge {
    pub fn new(dest: impl Into<String>, status: u16) -> Self {
        Self {
            dest: dest.into(),
            status,
        }
    }
}
