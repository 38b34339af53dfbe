//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::storage::{ContentRecord, LinkEdge, StoredContent};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    /// Content for this URL is already stored; the write was rolled back
    #[error("Content already stored for {0}")]
    Duplicate(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// The crawler only appends to the store; the single read on the crawl path
/// is the `has_content` membership check. Implementations must make a
/// successful write durable before returning.
pub trait Store {
    // ===== Content =====

    /// Returns true if content is already stored for `url`
    fn has_content(&self, url: &str) -> StorageResult<bool>;

    /// Stores the content of one page
    ///
    /// Fails with `StorageError::Duplicate` if content for the same URL is
    /// already stored; the failed write leaves the store unchanged.
    fn store_content(&mut self, record: &ContentRecord) -> StorageResult<()>;

    // ===== Links =====

    /// Records one link edge
    ///
    /// Edges are not deduplicated.
    fn store_link(&mut self, source: &str, dest: &str, status: u16) -> StorageResult<()>;

    /// Records a batch of edges leaving one source page
    fn store_links(&mut self, source: &str, edges: &[LinkEdge]) -> StorageResult<()> {
        for edge in edges {
            self.store_link(source, &edge.dest, edge.status)?;
        }
        Ok(())
    }

    /// Fills in the observed status of edges still marked `PENDING_STATUS`
    /// that point at `dest`
    ///
    /// # Returns
    ///
    /// The number of edges updated
    fn resolve_pending_links(&mut self, dest: &str, status: u16) -> StorageResult<usize>;

    // ===== Inspection =====

    /// Gets stored content by URL
    fn get_content(&self, url: &str) -> StorageResult<Option<StoredContent>>;

    /// Gets all edges leaving `source`, in insertion order
    fn links_from(&self, source: &str) -> StorageResult<Vec<LinkEdge>>;

    /// Counts stored content rows
    fn count_content(&self) -> StorageResult<u64>;

    /// Counts stored link edges
    fn count_links(&self) -> StorageResult<u64>;
}
