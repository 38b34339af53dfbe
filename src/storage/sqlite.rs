//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Store trait.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Store, StorageError, StorageResult};
use crate::storage::{ContentRecord, LinkEdge, StoredContent, PENDING_STATUS};
use chrono::Utc;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Creates a new SqliteStore instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStore)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to open database
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        // Every committed write must survive a crash before the crawl moves on
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = FULL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

impl Store for SqliteStore {
    // ===== Content =====

    fn has_content(&self, url: &str) -> StorageResult<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM content WHERE url = ?1",
            params![url],
            |row| row.get(0),
        )?;
        Ok(count != 0)
    }

    fn store_content(&mut self, record: &ContentRecord) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;

        let inserted = tx.execute(
            "INSERT INTO content (url, status, content_type, content, digest, stored_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                record.url,
                record.status,
                record.content_type,
                record.content,
                record.digest,
                now
            ],
        );

        match inserted {
            Ok(_) => {
                tx.commit()?;
                Ok(())
            }
            Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
                tx.rollback()?;
                Err(StorageError::Duplicate(record.url.clone()))
            }
            // Dropping the transaction rolls it back
            Err(e) => Err(e.into()),
        }
    }

    // ===== Links =====

    fn store_link(&mut self, source: &str, dest: &str, status: u16) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO link (source, dest, status, discovered_at) VALUES (?1, ?2, ?3, ?4)",
            params![source, dest, status, now],
        )?;
        Ok(())
    }

    fn store_links(&mut self, source: &str, edges: &[LinkEdge]) -> StorageResult<()> {
        if edges.is_empty() {
            return Ok(());
        }

        let now = Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO link (source, dest, status, discovered_at) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for edge in edges {
                stmt.execute(params![source, edge.dest, edge.status, now])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn resolve_pending_links(&mut self, dest: &str, status: u16) -> StorageResult<usize> {
        let updated = self.conn.execute(
            "UPDATE link SET status = ?1 WHERE dest = ?2 AND status = ?3",
            params![status, dest, PENDING_STATUS],
        )?;
        Ok(updated)
    }

    // ===== Inspection =====

    fn get_content(&self, url: &str) -> StorageResult<Option<StoredContent>> {
        let content = self
            .conn
            .query_row(
                "SELECT url, status, content_type, content, digest, stored_at
                 FROM content WHERE url = ?1",
                params![url],
                |row| {
                    Ok(StoredContent {
                        url: row.get(0)?,
                        status: row.get(1)?,
                        content_type: row.get(2)?,
                        content: row.get(3)?,
                        digest: row.get(4)?,
                        stored_at: row.get(5)?,
                    })
                },
            )
            .optional()?;

        Ok(content)
    }

    fn links_from(&self, source: &str) -> StorageResult<Vec<LinkEdge>> {
        let mut stmt = self
            .conn
            .prepare("SELECT dest, status FROM link WHERE source = ?1 ORDER BY id")?;

        let links = stmt
            .query_map(params![source], |row| {
                Ok(LinkEdge {
                    dest: row.get(0)?,
                    status: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(links)
    }

    fn count_content(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM content", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn count_links(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM link", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}
