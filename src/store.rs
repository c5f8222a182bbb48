//! SQLite-backed storage for message records.
//!
//! The store is append-only: records are inserted in batches during
//! ingestion and only ever read afterwards. There is no per-row identity
//! and no updates; a full rebuild truncates and re-ingests.
//!
//! Writes assume a single writer (the ingest run); reads are unrestricted
//! and rely on SQLite's own WAL concurrency.
//!
//! # Example
//!
//! ```rust
//! use watilog::record::{DeliveryStatus, MessageRecord};
//! use watilog::store::MessageStore;
//!
//! let mut store = MessageStore::open_in_memory()?;
//! store.insert_batch(&[MessageRecord::new(
//!     "a.txt",
//!     "Dana",
//!     "hello",
//!     "2025-01-15 10:30:00",
//!     DeliveryStatus::Received,
//! )])?;
//! assert_eq!(store.message_count()?, 1);
//! # Ok::<(), watilog::WatilogError>(())
//! ```

use std::path::Path;

use rusqlite::{Connection, params};

use crate::error::Result;
use crate::record::{DeliveryStatus, MessageRecord};

/// Message store backed by a SQLite database.
pub struct MessageStore {
    pub(crate) conn: Connection,
}

impl MessageStore {
    /// Opens (or creates) a store at the given database path.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the file cannot be opened as a SQLite
    /// database or the schema cannot be created.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    /// Opens an in-memory store. Useful for tests and one-off analysis.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self> {
        // WAL keeps readers unblocked during batch writes.
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS messages (
                source_id  TEXT NOT NULL,
                sender     TEXT NOT NULL,
                body       TEXT NOT NULL,
                timestamp  TEXT NOT NULL,
                status     TEXT NOT NULL
            );",
        )?;

        Ok(Self { conn })
    }

    /// Inserts a batch of records inside one transaction.
    ///
    /// An empty batch is a no-op. Records are never deduplicated: inserting
    /// the same batch twice stores every row twice.
    pub fn insert_batch(&mut self, records: &[MessageRecord]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO messages (source_id, sender, body, timestamp, status)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for record in records {
                stmt.execute(params![
                    record.source_id,
                    record.sender,
                    record.body,
                    record.timestamp,
                    record.status,
                ])?;
            }
        }
        tx.commit()?;

        Ok(())
    }

    /// Deletes every stored message. Used before a full re-ingest.
    pub fn truncate(&self) -> Result<()> {
        self.conn.execute("DELETE FROM messages", [])?;
        Ok(())
    }

    /// Creates the secondary indexes.
    ///
    /// Called once after bulk load so the inserts themselves stay cheap.
    /// Safe to call repeatedly.
    pub fn build_indexes(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE INDEX IF NOT EXISTS idx_source_id ON messages(source_id);
             CREATE INDEX IF NOT EXISTS idx_timestamp ON messages(timestamp);
             CREATE INDEX IF NOT EXISTS idx_sender ON messages(sender);",
        )?;
        Ok(())
    }

    /// Returns the total number of stored records.
    pub fn message_count(&self) -> Result<u64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM messages", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Returns the number of stored records with the given status.
    pub fn count_by_status(&self, status: DeliveryStatus) -> Result<u64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM messages WHERE status = ?1",
            params![status],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}
