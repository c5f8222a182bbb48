//! # Watilog
//!
//! A Rust library for ingesting WATI / WhatsApp Business chat-log exports
//! into SQLite and querying conversation activity.
//!
//! ## Overview
//!
//! WATI exports one plain-text file per customer conversation. Each message
//! starts with a bracketed timestamp header and may continue over any number
//! of unmarked lines. Watilog turns those files into structured records:
//!
//! - **Parsing** reconstructs multi-line message blocks and classifies each
//!   one as an outbound template, a named human message, or a system event.
//! - **Storage** bulk-loads records into a single SQLite table tuned for
//!   write-heavy ingestion (WAL, batched transactions, deferred indexes).
//! - **Queries** aggregate per-conversation summaries ordered by recency,
//!   with paging, day windows, date ranges, and full-history search.
//!
//! ## Quick Start
//!
//! ```rust
//! use watilog::prelude::*;
//!
//! fn main() -> Result<()> {
//!     // Parse one export file's content
//!     let parser = WatiParser::new();
//!     let records = parser.parse_str(
//!         "77011234567-8.txt",
//!         "[06/15/2025 14:02:11] Aruzhan: Hello!\n[06/15/2025 14:02:40] Template \"welcome\" was sent.",
//!     );
//!
//!     // Load the records into an in-memory store
//!     let mut store = MessageStore::open_in_memory()?;
//!     store.insert_batch(&records)?;
//!
//!     // Query conversation activity
//!     let conversations = store.list_conversations(&ListQuery::new())?;
//!     assert_eq!(conversations[0].count, 2);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Ingesting a Directory
//!
//! Whole export directories go through [`ingest::Ingestor`], which isolates
//! unreadable files instead of aborting the run:
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use watilog::prelude::*;
//!
//! let mut store = MessageStore::open("watilog.db")?;
//! let report = Ingestor::new().run(Path::new("exports"), &mut store)?;
//! println!("{} messages ingested", report.messages_ingested);
//! # Ok::<(), watilog::WatilogError>(())
//! ```
//!
//! ## Module Structure
//!
//! - [`parser`] — WATI export parsing
//!   - [`WatiParser`](parser::WatiParser) — block reconstruction and classification
//! - [`record`] — Core record types
//!   - [`MessageRecord`], [`DeliveryStatus`]
//! - [`store`] — SQLite-backed storage
//!   - [`MessageStore`](store::MessageStore) — batched writes, counts
//! - [`query`] — Read-side queries
//!   - [`ListQuery`](query::ListQuery), [`ConversationSummary`](query::ConversationSummary)
//! - [`ingest`] — Directory ingestion
//!   - [`Ingestor`](ingest::Ingestor), [`IngestReport`](ingest::IngestReport)
//! - [`export`] — JSON Lines export
//! - [`config`] — Parser and ingest configuration
//! - [`cli`] — CLI argument types (behind the `cli` feature)
//! - [`error`] — Unified error types ([`WatilogError`], [`Result`])
//! - [`prelude`] — Convenient re-exports

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod ingest;
pub mod parser;
pub mod query;
pub mod record;
pub mod store;

// Re-export the main types at the crate root for convenience
pub use error::{Result, WatilogError};
pub use record::{DeliveryStatus, MessageRecord};

/// Convenient re-exports for common usage.
///
/// Import everything you need with a single line:
///
/// ```rust
/// use watilog::prelude::*;
/// ```
pub mod prelude {
    // Core record types
    pub use crate::record::{DeliveryStatus, MessageRecord};

    // Error types
    pub use crate::error::{Result, WatilogError};

    // Parsing
    pub use crate::parser::WatiParser;

    // Configuration
    pub use crate::config::{IngestConfig, ParserConfig};

    // Storage and queries
    pub use crate::query::{ConversationSummary, ListQuery, contact_label};
    pub use crate::store::MessageStore;

    // Directory ingestion
    pub use crate::ingest::{IngestReport, Ingestor};

    // JSON Lines export
    pub use crate::export::{export_conversations, write_jsonl};

    // CLI types
    #[cfg(feature = "cli")]
    pub use crate::cli::{Cli, Command};
}
