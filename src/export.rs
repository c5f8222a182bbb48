//! JSONL export of stored conversations.
//!
//! Output is JSON Lines: one JSON object per record per line, in
//! `(source_id, timestamp)` order. JSONL streams well into `jq`, spreadsheet
//! importers, and RAG ingestion pipelines, and multi-line bodies stay on one
//! line because JSON escapes the newlines.
//!
//! # Example
//!
//! ```rust
//! use watilog::export::write_jsonl;
//! use watilog::record::{DeliveryStatus, MessageRecord};
//!
//! let records = vec![MessageRecord::new(
//!     "a.txt",
//!     "Dana",
//!     "line one\nline two",
//!     "2025-01-15 10:30:00",
//!     DeliveryStatus::Received,
//! )];
//!
//! let mut out = Vec::new();
//! write_jsonl(&records, &mut out)?;
//! assert_eq!(String::from_utf8_lossy(&out).lines().count(), 1);
//! # Ok::<(), watilog::WatilogError>(())
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::record::MessageRecord;
use crate::store::MessageStore;

/// Writes records to `writer` as JSON Lines.
///
/// # Errors
///
/// Returns an error if a record fails to serialize or the writer fails.
pub fn write_jsonl<W: Write>(records: &[MessageRecord], writer: W) -> Result<()> {
    let mut writer = BufWriter::new(writer);
    for record in records {
        let line = serde_json::to_string(record)?;
        writeln!(writer, "{line}")?;
    }
    writer.flush()?;
    Ok(())
}

/// Exports the selected conversations to a JSONL file.
///
/// An empty `source_ids` slice exports every conversation. Returns the
/// number of records written.
///
/// # Errors
///
/// Returns an error if the store query fails or the output file cannot be
/// written.
pub fn export_conversations(
    store: &MessageStore,
    source_ids: &[String],
    output: &Path,
) -> Result<usize> {
    let records = store.bulk_history(source_ids)?;
    let file = File::create(output)?;
    write_jsonl(&records, file)?;
    Ok(records.len())
}
