//! Core message record types shared by the parser, store, and query layers.
//!
//! A [`MessageRecord`] is the unit of persisted data: one classified message
//! block from one export file. Records are immutable once stored; the query
//! layer only ever reads them back.
//!
//! # Example
//!
//! ```rust
//! use watilog::record::{DeliveryStatus, MessageRecord};
//!
//! let record = MessageRecord::new(
//!     "77011234567-42.txt",
//!     "Aigerim",
//!     "Hello, I need the invoice",
//!     "2025-01-15 10:30:00",
//!     DeliveryStatus::Received,
//! );
//!
//! assert!(record.is_human());
//! let json = serde_json::to_string(&record)?;
//! assert!(json.contains("\"status\":\"received\""));
//! # Ok::<(), serde_json::Error>(())
//! ```

use std::fmt;
use std::str::FromStr;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

/// Coarse classification of a message block, computed once at parse time.
///
/// The classification is stored in the `status` column and never re-derived
/// from sender text at display time, so ingestion and presentation can't
/// drift apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    /// An automated template message pushed by the business.
    Sent,
    /// A message from an identified human sender.
    Received,
    /// An unclassified block (no template prefix, no name separator).
    System,
}

impl DeliveryStatus {
    /// Returns the lowercase wire/storage name of this status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sent => "sent",
            Self::Received => "received",
            Self::System => "system",
        }
    }

    /// Returns all valid status names (useful for error messages).
    #[must_use]
    pub fn all_names() -> Vec<&'static str> {
        vec!["sent", "received", "system"]
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DeliveryStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sent" => Ok(Self::Sent),
            "received" => Ok(Self::Received),
            "system" => Ok(Self::System),
            _ => Err(format!(
                "Unknown status: '{}'. Valid statuses: {}",
                s,
                Self::all_names().join(", ")
            )),
        }
    }
}

// Stored as its lowercase name in the `status` TEXT column.
impl ToSql for DeliveryStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for DeliveryStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e: String| FromSqlError::Other(e.into()))
    }
}

/// One classified message block from one export file.
///
/// # Fields
///
/// | Field       | Description                                              |
/// |-------------|----------------------------------------------------------|
/// | `source_id` | Name of the originating export file (conversation key)   |
/// | `sender`    | Template tag, human display name, or system tag          |
/// | `body`      | Message text, possibly multi-line                        |
/// | `timestamp` | `YYYY-MM-DD HH:MM:SS` when parseable, else raw verbatim  |
/// | `status`    | [`DeliveryStatus`] computed at parse time                |
///
/// Timestamps are kept as text: normalized values compare correctly as
/// strings, and unparseable raw values are preserved instead of invented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    /// Identifier of the originating export file.
    pub source_id: String,
    /// Classified sender label.
    pub sender: String,
    /// Message text.
    pub body: String,
    /// Normalized or raw timestamp.
    pub timestamp: String,
    /// Delivery/classification tag.
    pub status: DeliveryStatus,
}

impl MessageRecord {
    /// Creates a new message record.
    pub fn new(
        source_id: impl Into<String>,
        sender: impl Into<String>,
        body: impl Into<String>,
        timestamp: impl Into<String>,
        status: DeliveryStatus,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            sender: sender.into(),
            body: body.into(),
            timestamp: timestamp.into(),
            status,
        }
    }

    // ========================================================================
    // Utility methods
    // ========================================================================

    /// Returns `true` if this record came from an identified human sender.
    #[must_use]
    pub fn is_human(&self) -> bool {
        self.status == DeliveryStatus::Received
    }

    /// Returns `true` if this record is an automated template message.
    #[must_use]
    pub fn is_template(&self) -> bool {
        self.status == DeliveryStatus::Sent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_sets_all_fields() {
        let record = MessageRecord::new(
            "a.txt",
            "Bot",
            "hi",
            "2025-01-01 00:00:00",
            DeliveryStatus::System,
        );
        assert_eq!(record.source_id, "a.txt");
        assert_eq!(record.sender, "Bot");
        assert_eq!(record.body, "hi");
        assert_eq!(record.timestamp, "2025-01-01 00:00:00");
        assert_eq!(record.status, DeliveryStatus::System);
    }

    #[test]
    fn is_human_only_for_received() {
        let mut record =
            MessageRecord::new("a.txt", "Dana", "hello", "x", DeliveryStatus::Received);
        assert!(record.is_human());
        assert!(!record.is_template());

        record.status = DeliveryStatus::Sent;
        assert!(!record.is_human());
        assert!(record.is_template());

        record.status = DeliveryStatus::System;
        assert!(!record.is_human());
        assert!(!record.is_template());
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&DeliveryStatus::Received).unwrap();
        assert_eq!(json, "\"received\"");
        let json = serde_json::to_string(&DeliveryStatus::Sent).unwrap();
        assert_eq!(json, "\"sent\"");
    }

    #[test]
    fn status_deserializes_from_lowercase() {
        let status: DeliveryStatus = serde_json::from_str("\"system\"").unwrap();
        assert_eq!(status, DeliveryStatus::System);
    }

    #[test]
    fn status_display_matches_as_str() {
        for status in [
            DeliveryStatus::Sent,
            DeliveryStatus::Received,
            DeliveryStatus::System,
        ] {
            assert_eq!(status.to_string(), status.as_str());
        }
    }

    #[test]
    fn status_from_str_is_case_insensitive() {
        assert_eq!(
            "RECEIVED".parse::<DeliveryStatus>().unwrap(),
            DeliveryStatus::Received
        );
        assert_eq!(
            "Sent".parse::<DeliveryStatus>().unwrap(),
            DeliveryStatus::Sent
        );
    }

    #[test]
    fn status_from_str_rejects_unknown_with_valid_list() {
        let err = "delivered".parse::<DeliveryStatus>().unwrap_err();
        assert!(err.contains("delivered"));
        assert!(err.contains("sent"));
        assert!(err.contains("received"));
        assert!(err.contains("system"));
    }

    #[test]
    fn status_round_trips_through_sqlite() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (status TEXT NOT NULL)")
            .unwrap();
        conn.execute(
            "INSERT INTO t (status) VALUES (?1)",
            rusqlite::params![DeliveryStatus::Received],
        )
        .unwrap();
        let status: DeliveryStatus = conn
            .query_row("SELECT status FROM t", [], |row| row.get(0))
            .unwrap();
        assert_eq!(status, DeliveryStatus::Received);
    }

    #[test]
    fn record_serde_round_trip() {
        let record = MessageRecord::new(
            "87071112233-9.txt",
            "Template",
            "Your order {{1}} is ready",
            "2025-03-02 09:15:00",
            DeliveryStatus::Sent,
        );
        let json = serde_json::to_string(&record).unwrap();
        let back: MessageRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
