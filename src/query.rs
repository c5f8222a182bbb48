//! Conversation index queries over the message store.
//!
//! Everything here is a read-only projection of the `messages` table:
//! per-conversation activity summaries for the list view, full ordered
//! histories for the detail view, bulk histories for export, and the
//! distinct-sender list for filter dropdowns. Nothing is persisted;
//! summaries are recomputed on demand.
//!
//! # Example
//!
//! ```rust
//! use watilog::query::ListQuery;
//! use watilog::store::MessageStore;
//!
//! let store = MessageStore::open_in_memory()?;
//! let query = ListQuery::new().with_limit(20).with_search("invoice");
//! let summaries = store.list_conversations(&query)?;
//! assert!(summaries.is_empty());
//! # Ok::<(), watilog::WatilogError>(())
//! ```

use chrono::{Duration, NaiveDate, Utc};
use rusqlite::{Row, ToSql, params, params_from_iter};
use serde::Serialize;

use crate::error::{Result, WatilogError};
use crate::record::{DeliveryStatus, MessageRecord};
use crate::store::MessageStore;

/// Default page size for the list view.
pub const DEFAULT_LIMIT: u32 = 100;

/// Parameters for the conversation list query.
///
/// By default the query is unrestricted: all conversations, first page of
/// 100. A recency window (`days` or an explicit `since`/`until` range) is a
/// performance trade-off for large stores, not a correctness requirement,
/// and is never applied when a search term is present: searches always scan
/// the full history.
///
/// # Example
///
/// ```rust
/// use watilog::query::ListQuery;
///
/// let query = ListQuery::new()
///     .with_days(30)
///     .with_limit(50)
///     .with_offset(50);
/// ```
#[derive(Debug, Clone)]
pub struct ListQuery {
    /// Number of conversations to skip.
    pub offset: u32,
    /// Maximum number of conversations to return.
    pub limit: u32,
    /// Case-insensitive substring matched against `source_id` and `body`.
    pub search: Option<String>,
    /// Inclusive lower timestamp bound (`YYYY-MM-DD 00:00:00`).
    pub since: Option<String>,
    /// Inclusive upper timestamp bound (`YYYY-MM-DD 23:59:59`).
    pub until: Option<String>,
    /// Recency window in days, used only when no explicit range is set.
    pub days: Option<i64>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_LIMIT,
            search: None,
            since: None,
            until: None,
            days: None,
        }
    }
}

impl ListQuery {
    /// Creates a query with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of conversations to skip.
    #[must_use]
    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    /// Sets the maximum number of conversations to return.
    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Sets the case-insensitive search term.
    #[must_use]
    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Sets the recency window in days.
    #[must_use]
    pub fn with_days(mut self, days: i64) -> Self {
        self.days = Some(days);
        self
    }

    /// Sets the inclusive start date (`YYYY-MM-DD`, expanded to start of day).
    ///
    /// # Errors
    ///
    /// Returns [`WatilogError::InvalidDate`] if the date doesn't parse.
    pub fn with_since(mut self, date: &str) -> Result<Self> {
        let day = parse_date(date)?;
        self.since = Some(format!("{} 00:00:00", day.format("%Y-%m-%d")));
        Ok(self)
    }

    /// Sets the inclusive end date (`YYYY-MM-DD`, expanded to end of day).
    ///
    /// # Errors
    ///
    /// Returns [`WatilogError::InvalidDate`] if the date doesn't parse.
    pub fn with_until(mut self, date: &str) -> Result<Self> {
        let day = parse_date(date)?;
        self.until = Some(format!("{} 23:59:59", day.format("%Y-%m-%d")));
        Ok(self)
    }

    /// Resolves the effective timestamp bounds.
    ///
    /// An explicit range wins over the day window; the window counts back
    /// from now.
    fn bounds(&self) -> (Option<String>, Option<String>) {
        if self.since.is_some() || self.until.is_some() {
            (self.since.clone(), self.until.clone())
        } else if let Some(days) = self.days {
            (Some(window_start(days)), None)
        } else {
            (None, None)
        }
    }
}

fn parse_date(date: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| WatilogError::invalid_date(date))
}

/// Normalized timestamp of the moment `days` days ago.
fn window_start(days: i64) -> String {
    let span = Duration::try_days(days).unwrap_or_else(Duration::zero);
    (Utc::now() - span).format("%Y-%m-%d %H:%M:%S").to_string()
}

/// One conversation's most recent activity, derived from its records.
///
/// `preview`, `last_sender`, and `last_active` all come from the record
/// with the maximum timestamp in the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationSummary {
    /// Export file name keying the conversation.
    pub source_id: String,
    /// Number of stored records for this conversation.
    pub count: u64,
    /// Body of the most recent record.
    pub preview: String,
    /// Sender of the most recent record.
    pub last_sender: String,
    /// Timestamp of the most recent record.
    pub last_active: String,
}

impl ConversationSummary {
    /// Display label for the conversation, derived from its file name.
    #[must_use]
    pub fn contact(&self) -> &str {
        contact_label(&self.source_id)
    }

    /// Returns the preview flattened to one line and truncated to
    /// `max_chars` characters.
    #[must_use]
    pub fn preview_line(&self, max_chars: usize) -> String {
        let flat = self.preview.replace('\n', " ");
        if flat.chars().count() <= max_chars {
            flat
        } else {
            let truncated: String = flat.chars().take(max_chars).collect();
            format!("{truncated}…")
        }
    }
}

/// Derives a contact label from an export file name.
///
/// Export files are conventionally named `<phone>-<thread>.txt`; everything
/// before the first `-` is the phone number. Names without a `-` just lose
/// their `.txt` suffix.
///
/// # Example
///
/// ```rust
/// use watilog::query::contact_label;
///
/// assert_eq!(contact_label("77011234567-8.txt"), "77011234567");
/// assert_eq!(contact_label("alma.txt"), "alma");
/// ```
#[must_use]
pub fn contact_label(source_id: &str) -> &str {
    match source_id.split_once('-') {
        Some((prefix, _)) => prefix,
        None => source_id.strip_suffix(".txt").unwrap_or(source_id),
    }
}

fn map_record(row: &Row<'_>) -> rusqlite::Result<MessageRecord> {
    Ok(MessageRecord {
        source_id: row.get(0)?,
        sender: row.get(1)?,
        body: row.get(2)?,
        timestamp: row.get(3)?,
        status: row.get(4)?,
    })
}

fn map_sender(row: &Row<'_>) -> rusqlite::Result<String> {
    row.get(0)
}

impl MessageStore {
    /// Lists conversations ordered by most recent activity.
    ///
    /// Ordering is `last_active` descending with `source_id` ascending as
    /// the tie-break, so pagination is stable. When the query has a search
    /// term, the candidate records are those whose `source_id` or `body`
    /// contains it (case-insensitive); otherwise the optional recency
    /// window applies.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the backing database is unavailable or
    /// malformed. Callers presenting results should absorb the error into
    /// an empty list plus a message rather than crashing.
    pub fn list_conversations(&self, query: &ListQuery) -> Result<Vec<ConversationSummary>> {
        let mut sql = String::from(
            "SELECT source_id, COUNT(*), body, sender, MAX(timestamp) AS last_active \
             FROM messages",
        );
        let mut args: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(term) = &query.search {
            // instr() is a literal substring match, so search terms
            // containing % or _ need no escaping.
            sql.push_str(
                " WHERE (instr(lower(source_id), lower(?)) > 0 \
                 OR instr(lower(body), lower(?)) > 0)",
            );
            args.push(Box::new(term.clone()));
            args.push(Box::new(term.clone()));
        } else {
            let (since, until) = query.bounds();
            if let Some(since) = since {
                sql.push_str(" WHERE timestamp >= ?");
                args.push(Box::new(since));
                if let Some(until) = until {
                    sql.push_str(" AND timestamp <= ?");
                    args.push(Box::new(until));
                }
            } else if let Some(until) = until {
                sql.push_str(" WHERE timestamp <= ?");
                args.push(Box::new(until));
            }
        }

        sql.push_str(" GROUP BY source_id ORDER BY last_active DESC, source_id ASC LIMIT ? OFFSET ?");
        args.push(Box::new(i64::from(query.limit)));
        args.push(Box::new(i64::from(query.offset)));

        let refs: Vec<&dyn ToSql> = args.iter().map(|arg| arg.as_ref()).collect();
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(refs.as_slice(), |row| {
            Ok(ConversationSummary {
                source_id: row.get(0)?,
                count: row.get(1)?,
                preview: row.get(2)?,
                last_sender: row.get(3)?,
                last_active: row.get(4)?,
            })
        })?;

        let summaries = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(summaries)
    }

    /// Returns one conversation's records, ascending by timestamp.
    ///
    /// Equal timestamps keep insertion order. With `include_automated`
    /// false, only records from identified human senders are returned
    /// (template and system blocks are dropped).
    pub fn conversation_history(
        &self,
        source_id: &str,
        include_automated: bool,
    ) -> Result<Vec<MessageRecord>> {
        let mut stmt = if include_automated {
            self.conn.prepare(
                "SELECT source_id, sender, body, timestamp, status FROM messages \
                 WHERE source_id = ?1 \
                 ORDER BY timestamp ASC, rowid ASC",
            )?
        } else {
            self.conn.prepare(
                "SELECT source_id, sender, body, timestamp, status FROM messages \
                 WHERE source_id = ?1 AND status = ?2 \
                 ORDER BY timestamp ASC, rowid ASC",
            )?
        };

        let rows = if include_automated {
            stmt.query_map(params![source_id], map_record)?
        } else {
            stmt.query_map(params![source_id, DeliveryStatus::Received], map_record)?
        };

        let records = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }

    /// Returns the records of several conversations, ordered by
    /// `(source_id, timestamp)`. An empty `source_ids` slice means all
    /// conversations.
    pub fn bulk_history(&self, source_ids: &[String]) -> Result<Vec<MessageRecord>> {
        if source_ids.is_empty() {
            let mut stmt = self.conn.prepare(
                "SELECT source_id, sender, body, timestamp, status FROM messages \
                 ORDER BY source_id ASC, timestamp ASC, rowid ASC",
            )?;
            let rows = stmt.query_map([], map_record)?;
            let records = rows.collect::<rusqlite::Result<Vec<_>>>()?;
            return Ok(records);
        }

        let placeholders = vec!["?"; source_ids.len()].join(", ");
        let sql = format!(
            "SELECT source_id, sender, body, timestamp, status FROM messages \
             WHERE source_id IN ({placeholders}) \
             ORDER BY source_id ASC, timestamp ASC, rowid ASC"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(source_ids.iter()), map_record)?;
        let records = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }

    /// Returns the distinct sender labels, sorted alphabetically.
    ///
    /// With `received_only` true, template and system tags are excluded,
    /// which is what a staff filter dropdown wants.
    pub fn distinct_senders(&self, received_only: bool) -> Result<Vec<String>> {
        let mut stmt = if received_only {
            self.conn.prepare(
                "SELECT DISTINCT sender FROM messages WHERE status = ?1 ORDER BY sender ASC",
            )?
        } else {
            self.conn
                .prepare("SELECT DISTINCT sender FROM messages ORDER BY sender ASC")?
        };

        let rows = if received_only {
            stmt.query_map(params![DeliveryStatus::Received], map_sender)?
        } else {
            stmt.query_map([], map_sender)?
        };

        let senders = rows.collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(senders)
    }
}
