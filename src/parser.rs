//! Parser for WATI / WhatsApp Business chat-log exports.
//!
//! Export files are plain text, one conversation per file. Each message
//! starts with a bracketed timestamp header line; bodies may continue over
//! any number of following lines:
//!
//! ```text
//! [01/15/2025 10:30:00] Aigerim: Hello, I need the invoice
//! [01/15/2025 10:31:12] Template "Thanks for reaching out!
//!
//! Our team will reply shortly." was sent.
//! [01/15/2025 10:35:40] Missed voice call
//! ```
//!
//! The parser reconstructs multi-line blocks, classifies each block as
//! template / human / system, and normalizes timestamps to
//! `YYYY-MM-DD HH:MM:SS` (keeping the raw text when a timestamp doesn't
//! parse). Parsing never fails on content: malformed lines degrade to
//! continuation text or system blocks instead of aborting the file.
//!
//! # Example
//!
//! ```rust
//! use watilog::parser::WatiParser;
//!
//! let parser = WatiParser::new();
//! let records = parser.parse_str(
//!     "77011234567-8.txt",
//!     "[01/15/2025 10:30:00] Aigerim: Hello\n\
//!      [01/15/2025 10:31:12] Template \"Thanks for reaching out\" was sent.",
//! );
//!
//! assert_eq!(records.len(), 2);
//! assert!(records[0].is_human());
//! assert!(records[1].is_template());
//! assert_eq!(records[0].timestamp, "2025-01-15 10:30:00");
//! ```

use std::fs;
use std::path::Path;

use chrono::NaiveDateTime;
use regex::Regex;

use crate::config::ParserConfig;
use crate::error::Result;
use crate::record::{DeliveryStatus, MessageRecord};

/// Matches a message header line: `[MM/DD/YYYY HH:MM:SS] trailing text`.
/// At least one whitespace character must follow the closing bracket.
const HEADER_PATTERN: &str = r"^\[(\d{2}/\d{2}/\d{4}\s+\d{2}:\d{2}:\d{2})\]\s+(.*)";

/// Extracts the quoted body of a `Template "..." was sent.` block.
/// Non-greedy and newline-spanning, since template bodies are often
/// multi-paragraph.
const TEMPLATE_PATTERN: &str = r#"(?s)^Template\s+"(.*?)"(?:\s+was sent\.|$)"#;

/// Literal prefix that marks a block as an automated template message.
const TEMPLATE_PREFIX: &str = "Template \"";

/// Timestamp format used inside header brackets.
const TIMESTAMP_INPUT: &str = "%m/%d/%Y %H:%M:%S";

/// Normalized timestamp format stored in records.
const TIMESTAMP_OUTPUT: &str = "%Y-%m-%d %H:%M:%S";

/// A message block under construction while scanning lines.
///
/// Collects the raw header timestamp and every line of the body until the
/// next header line (or end of input) finalizes it.
#[derive(Debug, Default)]
struct PendingBlock {
    timestamp_raw: String,
    lines: Vec<String>,
}

impl PendingBlock {
    /// Starts a block from a matched header line.
    fn start(timestamp_raw: &str, trailing: &str) -> Self {
        Self {
            timestamp_raw: timestamp_raw.to_string(),
            lines: vec![trailing.trim().to_string()],
        }
    }

    /// Appends a continuation line (trimmed, empties kept to preserve
    /// paragraph breaks).
    fn append(&mut self, line: &str) {
        self.lines.push(line.trim().to_string());
    }

    /// Joins the collected lines into the block's full text.
    fn full_text(&self) -> String {
        self.lines.join("\n").trim().to_string()
    }
}

/// Parser for WATI chat-log export files.
///
/// The parser is stateless between calls; one instance can parse any number
/// of files. Classification tags come from [`ParserConfig`].
///
/// # Example
///
/// ```rust
/// use watilog::config::ParserConfig;
/// use watilog::parser::WatiParser;
///
/// let parser = WatiParser::with_config(ParserConfig::new().with_system_tag("Service"));
/// let records = parser.parse_str("a.txt", "[01/02/2025 08:00:00] Missed voice call");
/// assert_eq!(records[0].sender, "Service");
/// ```
#[derive(Debug)]
pub struct WatiParser {
    config: ParserConfig,
    header: Regex,
    template: Regex,
}

impl WatiParser {
    /// Creates a parser with default classification tags.
    pub fn new() -> Self {
        Self::with_config(ParserConfig::default())
    }

    /// Creates a parser with custom classification tags.
    pub fn with_config(config: ParserConfig) -> Self {
        Self {
            config,
            // Both patterns are static and known valid
            header: Regex::new(HEADER_PATTERN).unwrap(),
            template: Regex::new(TEMPLATE_PATTERN).unwrap(),
        }
    }

    /// Returns the parser's configuration.
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parses raw export content into ordered message records.
    ///
    /// `source_id` identifies the originating file and is copied into every
    /// record. Records come back in file order. Content parsing is
    /// infallible: lines that match nothing are dropped (before the first
    /// header) or treated as body continuations.
    ///
    /// # Example
    ///
    /// ```rust
    /// use watilog::parser::WatiParser;
    ///
    /// let records = WatiParser::new().parse_str(
    ///     "chat.txt",
    ///     "[03/02/2025 09:15:00] Dana: first line\nsecond line",
    /// );
    /// assert_eq!(records[0].body, "first line\nsecond line");
    /// ```
    #[must_use]
    pub fn parse_str(&self, source_id: &str, content: &str) -> Vec<MessageRecord> {
        let mut records = Vec::new();
        let mut pending: Option<PendingBlock> = None;

        for line in content.lines() {
            if let Some(caps) = self.header.captures(line) {
                if let Some(block) = pending.take() {
                    records.push(self.finalize(source_id, &block));
                }
                let timestamp_raw = caps.get(1).map_or("", |m| m.as_str());
                let trailing = caps.get(2).map_or("", |m| m.as_str());
                pending = Some(PendingBlock::start(timestamp_raw, trailing));
            } else if let Some(block) = pending.as_mut() {
                block.append(line);
            }
            // Lines before the first header belong to no message and are dropped.
        }

        // The trailing block has no following header to close it.
        if let Some(block) = pending.take() {
            records.push(self.finalize(source_id, &block));
        }

        records
    }

    /// Parses one export file, deriving `source_id` from its file name.
    ///
    /// # Errors
    ///
    /// Returns [`WatilogError::Io`](crate::WatilogError::Io) if the file
    /// cannot be read or is not valid UTF-8.
    pub fn parse_path(&self, path: &Path) -> Result<Vec<MessageRecord>> {
        let source_id = path.file_name().map_or_else(
            || path.display().to_string(),
            |name| name.to_string_lossy().into_owned(),
        );
        let content = fs::read_to_string(path)?;
        Ok(self.parse_str(&source_id, &content))
    }

    /// Turns a completed block into a classified record.
    fn finalize(&self, source_id: &str, block: &PendingBlock) -> MessageRecord {
        let full_text = block.full_text();
        let (sender, body, status) = self.classify(&full_text);
        MessageRecord::new(
            source_id,
            sender,
            body,
            normalize_timestamp(&block.timestamp_raw),
            status,
        )
    }

    /// Classifies a block's full text into (sender, body, status).
    ///
    /// Precedence: template prefix, then first `": "` name split, then
    /// system fallback. The first-occurrence split is a documented heuristic
    /// and mis-splits bodies that begin with `word: ` on purpose, for
    /// compatibility with the export format's own ambiguity.
    fn classify(&self, full_text: &str) -> (String, String, DeliveryStatus) {
        if full_text.starts_with(TEMPLATE_PREFIX) {
            // Missing or malformed closing quote keeps the whole block as body.
            let body = self
                .template
                .captures(full_text)
                .and_then(|caps| caps.get(1))
                .map_or_else(|| full_text.to_string(), |m| m.as_str().to_string());
            return (self.config.template_tag.clone(), body, DeliveryStatus::Sent);
        }

        if let Some((prefix, rest)) = full_text.split_once(": ") {
            let sender = prefix.trim();
            // An empty name is not a sender; fall through to the system case.
            if !sender.is_empty() {
                return (
                    sender.to_string(),
                    rest.trim().to_string(),
                    DeliveryStatus::Received,
                );
            }
        }

        (
            self.config.system_tag.clone(),
            full_text.to_string(),
            DeliveryStatus::System,
        )
    }
}

impl Default for WatiParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Reformats `MM/DD/YYYY HH:MM:SS` to `YYYY-MM-DD HH:MM:SS`.
///
/// Invalid timestamps are returned unchanged; normalization failure is not
/// an ingestion failure.
fn normalize_timestamp(raw: &str) -> String {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_INPUT).map_or_else(
        |_| raw.to_string(),
        |dt| dt.format(TIMESTAMP_OUTPUT).to_string(),
    )
}
