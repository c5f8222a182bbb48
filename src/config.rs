//! Configuration types for parsing and ingestion.
//!
//! This module provides clean configuration structs for library usage,
//! without any CLI framework dependencies.
//!
//! - [`ParserConfig`] - classification tags used when labeling message blocks
//! - [`IngestConfig`] - directory scanning and batch-write settings
//!
//! # Example
//!
//! ```rust
//! use watilog::config::{IngestConfig, ParserConfig};
//!
//! let parser = ParserConfig::new().with_system_tag("Service");
//! let ingest = IngestConfig::new()
//!     .with_batch_size(10_000)
//!     .with_truncate(true);
//! ```

use serde::{Deserialize, Serialize};

/// Configuration for message block classification.
///
/// The parser stores these tags as the `sender` of automated and
/// unclassified blocks. The on-disk format markers (the `Template "` prefix)
/// are fixed by the export format and are not configurable; only the labels
/// written into records are.
///
/// # Example
///
/// ```rust
/// use watilog::config::ParserConfig;
///
/// let config = ParserConfig::new()
///     .with_template_tag("Bot")
///     .with_system_tag("Service");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Sender label stored for automated template messages (default: "Template")
    pub template_tag: String,

    /// Sender label stored for unclassified blocks (default: "System")
    pub system_tag: String,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            template_tag: "Template".to_string(),
            system_tag: "System".to_string(),
        }
    }
}

impl ParserConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the sender label for template messages.
    #[must_use]
    pub fn with_template_tag(mut self, tag: impl Into<String>) -> Self {
        self.template_tag = tag.into();
        self
    }

    /// Sets the sender label for unclassified blocks.
    #[must_use]
    pub fn with_system_tag(mut self, tag: impl Into<String>) -> Self {
        self.system_tag = tag.into();
        self
    }
}

/// Configuration for directory ingestion.
///
/// Controls which files in the source directory are parsed and how records
/// are flushed to the store.
///
/// # Example
///
/// ```rust
/// use watilog::config::IngestConfig;
///
/// let config = IngestConfig::new()
///     .with_extension("log")
///     .with_excluded_substrings(vec!["backup".to_string()]);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// File extension to ingest, without the dot (default: "txt")
    pub extension: String,

    /// File names containing any of these substrings are skipped
    /// (default: `["requirements"]`, an artifact of export directories that
    /// also hold a dependency manifest)
    pub excluded_substrings: Vec<String>,

    /// Records buffered in memory before a batch write (default: 50 000)
    pub batch_size: usize,

    /// Delete all stored messages before ingesting (default: false)
    pub truncate: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            extension: "txt".to_string(),
            excluded_substrings: vec!["requirements".to_string()],
            batch_size: 50_000,
            truncate: false,
        }
    }
}

impl IngestConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the file extension to ingest (without the dot).
    #[must_use]
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Replaces the list of file-name substrings to exclude.
    #[must_use]
    pub fn with_excluded_substrings(mut self, substrings: Vec<String>) -> Self {
        self.excluded_substrings = substrings;
        self
    }

    /// Sets the batch-write threshold.
    #[must_use]
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    /// Sets whether the store is truncated before ingesting.
    #[must_use]
    pub fn with_truncate(mut self, truncate: bool) -> Self {
        self.truncate = truncate;
        self
    }
}
