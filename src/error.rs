//! Unified error types for watilog.
//!
//! This module provides a single [`WatilogError`] enum that covers all error
//! cases in the library: file I/O during ingestion, SQLite storage faults,
//! JSON serialization during export, and user-supplied filter values.
//!
//! # Error Handling Philosophy
//!
//! - **Library users** get typed errors they can match on
//! - **Application users** get clear, actionable error messages
//! - **Developers** get source error chains for debugging

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// A specialized [`Result`] type for watilog operations.
///
/// This type is broadly used across the library for any operation that
/// may produce an error.
///
/// # Example
///
/// ```rust
/// use watilog::error::Result;
///
/// fn read_export(path: &str) -> Result<String> {
///     // io::Error converts automatically via `?`
///     let content = std::fs::read_to_string(path)?;
///     Ok(content)
/// }
/// ```
pub type Result<T> = std::result::Result<T, WatilogError>;

/// The error type for all watilog operations.
///
/// This enum represents all possible errors that can occur when using watilog.
/// Variants map onto the layers of the ingest-and-query pipeline, so callers
/// can match on the layer that failed without inspecting error strings.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WatilogError {
    /// An I/O error occurred.
    ///
    /// This typically happens when:
    /// - An export file doesn't exist or can't be opened
    /// - An export file is not valid UTF-8
    /// - The JSONL output file can't be created
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The SQLite message store reported an error.
    ///
    /// This typically happens when:
    /// - The database file is corrupt or not a SQLite database
    /// - The database lives on a read-only filesystem
    /// - A query runs against a store that was never initialized
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// A record failed to serialize during JSONL export.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A user-supplied date filter could not be parsed.
    ///
    /// This typically happens when:
    /// - A `--since`/`--until` value is not `YYYY-MM-DD`
    /// - The value looks like a date but isn't one (e.g. `2025-02-30`)
    #[error("Invalid date '{input}'. Expected format: {expected}")]
    InvalidDate {
        /// The date string that failed to parse.
        input: String,
        /// Description of the expected format.
        expected: &'static str,
    },

    /// The ingestion source path does not exist or is not a directory.
    ///
    /// This is the one fatal setup error of an ingest run. Per-file problems
    /// are recorded and skipped, but without a readable source directory
    /// there is nothing to iterate.
    #[error("Source directory not found: {}", path.display())]
    SourceDirectory {
        /// The path that was supposed to hold the export files.
        path: PathBuf,
    },
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl WatilogError {
    /// Creates an [`InvalidDate`](Self::InvalidDate) error for a filter value
    /// that did not parse as `YYYY-MM-DD`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use watilog::error::WatilogError;
    ///
    /// let err = WatilogError::invalid_date("15/01/2025");
    /// assert!(err.to_string().contains("YYYY-MM-DD"));
    /// ```
    pub fn invalid_date(input: impl Into<String>) -> Self {
        Self::InvalidDate {
            input: input.into(),
            expected: "YYYY-MM-DD",
        }
    }

    /// Creates a [`SourceDirectory`](Self::SourceDirectory) error for a path
    /// that is missing or not a directory.
    pub fn source_directory(path: impl AsRef<Path>) -> Self {
        Self::SourceDirectory {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Returns `true` if this is an I/O error.
    #[must_use]
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io(_))
    }

    /// Returns `true` if this is a storage (SQLite) error.
    #[must_use]
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_))
    }

    /// Returns `true` if this is an invalid date filter error.
    #[must_use]
    pub fn is_invalid_date(&self) -> bool {
        matches!(self, Self::InvalidDate { .. })
    }

    /// Returns `true` if this is a missing source directory error.
    #[must_use]
    pub fn is_source_directory(&self) -> bool {
        matches!(self, Self::SourceDirectory { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as StdError;

    // ========================================================================
    // Display tests
    // ========================================================================

    #[test]
    fn io_error_display() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file missing");
        let err = WatilogError::from(io_err);
        let msg = err.to_string();
        assert!(msg.starts_with("IO error:"));
        assert!(msg.contains("file missing"));
    }

    #[test]
    fn storage_error_display() {
        let err = WatilogError::from(rusqlite::Error::QueryReturnedNoRows);
        assert!(err.to_string().starts_with("Storage error:"));
    }

    #[test]
    fn json_error_display() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json")
            .expect_err("input is not valid JSON");
        let err = WatilogError::from(json_err);
        assert!(err.to_string().starts_with("JSON error:"));
    }

    #[test]
    fn invalid_date_display_mentions_input_and_format() {
        let err = WatilogError::invalid_date("2025-13-99");
        let msg = err.to_string();
        assert!(msg.contains("2025-13-99"));
        assert!(msg.contains("YYYY-MM-DD"));
    }

    #[test]
    fn source_directory_display_mentions_path() {
        let err = WatilogError::source_directory("/no/such/dir");
        let msg = err.to_string();
        assert!(msg.contains("Source directory not found"));
        assert!(msg.contains("/no/such/dir"));
    }

    // ========================================================================
    // Source chain tests
    // ========================================================================

    #[test]
    fn io_error_preserves_source() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let err = WatilogError::from(io_err);
        let source = err.source().expect("Io variant must carry a source");
        assert!(source.to_string().contains("denied"));
    }

    #[test]
    fn storage_error_preserves_source() {
        let err = WatilogError::from(rusqlite::Error::QueryReturnedNoRows);
        assert!(err.source().is_some());
    }

    #[test]
    fn invalid_date_has_no_source() {
        let err = WatilogError::invalid_date("garbage");
        assert!(err.source().is_none());
    }

    // ========================================================================
    // Constructor tests
    // ========================================================================

    #[test]
    fn invalid_date_constructor_sets_expected_format() {
        let err = WatilogError::invalid_date("01.02.2025");
        match err {
            WatilogError::InvalidDate { input, expected } => {
                assert_eq!(input, "01.02.2025");
                assert_eq!(expected, "YYYY-MM-DD");
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn source_directory_constructor_accepts_path_types() {
        let from_str = WatilogError::source_directory("exports");
        let from_path = WatilogError::source_directory(Path::new("exports"));
        assert_eq!(from_str.to_string(), from_path.to_string());
    }

    // ========================================================================
    // Predicate tests
    // ========================================================================

    #[test]
    fn is_io_matches_only_io() {
        let err = WatilogError::from(io::Error::other("boom"));
        assert!(err.is_io());
        assert!(!err.is_storage());
        assert!(!err.is_invalid_date());
        assert!(!err.is_source_directory());
    }

    #[test]
    fn is_storage_matches_only_storage() {
        let err = WatilogError::from(rusqlite::Error::QueryReturnedNoRows);
        assert!(err.is_storage());
        assert!(!err.is_io());
    }

    #[test]
    fn is_invalid_date_matches_only_invalid_date() {
        let err = WatilogError::invalid_date("x");
        assert!(err.is_invalid_date());
        assert!(!err.is_source_directory());
    }

    #[test]
    fn is_source_directory_matches_only_source_directory() {
        let err = WatilogError::source_directory("/tmp/nope");
        assert!(err.is_source_directory());
        assert!(!err.is_invalid_date());
    }

    // ========================================================================
    // From conversion tests
    // ========================================================================

    #[test]
    fn question_mark_converts_io_errors() {
        fn read_missing() -> Result<String> {
            let content = std::fs::read_to_string("/definitely/not/a/real/path.txt")?;
            Ok(content)
        }
        let err = read_missing().expect_err("path must not exist");
        assert!(err.is_io());
    }

    #[test]
    fn question_mark_converts_storage_errors() {
        fn bad_query() -> Result<i64> {
            let conn = rusqlite::Connection::open_in_memory()?;
            let n = conn.query_row("SELECT value FROM no_such_table", [], |row| row.get(0))?;
            Ok(n)
        }
        let err = bad_query().expect_err("table must not exist");
        assert!(err.is_storage());
    }

    #[test]
    fn question_mark_converts_json_errors() {
        fn parse_bad() -> Result<serde_json::Value> {
            let value = serde_json::from_str("][")?;
            Ok(value)
        }
        let err = parse_bad().expect_err("input is not JSON");
        assert!(matches!(err, WatilogError::Json(_)));
    }

    // ========================================================================
    // Misc tests
    // ========================================================================

    #[test]
    fn debug_format_names_the_variant() {
        let err = WatilogError::invalid_date("zzz");
        let debug = format!("{err:?}");
        assert!(debug.contains("InvalidDate"));
    }

    #[test]
    fn result_alias_works_with_ok_and_err() {
        fn half(n: i64) -> Result<i64> {
            if n % 2 == 0 {
                Ok(n / 2)
            } else {
                Err(WatilogError::invalid_date(n.to_string()))
            }
        }
        assert_eq!(half(4).unwrap(), 2);
        assert!(half(3).is_err());
    }
}
