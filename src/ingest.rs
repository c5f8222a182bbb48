//! Batch ingestion of export directories into the message store.
//!
//! One ingest run scans a directory, parses every matching export file, and
//! writes records to the store in fixed-size batches. Failures are isolated
//! at file granularity: an unreadable or undecodable file is recorded in the
//! report and the run continues. The only fatal setup error is a missing
//! source directory.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use watilog::ingest::Ingestor;
//! use watilog::store::MessageStore;
//!
//! let mut store = MessageStore::open("watilog.db")?;
//! let report = Ingestor::new().run(Path::new("exports"), &mut store)?;
//! println!(
//!     "{} files, {} messages ({} human)",
//!     report.files_processed, report.messages_ingested, report.human_messages
//! );
//! # Ok::<(), watilog::WatilogError>(())
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{IngestConfig, ParserConfig};
use crate::error::{Result, WatilogError};
use crate::parser::WatiParser;
use crate::record::MessageRecord;
use crate::store::MessageStore;

/// Summary of one ingest run, surfaced to the operator at the end.
#[derive(Debug, Default, Clone)]
pub struct IngestReport {
    /// Files successfully parsed and ingested.
    pub files_processed: usize,
    /// Total records written to the store.
    pub messages_ingested: usize,
    /// Records from identified human senders (status `received`).
    pub human_messages: usize,
    /// Files that could not be read, with the reason. These were skipped;
    /// the rest of the run continued.
    pub skipped: Vec<(PathBuf, String)>,
}

impl IngestReport {
    /// Number of files skipped due to errors.
    #[must_use]
    pub fn files_skipped(&self) -> usize {
        self.skipped.len()
    }

    /// Returns `true` if every candidate file was ingested.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Scans a directory of export files and loads them into a store.
pub struct Ingestor {
    parser: WatiParser,
    config: IngestConfig,
}

impl Ingestor {
    /// Creates an ingestor with default parser and ingest settings.
    pub fn new() -> Self {
        Self::with_config(IngestConfig::default())
    }

    /// Creates an ingestor with custom ingest settings.
    pub fn with_config(config: IngestConfig) -> Self {
        Self {
            parser: WatiParser::new(),
            config,
        }
    }

    /// Creates an ingestor with custom parser and ingest settings.
    pub fn with_parser_config(parser: ParserConfig, config: IngestConfig) -> Self {
        Self {
            parser: WatiParser::with_config(parser),
            config,
        }
    }

    /// Returns the ingestor's settings.
    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Ingests every matching file under `dir` into `store`.
    ///
    /// Files are processed in name order so repeated runs over the same
    /// directory insert records in the same sequence. Records accumulate in
    /// memory and are flushed every [`IngestConfig::batch_size`] records;
    /// secondary indexes are built once after the final flush so the bulk
    /// inserts stay cheap.
    ///
    /// # Errors
    ///
    /// Returns [`WatilogError::SourceDirectory`] if `dir` is missing or not
    /// a directory, or a storage error if a batch write fails. Per-file
    /// read errors are not errors of the run; they are collected in
    /// [`IngestReport::skipped`].
    pub fn run(&self, dir: &Path, store: &mut MessageStore) -> Result<IngestReport> {
        if !dir.is_dir() {
            return Err(WatilogError::source_directory(dir));
        }

        if self.config.truncate {
            store.truncate()?;
        }

        let mut report = IngestReport::default();
        let mut batch: Vec<MessageRecord> = Vec::new();

        for path in self.export_files(dir)? {
            match self.parser.parse_path(&path) {
                Ok(records) => {
                    report.files_processed += 1;
                    report.messages_ingested += records.len();
                    report.human_messages += records.iter().filter(|r| r.is_human()).count();
                    batch.extend(records);
                }
                Err(e) => {
                    report.skipped.push((path, e.to_string()));
                    continue;
                }
            }

            if batch.len() >= self.config.batch_size {
                store.insert_batch(&batch)?;
                batch.clear();
            }
        }

        store.insert_batch(&batch)?;
        store.build_indexes()?;

        Ok(report)
    }

    /// Collects the candidate export files under `dir`, sorted by name.
    fn export_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let suffix = format!(".{}", self.config.extension);
        let mut paths = Vec::new();

        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name();
            if let Some(name) = name.to_str() {
                if name.ends_with(&suffix) && !self.is_excluded(name) {
                    paths.push(entry.path());
                }
            }
        }

        paths.sort();
        Ok(paths)
    }

    fn is_excluded(&self, name: &str) -> bool {
        self.config
            .excluded_substrings
            .iter()
            .any(|substring| name.contains(substring.as_str()))
    }
}

impl Default for Ingestor {
    fn default() -> Self {
        Self::new()
    }
}
