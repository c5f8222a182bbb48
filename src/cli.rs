//! Command-line interface definition using clap.
//!
//! This module defines:
//! - [`Cli`] - top-level argument structure (for use with clap)
//! - [`Command`] - one subcommand per operation: ingest, list, show,
//!   export, senders
//!
//! The argument structs are plain data; all execution lives in the binary.

use clap::{Args, Parser, Subcommand};

/// Ingest WATI / WhatsApp Business chat-log exports into SQLite
/// and browse conversation activity.
#[derive(Parser, Debug, Clone)]
#[command(name = "watilog")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    watilog ingest ./exports
    watilog ingest ./exports --truncate --db wati.db
    watilog list
    watilog list --search 77011234567 --limit 20
    watilog list --since 2025-01-01 --until 2025-01-31
    watilog show 77011234567-8.txt
    watilog show 77011234567-8.txt --include-automated
    watilog export -o chats.jsonl
    watilog export 77011234567-8.txt alma.txt -o two_chats.jsonl
    watilog senders")]
pub struct Cli {
    /// Path to the SQLite database file
    #[arg(long, global = true, default_value = "watilog.db", value_name = "PATH")]
    pub db: String,

    #[command(subcommand)]
    pub command: Command,
}

/// One subcommand per operation.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Ingest a directory of export files into the store
    Ingest(IngestArgs),
    /// List conversations by most recent activity
    List(ListArgs),
    /// Show one conversation's message history
    Show(ShowArgs),
    /// Export conversations as JSON Lines
    Export(ExportArgs),
    /// List distinct sender names
    Senders(SendersArgs),
}

/// Arguments for `watilog ingest`.
#[derive(Args, Debug, Clone)]
pub struct IngestArgs {
    /// Directory containing the export files
    #[arg(value_name = "DIR")]
    pub dir: String,

    /// File extension to ingest (without the dot)
    #[arg(long, default_value = "txt", value_name = "EXT")]
    pub extension: String,

    /// Skip files whose name contains this substring (repeatable)
    #[arg(long = "exclude", value_name = "SUBSTRING", default_values_t = vec!["requirements".to_string()])]
    pub excluded: Vec<String>,

    /// Records buffered in memory before each batch write
    #[arg(long, default_value_t = 50_000, value_name = "N")]
    pub batch_size: usize,

    /// Delete all stored messages before ingesting.
    /// Re-running without this flag stores duplicate records
    #[arg(long)]
    pub truncate: bool,
}

/// Arguments for `watilog list`.
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Maximum number of conversations to show
    #[arg(short, long, default_value_t = 100, value_name = "N")]
    pub limit: u32,

    /// Number of conversations to skip (for paging)
    #[arg(long, default_value_t = 0, value_name = "N")]
    pub offset: u32,

    /// Case-insensitive search over conversation names and message text.
    /// Searching always scans the full history, ignoring the day window
    #[arg(short, long, value_name = "TERM")]
    pub search: Option<String>,

    /// Only show conversations active in the last N days
    #[arg(long, default_value_t = 30, value_name = "N", conflicts_with = "all")]
    pub days: i64,

    /// Show all conversations regardless of age
    #[arg(long)]
    pub all: bool,

    /// Only count activity from this date (YYYY-MM-DD, inclusive)
    #[arg(long, value_name = "DATE")]
    pub since: Option<String>,

    /// Only count activity up to this date (YYYY-MM-DD, inclusive)
    #[arg(long, value_name = "DATE")]
    pub until: Option<String>,
}

/// Arguments for `watilog show`.
#[derive(Args, Debug, Clone)]
pub struct ShowArgs {
    /// Conversation to show (the export file name, e.g. 77011234567-8.txt)
    #[arg(value_name = "SOURCE_ID")]
    pub source_id: String,

    /// Also show template and system messages, not just human ones
    #[arg(long)]
    pub include_automated: bool,
}

/// Arguments for `watilog export`.
#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    /// Conversations to export (empty = all)
    #[arg(value_name = "SOURCE_ID")]
    pub source_ids: Vec<String>,

    /// Output file path, or - for stdout
    #[arg(short, long, default_value = "watilog_export.jsonl", value_name = "PATH")]
    pub output: String,
}

/// Arguments for `watilog senders`.
#[derive(Args, Debug, Clone)]
pub struct SendersArgs {
    /// Include template and system tags, not just human senders
    #[arg(long)]
    pub all: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_ingest_with_defaults() {
        let cli = Cli::try_parse_from(["watilog", "ingest", "./exports"]).unwrap();
        assert_eq!(cli.db, "watilog.db");
        match cli.command {
            Command::Ingest(args) => {
                assert_eq!(args.dir, "./exports");
                assert_eq!(args.extension, "txt");
                assert_eq!(args.excluded, vec!["requirements".to_string()]);
                assert_eq!(args.batch_size, 50_000);
                assert!(!args.truncate);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_global_db_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["watilog", "list", "--db", "custom.db"]).unwrap();
        assert_eq!(cli.db, "custom.db");
    }

    #[test]
    fn parses_list_defaults() {
        let cli = Cli::try_parse_from(["watilog", "list"]).unwrap();
        match cli.command {
            Command::List(args) => {
                assert_eq!(args.limit, 100);
                assert_eq!(args.offset, 0);
                assert_eq!(args.days, 30);
                assert!(!args.all);
                assert!(args.search.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn list_days_conflicts_with_all() {
        let result = Cli::try_parse_from(["watilog", "list", "--days", "7", "--all"]);
        assert!(result.is_err());
    }

    #[test]
    fn parses_list_filters() {
        let cli = Cli::try_parse_from([
            "watilog", "list", "--search", "invoice", "--since", "2025-01-01", "--until",
            "2025-01-31", "--limit", "20", "--offset", "40",
        ])
        .unwrap();
        match cli.command {
            Command::List(args) => {
                assert_eq!(args.search.as_deref(), Some("invoice"));
                assert_eq!(args.since.as_deref(), Some("2025-01-01"));
                assert_eq!(args.until.as_deref(), Some("2025-01-31"));
                assert_eq!(args.limit, 20);
                assert_eq!(args.offset, 40);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_show_with_automated_flag() {
        let cli =
            Cli::try_parse_from(["watilog", "show", "alma.txt", "--include-automated"]).unwrap();
        match cli.command {
            Command::Show(args) => {
                assert_eq!(args.source_id, "alma.txt");
                assert!(args.include_automated);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn show_requires_a_source_id() {
        assert!(Cli::try_parse_from(["watilog", "show"]).is_err());
    }

    #[test]
    fn parses_export_with_multiple_sources() {
        let cli = Cli::try_parse_from([
            "watilog", "export", "a.txt", "b.txt", "-o", "out.jsonl",
        ])
        .unwrap();
        match cli.command {
            Command::Export(args) => {
                assert_eq!(args.source_ids, vec!["a.txt".to_string(), "b.txt".to_string()]);
                assert_eq!(args.output, "out.jsonl");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn export_defaults_to_all_conversations() {
        let cli = Cli::try_parse_from(["watilog", "export"]).unwrap();
        match cli.command {
            Command::Export(args) => {
                assert!(args.source_ids.is_empty());
                assert_eq!(args.output, "watilog_export.jsonl");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_senders() {
        let cli = Cli::try_parse_from(["watilog", "senders", "--all"]).unwrap();
        match cli.command {
            Command::Senders(args) => assert!(args.all),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
