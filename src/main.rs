//! # watilog CLI
//!
//! Command-line interface for the watilog library.

use std::io;
use std::path::Path;
use std::process;
use std::time::Instant;

use clap::Parser as ClapParser;

use watilog::cli::{Cli, Command, ExportArgs, IngestArgs, ListArgs, SendersArgs, ShowArgs};
use watilog::config::IngestConfig;
use watilog::export;
use watilog::ingest::Ingestor;
use watilog::query::ListQuery;
use watilog::store::MessageStore;
use watilog::{Result, WatilogError};

fn main() {
    if let Err(e) = run() {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = <Cli as ClapParser>::parse();

    match cli.command {
        Command::Ingest(ref args) => cmd_ingest(&cli.db, args),
        Command::List(ref args) => cmd_list(&cli.db, args),
        Command::Show(ref args) => cmd_show(&cli.db, args),
        Command::Export(ref args) => cmd_export(&cli.db, args),
        Command::Senders(ref args) => cmd_senders(&cli.db, args),
    }
}

fn cmd_ingest(db: &str, args: &IngestArgs) -> Result<()> {
    let total_start = Instant::now();

    // Print header
    println!("📦 watilog v{}", env!("CARGO_PKG_VERSION"));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("📂 Input:   {}", args.dir);
    println!("💾 Store:   {}", db);
    if args.truncate {
        println!("🧹 Mode:    Truncate before ingest");
    }
    println!();

    let config = IngestConfig::new()
        .with_extension(&args.extension)
        .with_excluded_substrings(args.excluded.clone())
        .with_batch_size(args.batch_size)
        .with_truncate(args.truncate);
    let ingestor = Ingestor::with_config(config);
    let mut store = MessageStore::open(db)?;

    println!("⏳ Ingesting export files...");
    let ingest_start = Instant::now();
    let report = ingestor.run(Path::new(&args.dir), &mut store)?;
    let ingest_time = ingest_start.elapsed();
    println!(
        "   {} files, {} messages ({:.2}s)",
        report.files_processed,
        report.messages_ingested,
        ingest_time.as_secs_f64()
    );

    if !report.is_clean() {
        println!();
        println!("⚠️  Skipped {} unreadable file(s):", report.files_skipped());
        for (path, reason) in &report.skipped {
            println!("   {}: {}", path.display(), reason);
        }
    }

    let total_time = total_start.elapsed();

    println!();
    println!("✅ Done! Messages stored in {}", db);

    // Summary
    println!();
    println!("📊 Summary:");
    println!("   Files:     {}", report.files_processed);
    println!("   Messages:  {}", report.messages_ingested);
    println!("   Human:     {}", report.human_messages);

    // Performance stats
    println!();
    println!("⚡ Performance:");
    println!("   Total time:  {:.2}s", total_time.as_secs_f64());
    let msgs_per_sec = report.messages_ingested as f64 / total_time.as_secs_f64();
    println!("   Throughput:  {:.0} messages/sec", msgs_per_sec);

    Ok(())
}

fn cmd_list(db: &str, args: &ListArgs) -> Result<()> {
    let mut query = ListQuery::new()
        .with_limit(args.limit)
        .with_offset(args.offset);
    if let Some(ref term) = args.search {
        query = query.with_search(term);
    }
    if let Some(ref since) = args.since {
        query = query.with_since(since)?;
    }
    if let Some(ref until) = args.until {
        query = query.with_until(until)?;
    }
    if !args.all {
        query = query.with_days(args.days);
    }

    let Some(store) = open_store(db) else {
        return Ok(());
    };
    let summaries = match store.list_conversations(&query) {
        Ok(summaries) => summaries,
        Err(e) => {
            report_query_failure(&e);
            return Ok(());
        }
    };

    println!("💬 {} conversation(s)", summaries.len());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    if summaries.is_empty() {
        println!("   (no conversations match)");
        return Ok(());
    }
    for summary in &summaries {
        println!(
            "   {:<28} {:>6} msgs   last {}",
            summary.source_id, summary.count, summary.last_active
        );
        println!("      {}: {}", summary.last_sender, summary.preview_line(60));
    }

    Ok(())
}

fn cmd_show(db: &str, args: &ShowArgs) -> Result<()> {
    let Some(store) = open_store(db) else {
        return Ok(());
    };
    let records = match store.conversation_history(&args.source_id, args.include_automated) {
        Ok(records) => records,
        Err(e) => {
            report_query_failure(&e);
            return Ok(());
        }
    };

    println!("💬 {} ({} message(s))", args.source_id, records.len());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    for record in &records {
        println!("[{}] {}: {}", record.timestamp, record.sender, record.body);
    }

    Ok(())
}

fn cmd_export(db: &str, args: &ExportArgs) -> Result<()> {
    let Some(store) = open_store(db) else {
        return Ok(());
    };

    if args.output == "-" {
        let records = match store.bulk_history(&args.source_ids) {
            Ok(records) => records,
            Err(e) => {
                report_query_failure(&e);
                return Ok(());
            }
        };
        export::write_jsonl(&records, io::stdout().lock())?;
        return Ok(());
    }

    match export::export_conversations(&store, &args.source_ids, Path::new(&args.output)) {
        Ok(count) => println!("✅ Exported {} message(s) to {}", count, args.output),
        Err(e) if e.is_storage() => report_query_failure(&e),
        Err(e) => return Err(e),
    }

    Ok(())
}

fn cmd_senders(db: &str, args: &SendersArgs) -> Result<()> {
    let Some(store) = open_store(db) else {
        return Ok(());
    };
    let senders = match store.distinct_senders(!args.all) {
        Ok(senders) => senders,
        Err(e) => {
            report_query_failure(&e);
            return Ok(());
        }
    };

    println!("👤 {} sender(s)", senders.len());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    for sender in &senders {
        println!("   {}", sender);
    }

    Ok(())
}

/// Opens the store, downgrading failures to a warning so read commands
/// exit cleanly with empty output instead of aborting.
fn open_store(db: &str) -> Option<MessageStore> {
    match MessageStore::open(db) {
        Ok(store) => Some(store),
        Err(e) => {
            report_query_failure(&e);
            None
        }
    }
}

fn report_query_failure(e: &WatilogError) {
    eprintln!("⚠️  Query failed: {}", e);
}
