use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use wix_lib::types::{DomainEvent, MessageEnvelope};
use wix_lib::{EventDeduplicator, MemorySequenceStore, SequenceStore, SqliteSequenceStore};

use crate::output::{
    print_events_csv, print_events_markdown, print_events_table, print_json, OutputFormat,
};

#[derive(Args)]
pub struct EventsArgs {
    /// JSON-lines file with one domain event per line
    pub file: PathBuf,

    /// Lines are webhook envelopes wrapping the event instead of bare events
    #[arg(long)]
    pub envelope: bool,

    /// SQLite file remembering processed sequences across runs
    #[arg(long)]
    pub db: Option<PathBuf>,
}

pub fn run(args: &EventsArgs, format: &OutputFormat) -> Result<()> {
    let input = std::fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;

    let accepted = match &args.db {
        Some(db_path) => {
            let store = SqliteSequenceStore::open(db_path)
                .with_context(|| format!("failed to open {}", db_path.display()))?;
            accept_lines(&EventDeduplicator::new(store), &input, args.envelope, &args.file)?
        }
        None => accept_lines(
            &EventDeduplicator::new(MemorySequenceStore::new()),
            &input,
            args.envelope,
            &args.file,
        )?,
    };

    match format {
        OutputFormat::Table => print_events_table(&accepted),
        OutputFormat::Json => print_json(&accepted),
        OutputFormat::Csv => print_events_csv(&accepted)?,
        OutputFormat::Markdown => print_events_markdown(&accepted),
    }

    Ok(())
}

/// Parses each non-blank line and keeps the events the de-duplicator accepts,
/// in file order.
pub fn accept_lines<S: SequenceStore>(
    dedup: &EventDeduplicator<S>,
    input: &str,
    envelope: bool,
    source: &Path,
) -> Result<Vec<DomainEvent>> {
    let mut accepted = Vec::new();
    let mut total = 0usize;
    for (line_no, line) in input.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        total += 1;
        let location = || format!("{}:{}", source.display(), line_no + 1);
        if envelope {
            let envelope: MessageEnvelope = serde_json::from_str(line)
                .with_context(|| format!("invalid envelope at {}", location()))?;
            if let Some(event) = dedup
                .accept_envelope(&envelope)
                .with_context(|| format!("failed to process event at {}", location()))?
            {
                accepted.push(event);
            }
        } else {
            let event: DomainEvent = serde_json::from_str(line)
                .with_context(|| format!("invalid event at {}", location()))?;
            if dedup.accept(&event)? {
                accepted.push(event);
            }
        }
    }
    eprintln!("{} of {} events accepted", accepted.len(), total);
    Ok(accepted)
}
