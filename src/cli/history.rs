//! The `history` command
//!
//! Groups the filtered records into time buckets with running balances.

use std::path::PathBuf;

use clap::Args;
use tracing::info;

use super::filter::{resolve_range, FilterArgs};
use super::{create_output, load_transactions};
use crate::analytics::{BucketKey, Granularity, HistoryView};
use crate::config::{PocketbookPaths, Settings};
use crate::display::ExpandedBuckets;
use crate::error::PocketbookResult;

/// Arguments for `pocketbook history`
#[derive(Args, Debug, Clone, Default)]
pub struct HistoryArgs {
    /// Transaction CSV file (defaults to the data directory's transactions.csv)
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Bucket width: day, week, month or year
    #[arg(short = 'b', long = "by", value_name = "GRANULARITY")]
    pub granularity: Option<Granularity>,

    /// First date to include (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<String>,

    /// Last date to include (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<String>,

    #[command(flatten)]
    pub filter: FilterArgs,

    /// List the records of a bucket, by key (e.g. 2025-01, 2025-W03) or "all"
    #[arg(short, long, value_name = "KEY")]
    pub expand: Vec<String>,

    /// Export bucket totals to a CSV file instead of printing
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Handle `pocketbook history`
pub fn handle_history_command(
    paths: &PocketbookPaths,
    settings: &Settings,
    args: HistoryArgs,
) -> PocketbookResult<()> {
    let records = load_transactions(paths, args.file.as_deref())?;

    let date_range = resolve_range(args.start.as_deref(), args.end.as_deref(), &records)?;
    let filter = args.filter.to_filter(date_range, settings.include_deleted);
    let granularity = args.granularity.unwrap_or(settings.default_granularity);

    let view = HistoryView::generate(&records, &filter, granularity);
    info!(
        buckets = view.groups.len(),
        records = view.record_count(),
        %granularity,
        "generated history"
    );

    if let Some(path) = args.output {
        view.export_csv(create_output(&path)?)?;
        println!("History exported to: {}", path.display());
        return Ok(());
    }

    let expanded = expanded_buckets(&view, &args.expand)?;
    print!("{}", view.format_terminal(&expanded, &settings.currency_symbol));
    Ok(())
}

/// Parse `--expand` values against the view's granularity
fn expanded_buckets(view: &HistoryView, keys: &[String]) -> PocketbookResult<ExpandedBuckets> {
    if keys.iter().any(|k| k.eq_ignore_ascii_case("all")) {
        return Ok(ExpandedBuckets::all(view));
    }

    keys.iter()
        .map(|k| BucketKey::parse(k, view.granularity))
        .collect()
}
