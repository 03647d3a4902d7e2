//! The `report` command
//!
//! Top categories and days for a date range, compared with the period of
//! equal length just before it.

use std::path::PathBuf;

use clap::Args;
use tracing::info;

use super::filter::FilterArgs;
use super::{create_output, load_transactions};
use crate::analytics::ReportsView;
use crate::config::{PocketbookPaths, Settings};
use crate::error::PocketbookResult;
use crate::models::DateRange;

/// Arguments for `pocketbook report`
#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    /// Transaction CSV file (defaults to the data directory's transactions.csv)
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// First date of the reported period (YYYY-MM-DD)
    #[arg(long)]
    pub start: String,

    /// Last date of the reported period (YYYY-MM-DD)
    #[arg(long)]
    pub end: String,

    /// Number of categories and days to rank
    #[arg(long)]
    pub top: Option<usize>,

    #[command(flatten)]
    pub filter: FilterArgs,

    /// Export the report to a CSV file instead of printing
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Handle `pocketbook report`
pub fn handle_report_command(
    paths: &PocketbookPaths,
    settings: &Settings,
    args: ReportArgs,
) -> PocketbookResult<()> {
    let range = DateRange::parse(&args.start, &args.end)?;
    let records = load_transactions(paths, args.file.as_deref())?;

    let filter = args.filter.to_filter(None, settings.include_deleted);
    let top_n = args.top.unwrap_or(settings.top_n);

    let report = ReportsView::generate(&records, &filter, range, top_n);
    info!(
        records = report.record_count,
        categories = report.category_count,
        %range,
        "generated report"
    );

    if let Some(path) = args.output {
        report.export_csv(create_output(&path)?)?;
        println!("Report exported to: {}", path.display());
        return Ok(());
    }

    print!("{}", report.format_terminal(&settings.currency_symbol));
    Ok(())
}
