//! Filter flags shared by the `history` and `report` commands

use clap::Args;

use crate::analytics::{FilterSpec, Selection};
use crate::error::PocketbookResult;
use crate::models::{parse_date, DateRange, PaymentMethod, TransactionKind, TransactionRecord};

/// Record filters other than the date range
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Only this category (exact match)
    #[arg(short, long)]
    pub category: Option<String>,

    /// Only this payment method (cash or card)
    #[arg(short, long)]
    pub method: Option<PaymentMethod>,

    /// Require a tag (repeat for several; all must be present)
    #[arg(short, long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,

    /// Case-insensitive text search over category, notes and tags
    #[arg(short, long)]
    pub search: Option<String>,

    /// Income or expense records [default: expense]
    #[arg(short, long)]
    pub kind: Option<TransactionKind>,

    /// Include soft-deleted records
    #[arg(long, conflicts_with = "exclude_deleted")]
    pub include_deleted: bool,

    /// Leave out soft-deleted records even if the settings include them
    #[arg(long)]
    pub exclude_deleted: bool,
}

impl FilterArgs {
    /// Build the filter, falling back to the configured deleted-record default
    ///
    /// Views total one kind at a time, so an unset `--kind` means expenses.
    pub fn to_filter(&self, date_range: Option<DateRange>, include_deleted_default: bool) -> FilterSpec {
        let include_deleted = if self.exclude_deleted {
            false
        } else {
            self.include_deleted || include_deleted_default
        };

        FilterSpec {
            date_range,
            category: Selection::from(self.category.clone()),
            payment_method: Selection::from(self.method),
            kind: Some(self.kind.unwrap_or(TransactionKind::Expense)),
            required_tags: self.tags.iter().cloned().collect(),
            search: self.search.clone().filter(|s| !s.trim().is_empty()),
            include_deleted,
        }
    }
}

/// Resolve optional `--start`/`--end` bounds into a range
///
/// A missing bound extends to the earliest or latest record date.
pub fn resolve_range(
    start: Option<&str>,
    end: Option<&str>,
    records: &[TransactionRecord],
) -> PocketbookResult<Option<DateRange>> {
    let start = start.map(parse_date).transpose()?;
    let end = end.map(parse_date).transpose()?;

    let earliest = || records.iter().map(|r| r.date).min();
    let latest = || records.iter().map(|r| r.date).max();

    let range = match (start, end) {
        (None, None) => return Ok(None),
        (Some(start), Some(end)) => DateRange::new(start, end)?,
        (Some(start), None) => DateRange::new(start, latest().map_or(start, |d| d.max(start)))?,
        (None, Some(end)) => DateRange::new(earliest().map_or(end, |d| d.min(end)), end)?,
    };

    Ok(Some(range))
}
