//! Period-over-period comparison
//!
//! The previous period is the range of identical length that ends the day
//! before the current one starts: no gap, no overlap.

use chrono::Duration;
use std::fmt;

use crate::models::{DateRange, Money, TransactionRecord};

/// Relative change between two totals
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PercentChange {
    /// `100 * delta / |previous|`
    Defined(f64),
    /// Previous total was zero while the current one is not
    NoBaseline,
}

impl PercentChange {
    /// The percentage, if one exists
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Defined(pct) => Some(*pct),
            Self::NoBaseline => None,
        }
    }
}

impl fmt::Display for PercentChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Defined(pct) => write!(f, "{:+.1}%", pct),
            Self::NoBaseline => f.write_str("n/a (no baseline)"),
        }
    }
}

/// Absolute and relative change from a previous total
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodDelta {
    pub delta: Money,
    pub percent: PercentChange,
}

/// Totals of a current range against its preceding range
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodMetrics {
    pub current_range: DateRange,
    pub previous_range: DateRange,
    pub current_total: Money,
    pub previous_total: Money,
    pub delta: Money,
    pub percent: PercentChange,
}

impl PeriodMetrics {
    /// Total the records falling in `current_range` and in its previous period
    ///
    /// Records are expected to be pre-filtered on every axis except date.
    pub fn compute(records: &[TransactionRecord], current_range: DateRange) -> Self {
        let previous_range = previous_period(&current_range);
        let current_total = total_in(records, &current_range);
        let previous_total = total_in(records, &previous_range);
        Self::from_totals(current_range, previous_range, current_total, previous_total)
    }

    /// Assemble metrics from totals computed elsewhere
    pub fn from_totals(
        current_range: DateRange,
        previous_range: DateRange,
        current_total: Money,
        previous_total: Money,
    ) -> Self {
        let PeriodDelta { delta, percent } = compare(current_total, previous_total);
        Self {
            current_range,
            previous_range,
            current_total,
            previous_total,
            delta,
            percent,
        }
    }
}

fn total_in(records: &[TransactionRecord], range: &DateRange) -> Money {
    records
        .iter()
        .filter(|r| range.contains(r.date))
        .map(|r| r.amount)
        .sum()
}

/// The range of equal length immediately before `current`
pub fn previous_period(current: &DateRange) -> DateRange {
    let end = current.start() - Duration::days(1);
    let start = end - Duration::days(current.duration_days() - 1);
    // start <= end because duration_days() >= 1
    DateRange::new(start, end).unwrap_or_else(|_| DateRange::single_day(end))
}

/// Delta and percent change from `previous` to `current`
pub fn compare(current: Money, previous: Money) -> PeriodDelta {
    let delta = current - previous;
    let percent = if previous.is_zero() {
        if current.is_zero() {
            PercentChange::Defined(0.0)
        } else {
            PercentChange::NoBaseline
        }
    } else {
        PercentChange::Defined(delta.cents() as f64 / previous.abs().cents() as f64 * 100.0)
    };
    PeriodDelta { delta, percent }
}
