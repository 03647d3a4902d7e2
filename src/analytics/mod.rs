//! Transaction analytics engine
//!
//! Stateless functions over caller-supplied transaction records: filtering,
//! time bucketing, grouping, running balances, rankings and period-over-period
//! comparison. Nothing here performs I/O or holds state between calls, and the
//! input slice is never mutated.
//!
//! Data flow: records → [`FilterSpec`] → chronological sort → [`group`] →
//! running balances (history) or rankings + [`PeriodMetrics`] (reports).

pub mod balance;
pub mod bucket;
pub mod filter;
pub mod grouping;
pub mod history;
pub mod period;
pub mod ranking;
pub mod reports;

pub use balance::{bucket_running_balances, record_running_balances, RecordBalance};
pub use bucket::{bucket_key, bucket_label, iso_week, iso_week_monday, BucketKey, Granularity};
pub use filter::{FilterSpec, Selection};
pub use grouping::{group, groups_total, net_total, records_total, TransactionGroup};
pub use history::HistoryView;
pub use period::{compare, previous_period, PercentChange, PeriodDelta, PeriodMetrics};
pub use ranking::{
    rank_categories, rank_days, top_categories, top_days, CategoryRanking, DayRanking,
};
pub use reports::ReportsView;
