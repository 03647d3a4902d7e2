//! Grouping and aggregation
//!
//! Partitions records into time buckets and totals each bucket. Callers
//! pre-filter to a single [`TransactionKind`](crate::models::TransactionKind),
//! so bucket totals are plain sums of magnitudes.

use std::collections::HashMap;

use tracing::debug;

use super::bucket::{bucket_key, BucketKey, Granularity};
use crate::models::{DateRange, Money, TransactionRecord};

/// One time bucket of records
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionGroup {
    /// Bucket identifier
    pub key: BucketKey,
    /// Display label
    pub label: String,
    /// Earliest to latest member date (not the nominal bucket boundary)
    pub date_range: DateRange,
    /// Members in `(date, created_at)` order
    pub records: Vec<TransactionRecord>,
    /// Sum of member amounts
    pub total: Money,
    /// Number of members
    pub item_count: usize,
}

impl TransactionGroup {
    fn open(key: BucketKey, first: TransactionRecord) -> Self {
        Self {
            key,
            label: key.label(),
            date_range: DateRange::single_day(first.date),
            total: first.amount,
            item_count: 1,
            records: vec![first],
        }
    }

    fn push(&mut self, record: TransactionRecord) {
        self.date_range.extend_to(record.date);
        self.total += record.amount;
        self.item_count += 1;
        self.records.push(record);
    }
}

/// Sort a copy of the records by date, then creation time
pub fn sort_chronologically(records: &[TransactionRecord]) -> Vec<TransactionRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.created_at.cmp(&b.created_at))
    });
    sorted
}

/// Group records into buckets of the given granularity
///
/// Buckets are keyed by equality, not by contiguous run, and come back ordered
/// by the start of their member date range. Empty input yields no buckets.
pub fn group(records: &[TransactionRecord], granularity: Granularity) -> Vec<TransactionGroup> {
    let mut groups: Vec<TransactionGroup> = Vec::new();
    let mut index: HashMap<BucketKey, usize> = HashMap::new();

    for record in sort_chronologically(records) {
        let key = bucket_key(record.date, granularity);
        match index.get(&key) {
            Some(&slot) => groups[slot].push(record),
            None => {
                index.insert(key, groups.len());
                groups.push(TransactionGroup::open(key, record));
            }
        }
    }

    // Stable: equal starts keep first-seen order
    groups.sort_by_key(|g| g.date_range.start());

    debug!(
        records = records.len(),
        buckets = groups.len(),
        %granularity,
        "grouped records"
    );

    groups
}

/// Sum of all bucket totals
pub fn groups_total(groups: &[TransactionGroup]) -> Money {
    groups.iter().map(|g| g.total).sum()
}

/// Sum of all record amounts
pub fn records_total(records: &[TransactionRecord]) -> Money {
    records.iter().map(|r| r.amount).sum()
}

/// Income minus expense over records of either kind
pub fn net_total(records: &[TransactionRecord]) -> Money {
    records.iter().map(TransactionRecord::signed_amount).sum()
}
