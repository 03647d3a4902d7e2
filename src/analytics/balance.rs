//! Running balances over grouped records
//!
//! Both variants expect buckets in ascending chronological order, which is
//! what [`group`](super::grouping::group) returns.

use super::grouping::TransactionGroup;
use crate::models::{Money, RecordId};

/// Cumulative total after a single record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordBalance {
    pub record_id: RecordId,
    pub balance: Money,
}

/// `result[i]` is the sum of bucket totals `0..=i`
pub fn bucket_running_balances(groups: &[TransactionGroup]) -> Vec<Money> {
    groups
        .iter()
        .scan(Money::zero(), |running, group| {
            *running += group.total;
            Some(*running)
        })
        .collect()
}

/// Cumulative total after each record, scanning buckets then their members
pub fn record_running_balances(groups: &[TransactionGroup]) -> Vec<RecordBalance> {
    let mut running = Money::zero();
    let mut balances = Vec::with_capacity(groups.iter().map(|g| g.records.len()).sum());

    for group in groups {
        for record in &group.records {
            running += record.amount;
            balances.push(RecordBalance {
                record_id: record.id.clone(),
                balance: running,
            });
        }
    }

    balances
}
