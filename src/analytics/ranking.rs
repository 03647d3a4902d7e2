//! Top-N rankings by category and by day
//!
//! Input is expected to hold a single kind of record (expenses, for the
//! reports view). Percentages are shares of the input's grand total and are
//! zero, never NaN, when that total is zero.

use std::collections::HashMap;
use std::hash::Hash;

use chrono::NaiveDate;

use super::grouping::records_total;
use crate::models::{Money, TransactionRecord};

/// Spending share of one category
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryRanking {
    pub category: String,
    pub total: Money,
    pub count: usize,
    /// Share of the grand total, 0-100
    pub percentage: f64,
}

/// Spending share of one calendar day
#[derive(Debug, Clone, PartialEq)]
pub struct DayRanking {
    pub date: NaiveDate,
    pub total: Money,
    pub count: usize,
    /// Share of the grand total, 0-100
    pub percentage: f64,
}

/// `100 * part / whole`, or 0 for an empty whole
pub fn percentage_of(part: Money, whole: Money) -> f64 {
    if whole.is_zero() {
        0.0
    } else {
        part.cents() as f64 / whole.cents() as f64 * 100.0
    }
}

struct Tally<K> {
    key: K,
    total: Money,
    count: usize,
}

/// Total and count per key, sorted by total descending then key ascending
fn tally<K, F>(records: &[TransactionRecord], key_of: F) -> Vec<Tally<K>>
where
    K: Eq + Hash + Ord + Clone,
    F: Fn(&TransactionRecord) -> K,
{
    let mut totals: HashMap<K, (Money, usize)> = HashMap::new();
    for record in records {
        let entry = totals.entry(key_of(record)).or_insert((Money::zero(), 0));
        entry.0 += record.amount;
        entry.1 += 1;
    }

    let mut tallies: Vec<Tally<K>> = totals
        .into_iter()
        .map(|(key, (total, count))| Tally { key, total, count })
        .collect();
    tallies.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.key.cmp(&b.key)));
    tallies
}

/// Every category, highest total first
pub fn rank_categories(records: &[TransactionRecord]) -> Vec<CategoryRanking> {
    let grand_total = records_total(records);
    tally(records, |r| r.category.clone())
        .into_iter()
        .map(|t| CategoryRanking {
            percentage: percentage_of(t.total, grand_total),
            category: t.key,
            total: t.total,
            count: t.count,
        })
        .collect()
}

/// Every day with records, highest total first
pub fn rank_days(records: &[TransactionRecord]) -> Vec<DayRanking> {
    let grand_total = records_total(records);
    tally(records, |r| r.date)
        .into_iter()
        .map(|t| DayRanking {
            percentage: percentage_of(t.total, grand_total),
            date: t.key,
            total: t.total,
            count: t.count,
        })
        .collect()
}

/// The `n` highest-spending categories; ties go alphabetically
pub fn top_categories(records: &[TransactionRecord], n: usize) -> Vec<CategoryRanking> {
    let mut ranked = rank_categories(records);
    ranked.truncate(n);
    ranked
}

/// The `n` highest-spending days; ties go to the earlier date
pub fn top_days(records: &[TransactionRecord], n: usize) -> Vec<DayRanking> {
    let mut ranked = rank_days(records);
    ranked.truncate(n);
    ranked
}
