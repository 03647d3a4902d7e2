//! History view
//!
//! Filter, bucket and accumulate: the data behind the transaction history
//! screen.

use std::io::Write;

use tracing::debug;

use super::balance::{bucket_running_balances, record_running_balances, RecordBalance};
use super::bucket::Granularity;
use super::filter::FilterSpec;
use super::grouping::{group, net_total, TransactionGroup};
use crate::error::PocketbookResult;
use crate::models::{Money, TransactionRecord};

/// Grouped history with running balances
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryView {
    /// Bucket width used for grouping
    pub granularity: Granularity,
    /// Buckets in chronological order
    pub groups: Vec<TransactionGroup>,
    /// Running balance after each bucket, parallel to `groups`
    pub bucket_balances: Vec<Money>,
    /// Running balance after each record, in display order
    pub record_balances: Vec<RecordBalance>,
}

impl HistoryView {
    /// Build the history for the records matching `filter`
    pub fn generate(
        records: &[TransactionRecord],
        filter: &FilterSpec,
        granularity: Granularity,
    ) -> Self {
        let filtered = filter.apply(records);
        debug!(
            input = records.len(),
            matched = filtered.len(),
            "filtered records for history"
        );

        let groups = group(&filtered, granularity);
        let bucket_balances = bucket_running_balances(&groups);
        let record_balances = record_running_balances(&groups);

        Self {
            granularity,
            groups,
            bucket_balances,
            record_balances,
        }
    }

    /// Final running balance, zero when there are no buckets
    pub fn total(&self) -> Money {
        self.bucket_balances.last().copied().unwrap_or_default()
    }

    /// Number of records across all buckets
    pub fn record_count(&self) -> usize {
        self.groups.iter().map(|g| g.item_count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Income minus expense, only when the view holds both kinds
    pub fn net(&self) -> Option<Money> {
        let mut kinds = self.groups.iter().flat_map(|g| &g.records).map(|r| r.kind);
        let first = kinds.next()?;
        if kinds.all(|kind| kind == first) {
            return None;
        }
        Some(self.groups.iter().map(|g| net_total(&g.records)).sum())
    }

    /// Export one row per bucket
    pub fn export_csv<W: Write>(&self, writer: W) -> PocketbookResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record([
            "Bucket",
            "Label",
            "First Date",
            "Last Date",
            "Transactions",
            "Total",
            "Running Balance",
        ])?;

        for (group, balance) in self.groups.iter().zip(&self.bucket_balances) {
            csv.write_record([
                group.key.to_string(),
                group.label.clone(),
                group.date_range.start().to_string(),
                group.date_range.end().to_string(),
                group.item_count.to_string(),
                group.total.to_decimal_string(),
                balance.to_decimal_string(),
            ])?;
        }

        csv.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::filter::Selection;
    use crate::models::{PaymentMethod, TransactionKind};
    use chrono::NaiveDate;

    fn record(id: &str, m: u32, d: u32, cents: i64, kind: TransactionKind) -> TransactionRecord {
        TransactionRecord::new(
            id,
            NaiveDate::from_ymd_opt(2025, m, d).unwrap(),
            Money::from_cents(cents),
            kind,
            "Food",
            PaymentMethod::Card,
            "alex",
        )
    }

    fn sample() -> Vec<TransactionRecord> {
        let mut deleted = record("gone", 1, 7, 99900, TransactionKind::Expense);
        deleted.soft_delete();
        vec![
            record("a", 1, 5, 4000, TransactionKind::Expense),
            record("b", 1, 20, 6000, TransactionKind::Expense),
            record("c", 2, 2, 1000, TransactionKind::Expense),
            record("pay", 1, 31, 250000, TransactionKind::Income),
            deleted,
        ]
    }

    #[test]
    fn test_generate_expense_history() {
        let view = HistoryView::generate(
            &sample(),
            &FilterSpec::for_kind(TransactionKind::Expense),
            Granularity::Month,
        );

        assert_eq!(view.groups.len(), 2);
        assert_eq!(view.bucket_balances, vec![Money::from_cents(10000), Money::from_cents(11000)]);
        assert_eq!(view.record_balances.len(), 3);
        assert_eq!(view.total().cents(), 11000);
        assert_eq!(view.record_count(), 3);
    }

    #[test]
    fn test_net_only_for_mixed_views() {
        let expenses = HistoryView::generate(
            &sample(),
            &FilterSpec::for_kind(TransactionKind::Expense),
            Granularity::Month,
        );
        assert_eq!(expenses.net(), None);

        let mixed = HistoryView::generate(&sample(), &FilterSpec::default(), Granularity::Month);
        assert_eq!(mixed.net(), Some(Money::from_cents(239000)));
        assert_eq!(mixed.total().cents(), 261000);
    }

    #[test]
    fn test_include_deleted() {
        let filter = FilterSpec {
            include_deleted: true,
            ..FilterSpec::for_kind(TransactionKind::Expense)
        };
        let view = HistoryView::generate(&sample(), &filter, Granularity::Month);
        assert_eq!(view.record_count(), 4);
        assert_eq!(view.total().cents(), 110900);
    }

    #[test]
    fn test_empty_history() {
        let filter = FilterSpec {
            category: Selection::Only("Nothing".to_string()),
            ..Default::default()
        };
        let view = HistoryView::generate(&sample(), &filter, Granularity::Week);
        assert!(view.is_empty());
        assert_eq!(view.total(), Money::zero());
    }

    #[test]
    fn test_csv_export() {
        let view = HistoryView::generate(
            &sample(),
            &FilterSpec::for_kind(TransactionKind::Expense),
            Granularity::Month,
        );

        let mut out = Vec::new();
        view.export_csv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "Bucket,Label,First Date,Last Date,Transactions,Total,Running Balance"
        );
        assert_eq!(lines[1], "2025-01,January 2025,2025-01-05,2025-01-20,2,100.00,100.00");
        assert_eq!(lines[2], "2025-02,February 2025,2025-02-02,2025-02-02,1,10.00,110.00");
    }
}
