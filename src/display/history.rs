//! Terminal rendering of the history view
//!
//! Which buckets show their individual records is presentation state owned by
//! the caller as an [`ExpandedBuckets`] set.

use std::collections::BTreeSet;

use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::format::truncate;
use crate::analytics::{BucketKey, HistoryView};
use crate::models::TransactionRecord;

/// Bucket keys whose records are listed under the bucket summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandedBuckets {
    keys: BTreeSet<BucketKey>,
}

impl ExpandedBuckets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every bucket currently in `view`
    pub fn all(view: &HistoryView) -> Self {
        view.groups.iter().map(|g| g.key).collect()
    }

    pub fn expand(&mut self, key: BucketKey) {
        self.keys.insert(key);
    }

    pub fn collapse(&mut self, key: &BucketKey) {
        self.keys.remove(key);
    }

    /// Flip one bucket, returning whether it is now expanded
    pub fn toggle(&mut self, key: BucketKey) -> bool {
        if self.keys.remove(&key) {
            false
        } else {
            self.keys.insert(key);
            true
        }
    }

    pub fn is_expanded(&self, key: &BucketKey) -> bool {
        self.keys.contains(key)
    }

    /// Drop keys for buckets that are not in `view`
    ///
    /// Changing granularity or filters invalidates keys from the old grouping.
    pub fn retain_present(&mut self, view: &HistoryView) {
        self.keys
            .retain(|key| view.groups.iter().any(|group| group.key == *key));
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl FromIterator<BucketKey> for ExpandedBuckets {
    fn from_iter<I: IntoIterator<Item = BucketKey>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().collect(),
        }
    }
}

#[derive(Tabled)]
struct BucketRow {
    #[tabled(rename = "")]
    marker: &'static str,
    #[tabled(rename = "Period")]
    label: String,
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Items")]
    count: usize,
    #[tabled(rename = "Total")]
    total: String,
    #[tabled(rename = "Balance")]
    balance: String,
}

#[derive(Tabled)]
struct RecordRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Kind")]
    kind: &'static str,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Method")]
    method: &'static str,
    #[tabled(rename = "Notes")]
    notes: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Balance")]
    balance: String,
}

impl RecordRow {
    fn new(record: &TransactionRecord, balance: String, symbol: &str) -> Self {
        let mut notes = record.notes.clone().unwrap_or_default();
        if !record.tags.is_empty() {
            let tags: Vec<String> = record.tags.iter().map(|t| format!("#{}", t)).collect();
            if !notes.is_empty() {
                notes.push(' ');
            }
            notes.push_str(&tags.join(" "));
        }
        if record.deleted {
            notes.insert_str(0, "[deleted] ");
        }

        Self {
            date: record.date.format("%Y-%m-%d").to_string(),
            kind: record.kind.as_str(),
            category: truncate(&record.category, 20),
            method: record.payment_method.as_str(),
            notes: truncate(&notes, 30),
            amount: record.amount.format_with_symbol(symbol),
            balance,
        }
    }
}

impl HistoryView {
    /// Format the history for terminal display
    pub fn format_terminal(&self, expanded: &ExpandedBuckets, symbol: &str) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "Transaction History by {} ({} buckets, {} transactions)\n",
            self.granularity,
            self.groups.len(),
            self.record_count()
        ));

        if self.is_empty() {
            output.push_str("No transactions found.\n");
            return output;
        }

        let rows = self
            .groups
            .iter()
            .zip(&self.bucket_balances)
            .map(|(group, balance)| BucketRow {
                marker: if expanded.is_expanded(&group.key) {
                    "▾"
                } else {
                    "▸"
                },
                label: group.label.clone(),
                key: group.key.to_string(),
                count: group.item_count,
                total: group.total.format_with_symbol(symbol),
                balance: balance.format_with_symbol(symbol),
            });
        output.push_str(&Table::new(rows).with(Style::rounded()).to_string());
        output.push('\n');

        // record_balances runs over groups then members, so each group owns
        // the next item_count entries
        let mut offset = 0;
        for group in &self.groups {
            let balances = self
                .record_balances
                .get(offset..offset + group.item_count)
                .unwrap_or_default();
            offset += group.item_count;

            if !expanded.is_expanded(&group.key) {
                continue;
            }

            output.push_str(&format!(
                "\n{} ({} to {})\n",
                group.label,
                group.date_range.start(),
                group.date_range.end()
            ));

            let rows = group.records.iter().zip(balances).map(|(record, entry)| {
                RecordRow::new(record, entry.balance.format_with_symbol(symbol), symbol)
            });
            output.push_str(&Table::new(rows).with(Style::rounded()).to_string());
            output.push('\n');
        }

        output.push_str(&format!("\nTotal: {}\n", self.total().format_with_symbol(symbol)));
        if let Some(net) = self.net() {
            output.push_str(&format!(
                "Net (income - expense): {}\n",
                net.format_with_symbol(symbol)
            ));
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::{FilterSpec, Granularity};
    use crate::models::{Money, PaymentMethod, TransactionKind};
    use chrono::NaiveDate;

    fn record(id: &str, m: u32, d: u32, cents: i64) -> TransactionRecord {
        TransactionRecord::new(
            id,
            NaiveDate::from_ymd_opt(2025, m, d).unwrap(),
            Money::from_cents(cents),
            TransactionKind::Expense,
            "Groceries",
            PaymentMethod::Cash,
            "alex",
        )
    }

    fn view() -> HistoryView {
        let records = vec![
            record("a", 1, 5, 4000).with_notes("market"),
            record("b", 1, 20, 6000).with_tags(["family"]),
            record("c", 2, 2, 1000),
        ];
        HistoryView::generate(&records, &FilterSpec::default(), Granularity::Month)
    }

    #[test]
    fn test_toggle() {
        let key = BucketKey::Month { year: 2025, month: 1 };
        let mut expanded = ExpandedBuckets::new();

        assert!(expanded.toggle(key));
        assert!(expanded.is_expanded(&key));
        assert!(!expanded.toggle(key));
        assert!(expanded.is_empty());

        expanded.expand(key);
        expanded.collapse(&key);
        assert!(!expanded.is_expanded(&key));
    }

    #[test]
    fn test_all_and_retain_present() {
        let view = view();
        let mut expanded = ExpandedBuckets::all(&view);
        assert_eq!(expanded.len(), 2);

        expanded.expand(BucketKey::Year(2020));
        expanded.retain_present(&view);
        assert_eq!(expanded.len(), 2);
        assert!(!expanded.is_expanded(&BucketKey::Year(2020)));
    }

    #[test]
    fn test_collapsed_output() {
        let output = view().format_terminal(&ExpandedBuckets::new(), "$");

        assert!(output.contains("Transaction History by month (2 buckets, 3 transactions)"));
        assert!(output.contains("January 2025"));
        assert!(output.contains("$100.00"));
        assert!(output.contains("$110.00"));
        assert!(!output.contains("2025-01-05"));
        assert!(output.contains("Total: $110.00"));
        assert!(!output.contains("Net"));
    }

    #[test]
    fn test_mixed_kinds_show_net() {
        let records = vec![
            record("a", 1, 5, 4000),
            TransactionRecord::new(
                "pay",
                NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
                Money::from_cents(10000),
                TransactionKind::Income,
                "Salary",
                PaymentMethod::Card,
                "alex",
            ),
        ];
        let view = HistoryView::generate(&records, &FilterSpec::default(), Granularity::Month);
        let output = view.format_terminal(&ExpandedBuckets::new(), "$");

        assert!(output.contains("Total: $140.00"));
        assert!(output.contains("Net (income - expense): $60.00"));
    }

    #[test]
    fn test_expanded_output_lists_records() {
        let mut expanded = ExpandedBuckets::new();
        expanded.expand(BucketKey::Month { year: 2025, month: 1 });
        let output = view().format_terminal(&expanded, "€");

        assert!(output.contains("January 2025 (2025-01-05 to 2025-01-20)"));
        assert!(output.contains("2025-01-05"));
        assert!(output.contains("market"));
        assert!(output.contains("#family"));
        assert!(output.contains("€40.00"));
        assert!(!output.contains("2025-02-02 to"));
    }

    #[test]
    fn test_empty_output() {
        let view = HistoryView::generate(&[], &FilterSpec::default(), Granularity::Week);
        let output = view.format_terminal(&ExpandedBuckets::new(), "$");
        assert!(output.contains("No transactions found."));
    }
}
