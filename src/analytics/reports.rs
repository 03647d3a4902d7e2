//! Reports view
//!
//! Category and day rankings for a date range, compared against the period
//! that immediately precedes it.

use std::io::Write;

use tracing::debug;

use super::filter::FilterSpec;
use super::grouping::records_total;
use super::period::{previous_period, PeriodMetrics};
use super::ranking::{rank_categories, top_days, CategoryRanking, DayRanking};
use crate::error::PocketbookResult;
use crate::models::{DateRange, Money, TransactionRecord};

/// Rankings and period comparison for one date range
#[derive(Debug, Clone, PartialEq)]
pub struct ReportsView {
    /// Reported range
    pub range: DateRange,
    /// Highest-total categories, at most `top_n`
    pub top_categories: Vec<CategoryRanking>,
    /// Highest-total days, at most `top_n`
    pub top_days: Vec<DayRanking>,
    /// Number of categories before truncation
    pub category_count: usize,
    /// Current vs previous period totals
    pub metrics: PeriodMetrics,
    /// Records in the current range
    pub record_count: usize,
}

impl ReportsView {
    /// Build the report for `current_range`
    ///
    /// Any date range on `filter` is replaced: the current range feeds the
    /// rankings, the previous period feeds the comparison.
    pub fn generate(
        records: &[TransactionRecord],
        filter: &FilterSpec,
        current_range: DateRange,
        top_n: usize,
    ) -> Self {
        let previous_range = previous_period(&current_range);
        let current = filter.with_date_range(current_range).apply(records);
        let previous = filter.with_date_range(previous_range).apply(records);

        debug!(
            current = current.len(),
            previous = previous.len(),
            %current_range,
            %previous_range,
            "filtered records for report"
        );

        let mut categories = rank_categories(&current);
        let category_count = categories.len();
        categories.truncate(top_n);

        let metrics = PeriodMetrics::from_totals(
            current_range,
            previous_range,
            records_total(&current),
            records_total(&previous),
        );

        Self {
            range: current_range,
            top_categories: categories,
            top_days: top_days(&current, top_n),
            category_count,
            metrics,
            record_count: current.len(),
        }
    }

    /// Total of the current range
    pub fn total(&self) -> Money {
        self.metrics.current_total
    }

    /// Export rankings and the comparison as a single sectioned CSV
    pub fn export_csv<W: Write>(&self, writer: W) -> PocketbookResult<()> {
        let mut csv = csv::Writer::from_writer(writer);

        csv.write_record(["Section", "Key", "Amount", "Count", "Percentage"])?;

        for category in &self.top_categories {
            csv.write_record([
                "category".to_string(),
                category.category.clone(),
                category.total.to_decimal_string(),
                category.count.to_string(),
                format!("{:.2}", category.percentage),
            ])?;
        }

        for day in &self.top_days {
            csv.write_record([
                "day".to_string(),
                day.date.to_string(),
                day.total.to_decimal_string(),
                day.count.to_string(),
                format!("{:.2}", day.percentage),
            ])?;
        }

        let percent = self
            .metrics
            .percent
            .value()
            .map(|pct| format!("{:.2}", pct))
            .unwrap_or_default();

        csv.write_record([
            "current".to_string(),
            self.metrics.current_range.to_string(),
            self.metrics.current_total.to_decimal_string(),
            self.record_count.to_string(),
            String::new(),
        ])?;
        csv.write_record([
            "previous".to_string(),
            self.metrics.previous_range.to_string(),
            self.metrics.previous_total.to_decimal_string(),
            String::new(),
            String::new(),
        ])?;
        csv.write_record([
            "change".to_string(),
            String::new(),
            self.metrics.delta.to_decimal_string(),
            String::new(),
            percent,
        ])?;

        csv.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::period::PercentChange;
    use crate::models::{PaymentMethod, TransactionKind};
    use chrono::NaiveDate;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    fn expense(id: &str, on: NaiveDate, category: &str, cents: i64) -> TransactionRecord {
        TransactionRecord::new(
            id,
            on,
            Money::from_cents(cents),
            TransactionKind::Expense,
            category,
            PaymentMethod::Card,
            "alex",
        )
    }

    fn sample() -> Vec<TransactionRecord> {
        vec![
            expense("1", date(2, 3), "Food", 3000),
            expense("2", date(2, 3), "Food", 2000),
            expense("3", date(2, 14), "Transport", 5000),
            expense("4", date(2, 20), "Fun", 1000),
            expense("5", date(1, 15), "Food", 4400),
            TransactionRecord::new(
                "6",
                date(2, 1),
                Money::from_cents(500000),
                TransactionKind::Income,
                "Salary",
                PaymentMethod::Card,
                "alex",
            ),
        ]
    }

    fn february() -> DateRange {
        DateRange::new(date(2, 1), date(2, 28)).unwrap()
    }

    #[test]
    fn test_generate_report() {
        let report = ReportsView::generate(
            &sample(),
            &FilterSpec::for_kind(TransactionKind::Expense),
            february(),
            2,
        );

        assert_eq!(report.record_count, 4);
        assert_eq!(report.category_count, 3);
        assert_eq!(report.top_categories.len(), 2);
        assert_eq!(report.top_categories[0].category, "Food");
        assert_eq!(report.top_categories[1].category, "Transport");

        assert_eq!(report.top_days[0].date, date(2, 3));
        assert_eq!(report.top_days[0].total.cents(), 5000);

        assert_eq!(report.total().cents(), 11000);
        // Previous 28 days: Jan 4 - Jan 31
        assert_eq!(report.metrics.previous_range.start(), date(1, 4));
        assert_eq!(report.metrics.previous_total.cents(), 4400);
        assert_eq!(report.metrics.delta.cents(), 6600);
        assert_eq!(report.metrics.percent, PercentChange::Defined(150.0));
    }

    #[test]
    fn test_filter_date_range_is_replaced() {
        let filter = FilterSpec {
            date_range: Some(DateRange::single_day(date(1, 15))),
            ..FilterSpec::for_kind(TransactionKind::Expense)
        };
        let report = ReportsView::generate(&sample(), &filter, february(), 5);
        assert_eq!(report.record_count, 4);
    }

    #[test]
    fn test_no_baseline() {
        let range = DateRange::new(date(1, 1), date(1, 31)).unwrap();
        let report = ReportsView::generate(
            &sample(),
            &FilterSpec::for_kind(TransactionKind::Expense),
            range,
            5,
        );
        assert_eq!(report.metrics.previous_total, Money::zero());
        assert_eq!(report.metrics.percent, PercentChange::NoBaseline);
    }

    #[test]
    fn test_empty_report() {
        let report = ReportsView::generate(&[], &FilterSpec::default(), february(), 5);
        assert!(report.top_categories.is_empty());
        assert!(report.top_days.is_empty());
        assert_eq!(report.metrics.percent, PercentChange::Defined(0.0));
    }

    #[test]
    fn test_csv_export() {
        let report = ReportsView::generate(
            &sample(),
            &FilterSpec::for_kind(TransactionKind::Expense),
            february(),
            1,
        );

        let mut out = Vec::new();
        report.export_csv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("Section,Key,Amount,Count,Percentage\n"));
        assert!(text.contains("category,Food,50.00,2,45.45\n"));
        assert!(text.contains("day,2025-02-03,50.00,2,45.45\n"));
        assert!(text.contains("change,,66.00,,150.00\n"));
    }
}
