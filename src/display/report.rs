//! Terminal rendering of the reports view

use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::format::{format_share, share_bar, truncate};
use crate::analytics::{PercentChange, ReportsView};

const BAR_WIDTH: usize = 20;

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "#")]
    rank: usize,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Count")]
    count: usize,
    #[tabled(rename = "Share")]
    share: String,
    #[tabled(rename = "")]
    bar: String,
}

#[derive(Tabled)]
struct DayRow {
    #[tabled(rename = "#")]
    rank: usize,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Count")]
    count: usize,
    #[tabled(rename = "Share")]
    share: String,
}

impl ReportsView {
    /// Format the report for terminal display
    pub fn format_terminal(&self, symbol: &str) -> String {
        let mut output = String::new();
        let metrics = &self.metrics;

        output.push_str(&format!(
            "Report: {} to {}\n",
            self.range.start(),
            self.range.end()
        ));
        output.push_str(&"─".repeat(60));
        output.push('\n');
        output.push_str(&format!(
            "{:<18} {:>14}  ({} transactions)\n",
            "This period:",
            metrics.current_total.format_with_symbol(symbol),
            self.record_count
        ));
        output.push_str(&format!(
            "{:<18} {:>14}  ({} to {})\n",
            "Previous period:",
            metrics.previous_total.format_with_symbol(symbol),
            metrics.previous_range.start(),
            metrics.previous_range.end()
        ));

        let direction = match metrics.percent {
            PercentChange::NoBaseline => "",
            PercentChange::Defined(pct) if pct > 0.0 => " ▲",
            PercentChange::Defined(pct) if pct < 0.0 => " ▼",
            PercentChange::Defined(_) => "",
        };
        output.push_str(&format!(
            "{:<18} {:>14}  {}{}\n",
            "Change:",
            metrics.delta.format_with_symbol(symbol),
            metrics.percent,
            direction
        ));

        output.push_str(&format!(
            "\nTop Categories ({} of {})\n",
            self.top_categories.len(),
            self.category_count
        ));
        if self.top_categories.is_empty() {
            output.push_str("No transactions in this period.\n");
        } else {
            let max = self
                .top_categories
                .first()
                .map(|c| c.total)
                .unwrap_or_default();
            let rows = self
                .top_categories
                .iter()
                .enumerate()
                .map(|(i, c)| CategoryRow {
                    rank: i + 1,
                    category: truncate(&c.category, 24),
                    amount: c.total.format_with_symbol(symbol),
                    count: c.count,
                    share: format_share(c.percentage),
                    bar: share_bar(c.total, max, BAR_WIDTH),
                });
            output.push_str(&Table::new(rows).with(Style::rounded()).to_string());
            output.push('\n');
        }

        output.push_str(&format!("\nTop Days ({})\n", self.top_days.len()));
        if self.top_days.is_empty() {
            output.push_str("No transactions in this period.\n");
        } else {
            let rows = self.top_days.iter().enumerate().map(|(i, d)| DayRow {
                rank: i + 1,
                date: d.date.format("%a %Y-%m-%d").to_string(),
                amount: d.total.format_with_symbol(symbol),
                count: d.count,
                share: format_share(d.percentage),
            });
            output.push_str(&Table::new(rows).with(Style::rounded()).to_string());
            output.push('\n');
        }

        output
    }
}
