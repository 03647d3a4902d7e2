//! Cell formatting shared by the terminal views

use crate::models::Money;

/// Share of a total: one decimal below 10%, whole percent from there up
pub fn format_share(pct: f64) -> String {
    let decimals = if pct < 10.0 { 1 } else { 0 };
    format!("{:.*}%", decimals, pct)
}

/// Bar of `width` cells, scaled so that `max` fills it
pub fn share_bar(value: Money, max: Money, width: usize) -> String {
    let filled = if value.is_positive() && max.is_positive() {
        let scaled = (i128::from(value.cents()) * width as i128 + i128::from(max.cents()) / 2)
            / i128::from(max.cents());
        usize::try_from(scaled).unwrap_or(width).min(width)
    } else {
        0
    };

    let mut bar = "█".repeat(filled);
    bar.push_str(&"░".repeat(width - filled));
    bar
}

/// Truncate to at most `max_len` characters, marking the cut with "..."
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        ".".repeat(max_len)
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    }
}
