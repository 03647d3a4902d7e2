//! Date bucketing
//!
//! Maps calendar dates to day/week/month/year bucket keys and renders their
//! labels. Weeks follow ISO-8601: Monday-start, and a week belongs to the year
//! that contains its Thursday. Dates are timezone-less throughout.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{PocketbookError, PocketbookResult};
use crate::models::parse_date;

/// Long-form date used in labels ("January 15, 2025")
const LONG_DATE_FORMAT: &str = "%B %-d, %Y";

/// Width of a time bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    Week,
    #[default]
    Month,
    Year,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "day" | "daily" => Ok(Self::Day),
            "week" | "weekly" => Ok(Self::Week),
            "month" | "monthly" => Ok(Self::Month),
            "year" | "yearly" => Ok(Self::Year),
            other => Err(format!(
                "unknown granularity '{}' (expected day, week, month or year)",
                other
            )),
        }
    }
}

/// Identifier of one time bucket
///
/// Renders as `YYYY-MM-DD`, `YYYY-Www`, `YYYY-MM` or `YYYY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BucketKey {
    Day(NaiveDate),
    Week { year: i32, week: u32 },
    Month { year: i32, month: u32 },
    Year(i32),
}

impl BucketKey {
    /// The granularity this key was built for
    pub fn granularity(&self) -> Granularity {
        match self {
            Self::Day(_) => Granularity::Day,
            Self::Week { .. } => Granularity::Week,
            Self::Month { .. } => Granularity::Month,
            Self::Year(_) => Granularity::Year,
        }
    }

    /// Human-readable label for the bucket
    pub fn label(&self) -> String {
        match *self {
            Self::Day(date) => date.format(LONG_DATE_FORMAT).to_string(),
            Self::Week { year, week } => match iso_week_monday(year, week) {
                Some(monday) => format!("Week of {}", monday.format(LONG_DATE_FORMAT)),
                None => self.to_string(),
            },
            Self::Month { year, month } => match NaiveDate::from_ymd_opt(year, month, 1) {
                Some(first) => first.format("%B %Y").to_string(),
                None => self.to_string(),
            },
            Self::Year(year) => year.to_string(),
        }
    }

    /// Parse a key string produced by `Display` for the given granularity
    pub fn parse(s: &str, granularity: Granularity) -> PocketbookResult<Self> {
        let s = s.trim();
        let invalid = || {
            PocketbookError::Validation(format!("Invalid {} bucket key: '{}'", granularity, s))
        };

        match granularity {
            Granularity::Day => parse_date(s).map(Self::Day).map_err(|_| invalid()),
            Granularity::Week => {
                let (year, week) = s.split_once("-W").ok_or_else(invalid)?;
                let year = parse_year(year).ok_or_else(invalid)?;
                if week.len() != 2 {
                    return Err(invalid());
                }
                let week: u32 = week.parse().map_err(|_| invalid())?;
                if week == 0 || week > weeks_in_year(year) {
                    return Err(invalid());
                }
                Ok(Self::Week { year, week })
            }
            Granularity::Month => {
                let (year, month) = s.split_once('-').ok_or_else(invalid)?;
                let year = parse_year(year).ok_or_else(invalid)?;
                if month.len() != 2 {
                    return Err(invalid());
                }
                let month: u32 = month.parse().map_err(|_| invalid())?;
                if !(1..=12).contains(&month) {
                    return Err(invalid());
                }
                Ok(Self::Month { year, month })
            }
            Granularity::Year => parse_year(s).map(Self::Year).ok_or_else(invalid),
        }
    }
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Day(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            Self::Week { year, week } => write!(f, "{:04}-W{:02}", year, week),
            Self::Month { year, month } => write!(f, "{:04}-{:02}", year, month),
            Self::Year(year) => write!(f, "{:04}", year),
        }
    }
}

fn parse_year(s: &str) -> Option<i32> {
    if s.len() != 4 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Bucket key for a date at the given granularity
pub fn bucket_key(date: NaiveDate, granularity: Granularity) -> BucketKey {
    match granularity {
        Granularity::Day => BucketKey::Day(date),
        Granularity::Week => {
            let (year, week) = iso_week(date);
            BucketKey::Week { year, week }
        }
        Granularity::Month => BucketKey::Month {
            year: date.year(),
            month: date.month(),
        },
        Granularity::Year => BucketKey::Year(date.year()),
    }
}

/// Label for a bucket key string; malformed keys are rejected
pub fn bucket_label(key: &str, granularity: Granularity) -> PocketbookResult<String> {
    BucketKey::parse(key, granularity).map(|k| k.label())
}

/// ISO-8601 `(week-year, week)` for a date
///
/// Shift to the Thursday of the date's Monday-start week; that Thursday's
/// year is the week-year and `ceil(ordinal / 7)` is the week number.
pub fn iso_week(date: NaiveDate) -> (i32, u32) {
    let offset = 3 - i64::from(date.weekday().num_days_from_monday());
    let thursday = date + Duration::days(offset);
    (thursday.year(), thursday.ordinal().div_ceil(7))
}

/// Monday that starts ISO week `week` of `year`
///
/// Rebuilt from Jan 1: week 1 is the Monday-start week holding Jan 1 when Jan 1
/// falls on Monday..Thursday, otherwise the following week.
pub fn iso_week_monday(year: i32, week: u32) -> Option<NaiveDate> {
    let jan_1 = NaiveDate::from_ymd_opt(year, 1, 1)?;
    let weekday = i64::from(jan_1.weekday().num_days_from_monday());
    let mut week_one = jan_1 - Duration::days(weekday);
    if weekday > 3 {
        week_one += Duration::days(7);
    }
    Some(week_one + Duration::weeks(i64::from(week) - 1))
}

/// Number of ISO weeks (52 or 53) in a week-year
pub fn weeks_in_year(year: i32) -> u32 {
    // Dec 28 always lies in the last ISO week of its year
    NaiveDate::from_ymd_opt(year, 12, 28)
        .map(|d| iso_week(d).1)
        .unwrap_or(52)
}
