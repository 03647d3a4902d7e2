//! Pocketbook - household transaction analytics
//!
//! Turns a flat list of income and expense records into the views a
//! household finance tool shows: filtered history grouped into day, week,
//! month or year buckets with running balances, top-N category and day
//! rankings, and a comparison against the preceding period.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Transaction records, money and date ranges
//! - `analytics`: Stateless filtering, bucketing, balances, rankings and comparison
//! - `export`: CSV exchange format for transaction records
//! - `display`: Terminal rendering of the history and reports views
//! - `cli`: Command handlers for the `pocketbook` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use pocketbook::analytics::{FilterSpec, Granularity, HistoryView};
//! use pocketbook::export::load_records;
//!
//! let records = load_records(path)?;
//! let view = HistoryView::generate(&records, &FilterSpec::default(), Granularity::Month);
//! println!("{}", view.total());
//! ```

pub mod analytics;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;

pub use error::{PocketbookError, PocketbookResult};
