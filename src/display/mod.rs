//! Display formatting for terminal output
//!
//! Renders the history and reports views as text tables. Expansion state for
//! history buckets lives here, never in the analytics core.

pub mod format;
pub mod history;
pub mod report;

pub use history::ExpandedBuckets;
