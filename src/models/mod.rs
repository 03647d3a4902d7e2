//! Core data models for Pocketbook
//!
//! Plain data consumed by the analytics engine: transaction records, their
//! identifiers, money amounts and inclusive date ranges.

pub mod date_range;
pub mod ids;
pub mod money;
pub mod transaction;

pub use date_range::{parse_date, DateRange};
pub use ids::{CreatorId, RecordId};
pub use money::Money;
pub use transaction::{PaymentMethod, TransactionKind, TransactionRecord};
