//! Transaction record model
//!
//! A record carries a non-negative magnitude; whether it is money in or out
//! is carried by its [`TransactionKind`], never by the sign of the amount.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use super::ids::{CreatorId, RecordId};
use super::money::Money;

/// Direction of the cash flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    /// +1 for income, -1 for expense
    pub fn sign(&self) -> i64 {
        match self {
            Self::Income => 1,
            Self::Expense => -1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(format!("unknown transaction kind '{}'", other)),
        }
    }
}

/// How the transaction was paid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Card,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Card => "card",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cash" => Ok(Self::Cash),
            "card" => Ok(Self::Card),
            other => Err(format!("unknown payment method '{}'", other)),
        }
    }
}

/// A single household transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Unique identifier
    pub id: RecordId,

    /// Calendar date, no time component
    pub date: NaiveDate,

    /// Non-negative magnitude
    pub amount: Money,

    pub kind: TransactionKind,

    /// Free-form, user-defined category
    pub category: String,

    pub payment_method: PaymentMethod,

    #[serde(default)]
    pub notes: Option<String>,

    /// Case-sensitive tag set
    #[serde(default)]
    pub tags: BTreeSet<String>,

    /// Who entered the record
    pub creator: CreatorId,

    /// When the record was created; tie-breaks same-day ordering
    pub created_at: DateTime<Utc>,

    /// When the record was last modified
    pub updated_at: DateTime<Utc>,

    /// Soft-delete flag
    #[serde(default)]
    pub deleted: bool,
}

impl TransactionRecord {
    /// Create a new record stamped with the current time
    pub fn new(
        id: impl Into<RecordId>,
        date: NaiveDate,
        amount: Money,
        kind: TransactionKind,
        category: impl Into<String>,
        payment_method: PaymentMethod,
        creator: impl Into<CreatorId>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            date,
            amount,
            kind,
            category: category.into(),
            payment_method,
            notes: None,
            tags: BTreeSet::new(),
            creator: creator.into(),
            created_at: now,
            updated_at: now,
            deleted: false,
        }
    }

    /// Builder-style notes setter
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Builder-style tag setter
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Builder-style creation timestamp setter
    pub fn created(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = at;
        self.updated_at = at;
        self
    }

    /// Contribution to a total that combines income and expense
    pub fn signed_amount(&self) -> Money {
        Money::from_cents(self.amount.cents().saturating_mul(self.kind.sign()))
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// Mark the record as soft-deleted
    pub fn soft_delete(&mut self) {
        self.deleted = true;
        self.updated_at = Utc::now();
    }
}

impl fmt::Display for TransactionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.date.format("%Y-%m-%d"),
            self.category,
            self.kind,
            self.amount
        )
    }
}
