//! Record filtering
//!
//! [`FilterSpec`] is a closed description of which records a view wants.
//! Every axis is conjunctive except free-text search, which matches if any of
//! category, notes or a tag contains the query.

use std::collections::BTreeSet;

use crate::models::{DateRange, PaymentMethod, TransactionKind, TransactionRecord};

/// Either every value, or exactly one
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection<T> {
    #[default]
    All,
    Only(T),
}

impl<T: PartialEq> Selection<T> {
    /// Whether `value` passes this selection
    pub fn accepts(&self, value: &T) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == value,
        }
    }
}

impl<T> From<Option<T>> for Selection<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Self::Only(v),
            None => Self::All,
        }
    }
}

/// Filter options for history and report views
#[derive(Debug, Clone, Default)]
pub struct FilterSpec {
    /// Inclusive date bounds
    pub date_range: Option<DateRange>,
    /// Exact category match
    pub category: Selection<String>,
    /// Exact payment method match
    pub payment_method: Selection<PaymentMethod>,
    /// Restrict to income or expense records
    pub kind: Option<TransactionKind>,
    /// Record must carry every one of these tags
    pub required_tags: BTreeSet<String>,
    /// Case-insensitive substring over category, notes and tags; blank matches all
    pub search: Option<String>,
    /// Keep soft-deleted records
    pub include_deleted: bool,
}

impl FilterSpec {
    /// A filter that keeps every live record of one kind
    pub fn for_kind(kind: TransactionKind) -> Self {
        Self {
            kind: Some(kind),
            ..Default::default()
        }
    }

    /// Same filter with a different date range
    pub fn with_date_range(&self, range: DateRange) -> Self {
        Self {
            date_range: Some(range),
            ..self.clone()
        }
    }

    /// Check if a record matches this filter
    pub fn matches(&self, record: &TransactionRecord) -> bool {
        if record.deleted && !self.include_deleted {
            return false;
        }

        if let Some(range) = self.date_range {
            if !range.contains(record.date) {
                return false;
            }
        }

        if let Some(kind) = self.kind {
            if record.kind != kind {
                return false;
            }
        }

        if !self.category.accepts(&record.category) {
            return false;
        }

        if !self.payment_method.accepts(&record.payment_method) {
            return false;
        }

        if !self.required_tags.iter().all(|tag| record.has_tag(tag)) {
            return false;
        }

        match self.search.as_deref() {
            Some(query) if !query.trim().is_empty() => matches_search(record, query),
            _ => true,
        }
    }

    /// Copy out the matching records, leaving the input untouched
    pub fn apply(&self, records: &[TransactionRecord]) -> Vec<TransactionRecord> {
        records
            .iter()
            .filter(|record| self.matches(record))
            .cloned()
            .collect()
    }
}

fn matches_search(record: &TransactionRecord, query: &str) -> bool {
    let needle = query.to_lowercase();
    let hit = |haystack: &str| haystack.to_lowercase().contains(&needle);

    hit(&record.category)
        || record.notes.as_deref().is_some_and(hit)
        || record.tags.iter().any(|tag| hit(tag))
}
