//! View filter for the displayed record list.
//!
//! The filter derives the visible subset of the store from a free-text search
//! term and an optional exact group. It keeps no memory of earlier results:
//! every call recomputes from the collection it is given.

use serde::Serialize;
use tracing::trace;

use crate::record::{Group, Record};

/// Search term plus group selector.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ViewFilter {
    search: String,
    group: Option<Group>,
}

impl ViewFilter {
    /// Create a filter that passes everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style search term.
    #[must_use]
    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.set_search(term);
        self
    }

    /// Builder-style group selector.
    #[must_use]
    pub fn with_group(mut self, group: Option<Group>) -> Self {
        self.group = group;
        self
    }

    /// Current search term as typed.
    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Current group selector; `None` means "All".
    #[must_use]
    pub fn group(&self) -> Option<Group> {
        self.group
    }

    /// Replace the search term.
    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    /// Replace the group selector.
    pub fn set_group(&mut self, group: Option<Group>) {
        self.group = group;
    }

    /// Reset both predicates.
    pub fn clear(&mut self) {
        self.search.clear();
        self.group = None;
    }

    /// Check whether either predicate narrows the view.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.search.is_empty() || self.group.is_some()
    }

    /// Check a single record against both predicates.
    #[must_use]
    pub fn matches(&self, record: &Record) -> bool {
        self.matches_group(record) && search_hits(record, &self.search.to_lowercase())
    }

    /// Return the passing records in collection order.
    #[must_use]
    pub fn apply<'a>(&self, records: &'a [Record]) -> Vec<&'a Record> {
        let needle = self.search.to_lowercase();
        let visible: Vec<&Record> = records
            .iter()
            .filter(|record| self.matches_group(record) && search_hits(record, &needle))
            .collect();
        trace!(
            total = records.len(),
            visible = visible.len(),
            search = %self.search,
            "View filter applied"
        );
        visible
    }

    fn matches_group(&self, record: &Record) -> bool {
        self.group.map_or(true, |group| group == record.group)
    }
}

/// `needle` must already be lower-cased.
fn search_hits(record: &Record, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    [
        record.first_name.as_str(),
        record.last_name.as_str(),
        record.contact.as_str(),
        record.group.as_str(),
    ]
    .into_iter()
    .chain(record.group.legacy_name())
    .any(|field| field.to_lowercase().contains(needle))
}
