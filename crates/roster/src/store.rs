//! In-memory record store.
//!
//! The store exclusively owns the ordered collection of records for the
//! lifetime of a session. Order is insertion order; edits replace records
//! in place so they keep their position.

use tracing::debug;

use crate::error::{Error, Result};
use crate::record::{Record, RecordFields, RecordId};

/// Ordered, owned collection of records.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<Record>,
}

impl RecordStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record under a freshly minted id and return that id.
    pub fn add(&mut self, fields: RecordFields) -> RecordId {
        let mut id = RecordId::new();
        // Ids stay unique even on a v4 collision.
        while self.contains(id) {
            id = RecordId::new();
        }
        self.records.push(Record::from_fields(id, fields));
        debug!(%id, len = self.records.len(), "Record added");
        id
    }

    #[cfg(test)]
    pub(crate) fn insert_with_id(&mut self, id: RecordId, fields: RecordFields) {
        self.records.push(Record::from_fields(id, fields));
    }

    /// Overwrite every field of the record with the given id, in place.
    ///
    /// Returns `false` and leaves the collection untouched when no record
    /// carries `id`.
    pub fn replace(&mut self, id: RecordId, fields: RecordFields) -> bool {
        match self.records.iter_mut().find(|record| record.id == id) {
            Some(record) => {
                record.assign(fields);
                debug!(%id, "Record replaced");
                true
            }
            None => {
                debug!(%id, "Replace skipped, record not found");
                false
            }
        }
    }

    /// Delete the record with the given id, returning it.
    ///
    /// Returns `None` when no record carries `id`; calling this twice is
    /// harmless.
    pub fn remove(&mut self, id: RecordId) -> Option<Record> {
        let index = self.records.iter().position(|record| record.id == id)?;
        let removed = self.records.remove(index);
        debug!(%id, len = self.records.len(), "Record removed");
        Some(removed)
    }

    /// Read-only snapshot of the collection in order.
    #[must_use]
    pub fn list(&self) -> &[Record] {
        &self.records
    }

    /// Look up a record by id.
    #[must_use]
    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.records.iter().find(|record| record.id == id)
    }

    /// Check whether a record with this id exists.
    #[must_use]
    pub fn contains(&self, id: RecordId) -> bool {
        self.get(id).is_some()
    }

    /// Find the single record whose id starts with `prefix`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownReference`] when nothing matches and
    /// [`Error::AmbiguousReference`] when more than one record matches.
    pub fn find_by_prefix(&self, prefix: &str) -> Result<&Record> {
        let mut matches = self
            .records
            .iter()
            .filter(|record| record.id.matches_prefix(prefix));

        let first = matches
            .next()
            .ok_or_else(|| Error::UnknownReference(prefix.to_string()))?;
        if matches.next().is_some() {
            return Err(Error::AmbiguousReference(prefix.to_string()));
        }
        Ok(first)
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
