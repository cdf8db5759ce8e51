//! Newest-first RSVP list shared by the list-backed stores.
//!
//! The memory store, the file store and the client's offline fallback all
//! keep their records in an [`RsvpList`], so they agree on ordering and on
//! what a position means.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::model::Rsvp;

/// An ordered collection of RSVPs, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RsvpList {
    records: Vec<Rsvp>,
}

impl RsvpList {
    /// Create an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from records in any order.
    ///
    /// Records are sorted newest first. The sort is stable, so records with
    /// equal timestamps keep their relative order.
    #[must_use]
    pub fn from_records(mut records: Vec<Rsvp>) -> Self {
        records.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Self { records }
    }

    /// The records, newest first.
    #[must_use]
    pub fn records(&self) -> &[Rsvp] {
        &self.records
    }

    /// Consume the list, returning its records newest first.
    #[must_use]
    pub fn into_records(self) -> Vec<Rsvp> {
        self.records
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the list holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Insert a record ahead of every record not newer than it.
    pub fn insert(&mut self, record: Rsvp) {
        let at = self
            .records
            .iter()
            .position(|r| r.submitted_at <= record.submitted_at)
            .unwrap_or(self.records.len());
        self.records.insert(at, record);
    }

    /// Remove the record at `position`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPosition`] if `position` is out of range.
    pub fn remove_at(&mut self, position: i64) -> Result<Rsvp> {
        let len = self.records.len();
        let index = usize::try_from(position)
            .ok()
            .filter(|&i| i < len)
            .ok_or(Error::InvalidPosition { position, len })?;
        Ok(self.records.remove(index))
    }

    /// Remove the record carrying `id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no record has that id.
    pub fn remove(&mut self, id: Uuid) -> Result<Rsvp> {
        let index = self
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| Error::NotFound { id: id.to_string() })?;
        Ok(self.records.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::model::{Attending, NewRsvp};

    fn record(name: &str) -> Rsvp {
        Rsvp::new(NewRsvp {
            name: name.to_string(),
            attending: Attending::Yes,
        })
    }

    #[test]
    fn test_insert_puts_newest_first() {
        let mut list = RsvpList::new();
        list.insert(record("a"));
        list.insert(record("b"));

        assert_eq!(list.records()[0].name, "b");
        assert_eq!(list.records()[1].name, "a");
    }

    #[test]
    fn test_insert_older_record_goes_behind() {
        let mut list = RsvpList::new();
        list.insert(record("new"));

        let mut old = record("old");
        old.submitted_at -= Duration::hours(1);
        list.insert(old);

        assert_eq!(list.records()[0].name, "new");
        assert_eq!(list.records()[1].name, "old");
    }

    #[test]
    fn test_from_records_sorts_descending() {
        let mut a = record("a");
        a.submitted_at -= Duration::minutes(5);
        let b = record("b");

        let list = RsvpList::from_records(vec![a, b]);
        assert_eq!(list.records()[0].name, "b");
    }

    #[test]
    fn test_remove_at() {
        let mut list = RsvpList::new();
        list.insert(record("a"));
        list.insert(record("b"));

        let removed = list.remove_at(0).unwrap();
        assert_eq!(removed.name, "b");
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_remove_at_out_of_range() {
        let mut list = RsvpList::new();
        list.insert(record("a"));

        assert!(matches!(
            list.remove_at(1),
            Err(Error::InvalidPosition { position: 1, len: 1 })
        ));
        assert!(matches!(
            list.remove_at(-1),
            Err(Error::InvalidPosition { position: -1, len: 1 })
        ));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_remove_by_id() {
        let mut list = RsvpList::new();
        let a = record("a");
        let id = a.id;
        list.insert(a);
        list.insert(record("b"));

        assert_eq!(list.remove(id).unwrap().name, "a");
        assert!(matches!(list.remove(id), Err(Error::NotFound { .. })));
    }

    #[test]
    fn test_serializes_as_array() {
        let mut list = RsvpList::new();
        list.insert(record("a"));

        let json = serde_json::to_value(&list).unwrap();
        assert!(json.is_array());

        let back: RsvpList = serde_json::from_value(json).unwrap();
        assert_eq!(back, list);
    }

    #[test]
    fn test_empty() {
        let list = RsvpList::new();
        assert!(list.is_empty());
        assert!(list.into_records().is_empty());
    }
}
