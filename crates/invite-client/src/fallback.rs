//! Local stand-in for the endpoint when it cannot be reached.
//!
//! Records written here stay here; nothing is replayed to the endpoint once
//! it comes back.

use std::path::Path;

use invite::storage::file::JsonSlot;
use invite::{NewRsvp, Rsvp};
use tracing::debug;
use uuid::Uuid;

use crate::error::Result;

/// A JSON file with the same shape and ordering as the endpoint's listing.
#[derive(Debug, Clone)]
pub struct FallbackStore {
    slot: JsonSlot,
}

impl FallbackStore {
    /// Use the file at `path`, creating its directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            slot: JsonSlot::open(path)?,
        })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.slot.path()
    }

    /// Stored records, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn list(&self) -> Result<Vec<Rsvp>> {
        Ok(self.slot.load()?.into_records())
    }

    /// Store a submission locally.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn append(&self, submission: NewRsvp) -> Result<Rsvp> {
        let rsvp = Rsvp::new(submission);
        let stored = rsvp.clone();
        self.slot.update(|list| {
            list.insert(rsvp);
            Ok(())
        })?;
        debug!("Stored RSVP {} in {}", stored.id, self.path().display());
        Ok(stored)
    }

    /// Remove by position in the newest-first listing.
    ///
    /// # Errors
    ///
    /// Returns an error if `position` is out of range or the file cannot be
    /// written.
    pub fn remove_at(&self, position: i64) -> Result<Rsvp> {
        Ok(self.slot.update(|list| list.remove_at(position))?)
    }

    /// Remove by id.
    ///
    /// # Errors
    ///
    /// Returns an error if no record has `id` or the file cannot be written.
    pub fn remove(&self, id: Uuid) -> Result<Rsvp> {
        Ok(self.slot.update(|list| list.remove(id))?)
    }
}
