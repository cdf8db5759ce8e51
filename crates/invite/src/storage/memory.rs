//! In-process RSVP store. Contents are lost when the process exits.

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::{Backend, RsvpList, RsvpStore};
use crate::error::Result;
use crate::model::{NewRsvp, Rsvp};

/// RSVPs held in memory behind a lock.
#[derive(Debug, Default)]
pub struct MemoryStore {
    list: RwLock<RsvpList>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RsvpStore for MemoryStore {
    fn backend(&self) -> Backend {
        Backend::Memory
    }

    async fn list(&self) -> Result<Vec<Rsvp>> {
        Ok(self.list.read().await.records().to_vec())
    }

    async fn append(&self, submission: NewRsvp) -> Result<Rsvp> {
        let record = Rsvp::new(submission);
        self.list.write().await.insert(record.clone());
        debug!("Stored RSVP {} in memory", record.id);
        Ok(record)
    }

    async fn remove_at(&self, position: i64) -> Result<Rsvp> {
        self.list.write().await.remove_at(position)
    }

    async fn remove(&self, id: Uuid) -> Result<Rsvp> {
        self.list.write().await.remove(id)
    }
}
