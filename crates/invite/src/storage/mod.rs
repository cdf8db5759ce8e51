//! Storage layer for invite.
//!
//! Every backend implements [`RsvpStore`]: an ordered collection of RSVPs,
//! newest first, that can be listed, appended to, and pruned by position or
//! by id. The backend is picked once at startup from configuration.

pub mod file;
pub mod list;
pub mod memory;
pub mod sqlite;
pub mod supabase;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::config::Config;
use crate::error::Result;
use crate::model::{NewRsvp, Rsvp};

pub use file::FileStore;
pub use list::RsvpList;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use supabase::SupabaseStore;

/// Which technology holds the RSVP collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// In-process list, lost on restart.
    #[default]
    Memory,
    /// JSON file on local disk.
    File,
    /// `SQLite` database table.
    Sqlite,
    /// Hosted Postgres table reached over its REST interface.
    Supabase,
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Memory => write!(f, "memory"),
            Self::File => write!(f, "file"),
            Self::Sqlite => write!(f, "sqlite"),
            Self::Supabase => write!(f, "supabase"),
        }
    }
}

/// Contract shared by every storage backend.
///
/// Listing order is descending by `submitted_at`, ties broken by insertion
/// order (newest insertion first). Positional removal addresses exactly that
/// order. No backend isolates a caller's `list` from a later `remove_at`;
/// callers that need a race-free delete use [`RsvpStore::remove`].
#[async_trait]
pub trait RsvpStore: Send + Sync + std::fmt::Debug {
    /// The backend this store talks to.
    fn backend(&self) -> Backend;

    /// All records, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    async fn list(&self) -> Result<Vec<Rsvp>>;

    /// Store a submission, assigning its id and timestamp.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the write.
    async fn append(&self, submission: NewRsvp) -> Result<Rsvp>;

    /// Remove the record at `position` in the newest-first listing.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidPosition`] if `position` is negative or
    /// not less than the current length, or a backend error.
    async fn remove_at(&self, position: i64) -> Result<Rsvp>;

    /// Remove the record carrying `id`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NotFound`] if no such record exists, or a
    /// backend error.
    async fn remove(&self, id: Uuid) -> Result<Rsvp>;

    /// Summary counts over the current collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    async fn stats(&self) -> Result<StorageStats> {
        let records = self.list().await?;
        Ok(StorageStats::from_records(self.backend(), &records))
    }
}

/// Statistics about the stored RSVPs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorageStats {
    /// Backend holding the records.
    pub backend: Backend,
    /// Total number of RSVPs.
    pub total: usize,
    /// Number of guests attending.
    pub attending: usize,
    /// Number of guests declining.
    pub declined: usize,
    /// Timestamp of the newest RSVP.
    pub newest: Option<DateTime<Utc>>,
    /// Timestamp of the oldest RSVP.
    pub oldest: Option<DateTime<Utc>>,
}

impl StorageStats {
    /// Summarize a newest-first listing.
    #[must_use]
    pub fn from_records(backend: Backend, records: &[Rsvp]) -> Self {
        let attending = records.iter().filter(|r| r.is_attending()).count();
        Self {
            backend,
            total: records.len(),
            attending,
            declined: records.len() - attending,
            newest: records.first().map(|r| r.submitted_at),
            oldest: records.last().map(|r| r.submitted_at),
        }
    }
}

/// Open the store selected by `config.storage.backend`.
///
/// # Errors
///
/// Returns an error if the backend is misconfigured or cannot be opened.
pub fn open_store(config: &Config) -> Result<Arc<dyn RsvpStore>> {
    let store: Arc<dyn RsvpStore> = match config.storage.backend {
        Backend::Memory => Arc::new(MemoryStore::new()),
        Backend::File => Arc::new(FileStore::open(config.file_path())?),
        Backend::Sqlite => Arc::new(SqliteStore::open(config.database_path())?),
        Backend::Supabase => Arc::new(SupabaseStore::from_config(&config.storage.supabase)?),
    };
    info!("Using {} storage backend", store.backend());
    Ok(store)
}

/// Open the configured store for direct access from outside the server.
///
/// A memory store lives only inside the process that created it, so a
/// command run alongside `invited serve` would see a fresh, empty one.
///
/// # Errors
///
/// Returns [`crate::Error::BackendConfiguration`] for the memory backend,
/// otherwise as [`open_store`].
pub fn open_shared_store(config: &Config) -> Result<Arc<dyn RsvpStore>> {
    if config.storage.backend == Backend::Memory {
        return Err(crate::Error::backend_configuration(
            "the memory backend only exists inside a running server; \
             set storage.backend to file, sqlite or supabase, \
             or use rsvpctl against the endpoint",
        ));
    }
    open_store(config)
}

#[cfg(test)]
pub(crate) mod contract {
    //! Behaviour every backend must share, run against each implementation.

    use super::*;
    use crate::error::Error;
    use crate::model::Attending;

    fn submission(name: &str, attending: &str) -> NewRsvp {
        NewRsvp::from_fields(Some(name), Some(attending)).unwrap()
    }

    pub async fn append_then_list(store: &dyn RsvpStore) {
        let before = crate::model::now();
        let stored = store.append(submission("Ada Lovelace", "yes")).await.unwrap();

        let listed = store.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0], stored);
        assert_eq!(listed[0].attending, Attending::Yes);
        assert!(listed[0].submitted_at >= before);
    }

    pub async fn newest_first(store: &dyn RsvpStore) {
        for name in ["first", "second", "third"] {
            store.append(submission(name, "no")).await.unwrap();
        }

        let listed = store.list().await.unwrap();
        let names: Vec<_> = listed.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["third", "second", "first"]);
        assert!(listed
            .windows(2)
            .all(|pair| pair[0].submitted_at >= pair[1].submitted_at));
    }

    pub async fn remove_at_follows_listing(store: &dyn RsvpStore) {
        for name in ["a", "b", "c"] {
            store.append(submission(name, "yes")).await.unwrap();
        }

        let listed = store.list().await.unwrap();
        let removed = store.remove_at(1).await.unwrap();
        assert_eq!(removed, listed[1]);

        let after = store.list().await.unwrap();
        assert_eq!(after.len(), 2);
        assert_eq!(after[0], listed[0]);
        assert_eq!(after[1], listed[2]);
    }

    pub async fn remove_at_out_of_range(store: &dyn RsvpStore) {
        store.append(submission("a", "yes")).await.unwrap();
        store.append(submission("b", "no")).await.unwrap();

        for position in [-1, 2, 99] {
            let err = store.remove_at(position).await.unwrap_err();
            assert!(
                matches!(err, Error::InvalidPosition { len: 2, .. }),
                "unexpected error for {position}: {err}"
            );
        }
        assert_eq!(store.list().await.unwrap().len(), 2);
    }

    pub async fn remove_by_id(store: &dyn RsvpStore) {
        let keep = store.append(submission("keep", "yes")).await.unwrap();
        let drop = store.append(submission("drop", "no")).await.unwrap();

        let removed = store.remove(drop.id).await.unwrap();
        assert_eq!(removed, drop);
        assert_eq!(store.list().await.unwrap(), vec![keep]);

        let err = store.remove(drop.id).await.unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    pub async fn stats(store: &dyn RsvpStore) {
        store.append(submission("a", "yes")).await.unwrap();
        store.append(submission("b", "yes")).await.unwrap();
        store.append(submission("c", "no")).await.unwrap();

        let stats = store.stats().await.unwrap();
        assert_eq!(stats.backend, store.backend());
        assert_eq!(stats.total, 3);
        assert_eq!(stats.attending, 2);
        assert_eq!(stats.declined, 1);
        assert!(stats.newest >= stats.oldest);
    }
}
