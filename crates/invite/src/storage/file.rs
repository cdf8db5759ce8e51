//! JSON-file RSVP store.
//!
//! A [`JsonSlot`] is a single file holding the newest-first array of RSVPs,
//! the on-disk equivalent of a browser local-storage key. [`FileStore`]
//! serves it to the endpoint; the client's offline fallback uses the slot
//! directly.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{Backend, RsvpList, RsvpStore};
use crate::error::{Error, Result};
use crate::model::{NewRsvp, Rsvp};

/// A JSON file holding one [`RsvpList`].
#[derive(Debug, Clone)]
pub struct JsonSlot {
    path: PathBuf,
}

impl JsonSlot {
    /// Point a slot at `path`, creating parent directories if needed.
    ///
    /// The file itself is created on first write.
    ///
    /// # Errors
    ///
    /// Returns an error if a parent directory cannot be created.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        Ok(Self { path })
    }

    /// Path to the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the list.
    ///
    /// A missing file reads as empty. So does a file that is not valid JSON;
    /// it is logged and will be overwritten by the next write.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn load(&self) -> Result<RsvpList> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(RsvpList::new()),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_slice::<Vec<Rsvp>>(&bytes) {
            Ok(records) => Ok(RsvpList::from_records(records)),
            Err(e) => {
                warn!(
                    "Failed to parse stored responses at {}: {}",
                    self.path.display(),
                    e
                );
                Ok(RsvpList::new())
            }
        }
    }

    /// Replace the file contents with `list`.
    ///
    /// Writes go to a sibling temp file that is then renamed over the slot,
    /// so a crash never leaves a half-written file behind.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, list: &RsvpList) -> Result<()> {
        let json = serde_json::to_vec_pretty(list)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        debug!("Wrote {} RSVPs to {}", list.len(), self.path.display());
        Ok(())
    }

    /// Load, apply `f`, and save if `f` succeeded.
    ///
    /// # Errors
    ///
    /// Returns the error from `f`, or an I/O error from load or save.
    pub fn update<T>(&self, f: impl FnOnce(&mut RsvpList) -> Result<T>) -> Result<T> {
        let mut list = self.load()?;
        let out = f(&mut list)?;
        self.save(&list)?;
        Ok(out)
    }
}

/// RSVPs persisted to a JSON file.
#[derive(Debug)]
pub struct FileStore {
    slot: Mutex<JsonSlot>,
}

impl FileStore {
    /// Open or create the store at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created or an
    /// existing file cannot be read.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let slot = JsonSlot::open(path)?;
        let existing = slot.load()?.len();
        info!(
            "RSVP file opened at {} ({} records)",
            slot.path().display(),
            existing
        );
        Ok(Self {
            slot: Mutex::new(slot),
        })
    }

    fn unavailable(err: Error) -> Error {
        match err {
            Error::Io(e) => Error::backend_unavailable(Backend::File, e.to_string()),
            Error::Json(e) => Error::backend_unavailable(Backend::File, e.to_string()),
            other => other,
        }
    }
}

#[async_trait]
impl RsvpStore for FileStore {
    fn backend(&self) -> Backend {
        Backend::File
    }

    async fn list(&self) -> Result<Vec<Rsvp>> {
        let slot = self.slot.lock().await;
        slot.load()
            .map(RsvpList::into_records)
            .map_err(Self::unavailable)
    }

    async fn append(&self, submission: NewRsvp) -> Result<Rsvp> {
        let record = Rsvp::new(submission);
        let slot = self.slot.lock().await;
        slot.update(|list| {
            list.insert(record.clone());
            Ok(())
        })
        .map_err(Self::unavailable)?;
        Ok(record)
    }

    async fn remove_at(&self, position: i64) -> Result<Rsvp> {
        let slot = self.slot.lock().await;
        slot.update(|list| list.remove_at(position))
            .map_err(Self::unavailable)
    }

    async fn remove(&self, id: Uuid) -> Result<Rsvp> {
        let slot = self.slot.lock().await;
        slot.update(|list| list.remove(id))
            .map_err(Self::unavailable)
    }
}
