//! `SQLite`-backed RSVP store.
//!
//! The relational backend: one `rsvps` table, versioned through
//! `PRAGMA user_version`. Positional deletes run their lookup and delete inside
//! one transaction.

pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use super::{Backend, RsvpStore};
use crate::error::{Error, Result};
use crate::model::{Attending, NewRsvp, Rsvp};
use schema::{LISTING_ORDER, RSVP_COLUMNS};

/// RSVPs stored in a `SQLite` database.
#[derive(Debug)]
pub struct SqliteStore {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist
    /// and brings the schema up to date.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
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

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        migrations::initialize_schema(&conn)?;

        info!("Database opened successfully at {}", path.display());
        Ok(Self {
            path,
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory database, mainly for tests.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn: Mutex::new(conn),
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Convert a database row to an RSVP.
    fn row_to_rsvp(row: &rusqlite::Row) -> rusqlite::Result<Rsvp> {
        let id: String = row.get(0)?;
        let name: String = row.get(1)?;
        let attending: String = row.get(2)?;
        let submitted_at: String = row.get(3)?;

        let id = Uuid::parse_str(&id)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))?;

        let attending = match attending.as_str() {
            "yes" => Attending::Yes,
            "no" => Attending::No,
            _ => {
                return Err(rusqlite::Error::InvalidColumnType(
                    2,
                    "attending".to_string(),
                    Type::Text,
                ))
            }
        };

        let submitted_at = DateTime::parse_from_rfc3339(&submitted_at)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?;

        Ok(Rsvp {
            id,
            name,
            attending,
            submitted_at,
        })
    }

    fn timestamp(at: DateTime<Utc>) -> String {
        at.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

#[async_trait]
impl RsvpStore for SqliteStore {
    fn backend(&self) -> Backend {
        Backend::Sqlite
    }

    async fn list(&self) -> Result<Vec<Rsvp>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(&format!(
            "SELECT {RSVP_COLUMNS} FROM rsvps {LISTING_ORDER}"
        ))?;

        let records = stmt
            .query_map([], Self::row_to_rsvp)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(records)
    }

    async fn append(&self, submission: NewRsvp) -> Result<Rsvp> {
        let record = Rsvp::new(submission);
        let conn = self.conn.lock().await;

        conn.execute(
            r"
            INSERT INTO rsvps (id, name, attending, submitted_at)
            VALUES (?1, ?2, ?3, ?4)
            ",
            params![
                record.id.to_string(),
                record.name,
                record.attending.to_string(),
                Self::timestamp(record.submitted_at),
            ],
        )?;

        debug!(
            "Inserted RSVP {} as row {}",
            record.id,
            conn.last_insert_rowid()
        );
        Ok(record)
    }

    async fn remove_at(&self, position: i64) -> Result<Rsvp> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;

        let target = if position < 0 {
            None
        } else {
            tx.query_row(
                &format!("SELECT {RSVP_COLUMNS} FROM rsvps {LISTING_ORDER} LIMIT 1 OFFSET ?1"),
                [position],
                Self::row_to_rsvp,
            )
            .optional()?
        };

        let Some(record) = target else {
            let len: i64 = tx.query_row("SELECT COUNT(*) FROM rsvps", [], |row| row.get(0))?;
            return Err(Error::InvalidPosition {
                position,
                len: usize::try_from(len).unwrap_or_default(),
            });
        };

        tx.execute("DELETE FROM rsvps WHERE id = ?1", [record.id.to_string()])?;
        tx.commit()?;

        debug!("Deleted RSVP {} at position {}", record.id, position);
        Ok(record)
    }

    async fn remove(&self, id: Uuid) -> Result<Rsvp> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;

        let record = tx
            .query_row(
                &format!("SELECT {RSVP_COLUMNS} FROM rsvps WHERE id = ?1"),
                [id.to_string()],
                Self::row_to_rsvp,
            )
            .optional()?
            .ok_or_else(|| Error::NotFound { id: id.to_string() })?;

        tx.execute("DELETE FROM rsvps WHERE id = ?1", [id.to_string()])?;
        tx.commit()?;

        debug!("Deleted RSVP {}", id);
        Ok(record)
    }
}
