//! Hosted Postgres RSVP store, reached through its REST (`PostgREST`) API.
//!
//! Expects a table shaped like:
//!
//! ```sql
//! create table rsvps (
//!     seq bigserial unique,
//!     id uuid primary key,
//!     name text not null,
//!     attending text not null check (attending in ('yes', 'no')),
//!     submitted_at timestamptz not null
//! );
//! ```
//!
//! `seq` is filled by the database and only used to order RSVPs that share
//! a `submitted_at`.
//!
//! Requests are blocking `ureq` calls moved onto tokio's blocking pool.
//! Positional deletes list and then delete by id; the two calls are not
//! atomic.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use super::{Backend, RsvpStore};
use crate::config::SupabaseConfig;
use crate::error::{Error, Result};
use crate::model::{Attending, NewRsvp, Rsvp};

const SELECT_COLUMNS: &str = "id,name,attending,submitted_at";

/// Newest first; later inserts win ties.
const LISTING_ORDER: &str = "submitted_at.desc,seq.desc";

/// One row of the remote table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Row {
    id: Uuid,
    name: String,
    attending: Attending,
    submitted_at: DateTime<Utc>,
}

impl From<Rsvp> for Row {
    fn from(r: Rsvp) -> Self {
        Self {
            id: r.id,
            name: r.name,
            attending: r.attending,
            submitted_at: r.submitted_at,
        }
    }
}

impl From<Row> for Rsvp {
    fn from(r: Row) -> Self {
        Self {
            id: r.id,
            name: r.name,
            attending: r.attending,
            submitted_at: r.submitted_at,
        }
    }
}

/// Blocking REST client for one table.
struct Rest {
    table_url: String,
    service_key: String,
    agent: ureq::Agent,
}

impl std::fmt::Debug for Rest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rest")
            .field("table_url", &self.table_url)
            .finish_non_exhaustive()
    }
}

impl Rest {
    fn request(&self, method: &str) -> ureq::Request {
        self.agent
            .request(method, &self.table_url)
            .set("apikey", &self.service_key)
            .set("Authorization", &format!("Bearer {}", self.service_key))
            .set("Accept", "application/json")
    }

    fn rows(result: std::result::Result<ureq::Response, ureq::Error>) -> Result<Vec<Row>> {
        match result {
            Ok(resp) => resp
                .into_json::<Vec<Row>>()
                .map_err(|e| unavailable(format!("unreadable response: {e}"))),
            Err(ureq::Error::Status(code, resp)) => {
                let body = resp.into_string().unwrap_or_default();
                Err(unavailable(format!("HTTP {code}: {body}")))
            }
            Err(e) => Err(unavailable(e.to_string())),
        }
    }

    fn list(&self) -> Result<Vec<Rsvp>> {
        let result = self
            .request("GET")
            .query("select", SELECT_COLUMNS)
            .query("order", LISTING_ORDER)
            .call();
        Ok(Self::rows(result)?.into_iter().map(Rsvp::from).collect())
    }

    fn insert(&self, record: Rsvp) -> Result<Rsvp> {
        let result = self
            .request("POST")
            .set("Prefer", "return=representation")
            .send_json([Row::from(record)]);
        Self::rows(result)?
            .into_iter()
            .next()
            .map(Rsvp::from)
            .ok_or_else(|| unavailable("insert returned no rows"))
    }

    fn delete(&self, id: Uuid) -> Result<Rsvp> {
        let result = self
            .request("DELETE")
            .query("id", &format!("eq.{id}"))
            .set("Prefer", "return=representation")
            .call();
        Self::rows(result)?
            .into_iter()
            .next()
            .map(Rsvp::from)
            .ok_or_else(|| Error::NotFound { id: id.to_string() })
    }

    fn delete_at(&self, position: i64) -> Result<Rsvp> {
        let records = self.list()?;
        let len = records.len();
        let target = usize::try_from(position)
            .ok()
            .and_then(|i| records.into_iter().nth(i))
            .ok_or(Error::InvalidPosition { position, len })?;
        self.delete(target.id)
    }
}

fn unavailable(message: impl Into<String>) -> Error {
    Error::backend_unavailable(Backend::Supabase, message)
}

/// RSVPs stored in a hosted Postgres table.
#[derive(Debug, Clone)]
pub struct SupabaseStore {
    rest: Arc<Rest>,
}

impl SupabaseStore {
    /// Build a store from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BackendConfiguration`] if the project URL or the
    /// service role key is missing.
    pub fn from_config(config: &SupabaseConfig) -> Result<Self> {
        let url = config
            .url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| Error::backend_configuration("SUPABASE_URL is not set"))?;
        let service_key = config
            .service_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| Error::backend_configuration("SUPABASE_SERVICE_ROLE_KEY is not set"))?;

        let table_url = format!("{}/rest/v1/{}", url.trim_end_matches('/'), config.table);
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build();

        debug!("Supabase table endpoint is {}", table_url);
        Ok(Self {
            rest: Arc::new(Rest {
                table_url,
                service_key: service_key.to_string(),
                agent,
            }),
        })
    }

    /// The REST endpoint for the RSVP table.
    #[must_use]
    pub fn table_url(&self) -> &str {
        &self.rest.table_url
    }

    async fn blocking<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Rest) -> Result<T> + Send + 'static,
    {
        let rest = Arc::clone(&self.rest);
        tokio::task::spawn_blocking(move || f(&rest))
            .await
            .map_err(|e| Error::internal(format!("supabase request task failed: {e}")))?
    }
}

#[async_trait]
impl RsvpStore for SupabaseStore {
    fn backend(&self) -> Backend {
        Backend::Supabase
    }

    async fn list(&self) -> Result<Vec<Rsvp>> {
        self.blocking(Rest::list).await
    }

    async fn append(&self, submission: NewRsvp) -> Result<Rsvp> {
        let record = Rsvp::new(submission);
        self.blocking(move |rest| rest.insert(record)).await
    }

    async fn remove_at(&self, position: i64) -> Result<Rsvp> {
        self.blocking(move |rest| rest.delete_at(position)).await
    }

    async fn remove(&self, id: Uuid) -> Result<Rsvp> {
        self.blocking(move |rest| rest.delete(id)).await
    }
}
