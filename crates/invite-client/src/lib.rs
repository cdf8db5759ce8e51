//! `invite_client` - blocking client for the invite RSVP endpoint
//!
//! [`RsvpClient`] wraps the three endpoint operations. When the endpoint
//! cannot be reached at all and an offline fallback is configured, the
//! operation is applied to a local [`FallbackStore`] instead and the result
//! is marked [`Source::Fallback`]. Error statuses from a reachable endpoint
//! are always returned as [`ClientError::Api`].

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod error;
pub mod fallback;

use std::time::Duration;

use invite::api::{
    DeleteRequest, DeleteResponse, ErrorBody, ListResponse, SubmitRequest, SubmitResponse,
    SUBMITTED,
};
use invite::model::MAX_NAME_LENGTH;
use invite::server::RESOURCE_PATH;
use invite::{Attending, Config, NewRsvp, Rsvp};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

pub use error::{ClientError, Result};
pub use fallback::FallbackStore;

/// Where a result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// The endpoint answered.
    Remote,
    /// The endpoint was unreachable; the local fallback answered.
    Fallback,
}

/// A result tagged with its [`Source`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome<T> {
    /// The result itself.
    pub value: T,
    /// Who produced it.
    pub source: Source,
}

impl<T> Outcome<T> {
    fn remote(value: T) -> Self {
        Self {
            value,
            source: Source::Remote,
        }
    }

    fn fallback(value: T) -> Self {
        Self {
            value,
            source: Source::Fallback,
        }
    }

    /// Whether the local fallback produced this result.
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.source == Source::Fallback
    }
}

/// Result of [`RsvpClient::submit_rsvp`].
pub type SubmitOutcome = Outcome<SubmitResponse>;

/// Client for the RSVP endpoint.
#[derive(Debug)]
pub struct RsvpClient {
    endpoint: String,
    agent: ureq::Agent,
    fallback: Option<FallbackStore>,
}

impl RsvpClient {
    /// Client for the endpoint hosted at `base_url`, without a fallback.
    #[must_use]
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            endpoint: format!("{}{RESOURCE_PATH}", base_url.trim_end_matches('/')),
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
            fallback: None,
        }
    }

    /// Client configured from `config.client`, with the fallback file when
    /// [`Config::fallback_enabled`] allows it.
    ///
    /// # Errors
    ///
    /// Returns an error if the fallback directory cannot be created.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = Self::new(&config.client.base_url, config.client_timeout());
        if config.fallback_enabled() {
            Ok(client.with_fallback(FallbackStore::open(config.fallback_path())?))
        } else {
            Ok(client)
        }
    }

    /// Use `store` when the endpoint is unreachable.
    #[must_use]
    pub fn with_fallback(mut self, store: FallbackStore) -> Self {
        self.fallback = Some(store);
        self
    }

    /// Full URL of the RSVP resource.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// The fallback store, if any.
    #[must_use]
    pub fn fallback(&self) -> Option<&FallbackStore> {
        self.fallback.as_ref()
    }

    /// All RSVPs, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Api`] for an error status, or
    /// [`ClientError::Transport`] when unreachable and no fallback is set.
    pub fn get_responses(&self) -> Result<Outcome<Vec<Rsvp>>> {
        let result =
            send::<ListResponse>(self.agent.get(&self.endpoint)).map(|body| body.responses);
        self.or_fallback("list", result, FallbackStore::list)
    }

    /// Submit a response.
    ///
    /// The name is trimmed and checked locally first: it must be non-empty
    /// and at most [`MAX_NAME_LENGTH`] characters.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Validation`] for a bad name, otherwise as
    /// [`RsvpClient::get_responses`].
    pub fn submit_rsvp(&self, name: &str, attending: Attending) -> Result<SubmitOutcome> {
        let submission = validate(name, attending)?;

        let body = SubmitRequest {
            name: Some(submission.name.clone()),
            attending: Some(attending.to_string()),
        };
        let result = send_json::<SubmitResponse>(self.agent.post(&self.endpoint), &body);

        self.or_fallback("submit", result, move |store| {
            let response = store.append(submission)?;
            Ok(SubmitResponse {
                success: true,
                message: SUBMITTED.to_string(),
                response,
            })
        })
    }

    /// Delete by position in the newest-first listing. Returns the
    /// endpoint's confirmation message.
    ///
    /// # Errors
    ///
    /// As [`RsvpClient::get_responses`].
    pub fn delete_rsvp(&self, index: i64) -> Result<Outcome<String>> {
        let body = DeleteRequest {
            index: Some(index),
            id: None,
        };
        self.delete(&body, |store| store.remove_at(index))
    }

    /// Delete by id. Returns the endpoint's confirmation message.
    ///
    /// # Errors
    ///
    /// As [`RsvpClient::get_responses`].
    pub fn delete_rsvp_by_id(&self, id: Uuid) -> Result<Outcome<String>> {
        let body = DeleteRequest {
            index: None,
            id: Some(id.to_string()),
        };
        self.delete(&body, |store| store.remove(id))
    }

    fn delete(
        &self,
        body: &DeleteRequest,
        local: impl FnOnce(&FallbackStore) -> Result<Rsvp>,
    ) -> Result<Outcome<String>> {
        let result = send_json::<DeleteResponse>(self.agent.delete(&self.endpoint), body)
            .map(|response| response.message);

        self.or_fallback("delete", result, |store| {
            let removed = local(store)?;
            Ok(DeleteResponse::for_removed(&removed).message)
        })
    }

    fn or_fallback<T>(
        &self,
        operation: &str,
        result: Result<T>,
        local: impl FnOnce(&FallbackStore) -> Result<T>,
    ) -> Result<Outcome<T>> {
        match (result, &self.fallback) {
            (Ok(value), _) => Ok(Outcome::remote(value)),
            (Err(ClientError::Transport(reason)), Some(store)) => {
                warn!(
                    "RSVP endpoint unreachable ({reason}), using {} for {operation}",
                    store.path().display()
                );
                local(store).map(Outcome::fallback)
            }
            (Err(e), _) => Err(e),
        }
    }
}

fn send<T: DeserializeOwned>(request: ureq::Request) -> Result<T> {
    debug!("{} {}", request.method(), request.url());
    read_response(request.call())
}

fn send_json<T: DeserializeOwned>(request: ureq::Request, body: &impl Serialize) -> Result<T> {
    debug!("{} {}", request.method(), request.url());
    read_response(request.send_json(body))
}

fn read_response<T: DeserializeOwned>(
    response: std::result::Result<ureq::Response, ureq::Error>,
) -> Result<T> {
    match response {
        Ok(r) => r
            .into_json::<T>()
            .map_err(|e| ClientError::Decode(e.to_string())),
        Err(ureq::Error::Status(status, r)) => {
            let message = r
                .into_json::<ErrorBody>()
                .map_or_else(|_| format!("HTTP error {status}"), |body| body.error);
            Err(ClientError::Api { status, message })
        }
        Err(ureq::Error::Transport(t)) => Err(ClientError::Transport(t.to_string())),
    }
}

fn validate(name: &str, attending: Attending) -> Result<NewRsvp> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ClientError::Validation("Name is required".to_string()));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ClientError::Validation(format!(
            "Name must be at most {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(NewRsvp {
        name: name.to_string(),
        attending,
    })
}
