//! JSON bodies exchanged with the RSVP endpoint.
//!
//! Shared by the server and the client wrapper so both sides agree on the
//! wire shape.

use serde::{Deserialize, Serialize};

use crate::model::Rsvp;

/// Message on a successful submission.
pub const SUBMITTED: &str = "RSVP submitted successfully";

/// `400` body for a positional delete outside the listing.
pub const INVALID_INDEX: &str = "Invalid RSVP index";

/// `400` body for a delete by an id nobody carries.
pub const NOT_FOUND: &str = "RSVP not found";

/// `405` body.
pub const METHOD_NOT_ALLOWED: &str = "Method not allowed";

/// `GET` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListResponse {
    /// All RSVPs, newest first.
    pub responses: Vec<Rsvp>,
}

/// `POST` request body. Both fields are optional on the wire so a missing
/// one can be reported as a validation error rather than a parse error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitRequest {
    /// Guest name.
    pub name: Option<String>,
    /// `"yes"` or `"no"`.
    pub attending: Option<String>,
}

/// `POST` success body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitResponse {
    /// Always `true`.
    pub success: bool,
    /// Human-readable confirmation.
    pub message: String,
    /// The stored record.
    pub response: Rsvp,
}

/// `DELETE` request body. `id` takes precedence over `index`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteRequest {
    /// Position in the newest-first listing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<i64>,
    /// Stable record id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// `DELETE` success body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResponse {
    /// Always `true`.
    pub success: bool,
    /// Human-readable confirmation naming the guest.
    pub message: String,
}

impl DeleteResponse {
    /// Confirmation for removing `rsvp`.
    #[must_use]
    pub fn for_removed(rsvp: &Rsvp) -> Self {
        Self {
            success: true,
            message: format!("RSVP for {} deleted successfully", rsvp.name),
        }
    }
}

/// Body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable error.
    pub error: String,
}
