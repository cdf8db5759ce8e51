//! Core RSVP types for invite.
//!
//! An [`Rsvp`] is one guest's answer: who they are, whether they are coming,
//! and when they said so. Records are immutable once created.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Message returned when a submission lacks a name or attendance choice.
pub const MISSING_FIELDS: &str = "Missing required fields";

/// Message returned when `attending` is present but not `yes` or `no`.
pub const INVALID_ATTENDING: &str = "Invalid attending value";

/// Longest guest name the client wrapper accepts.
pub const MAX_NAME_LENGTH: usize = 100;

/// A guest's attendance choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attending {
    /// The guest will attend.
    Yes,
    /// The guest will not attend.
    No,
}

impl Attending {
    /// Human-readable form used in notifications.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
        }
    }
}

impl std::fmt::Display for Attending {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Yes => write!(f, "yes"),
            Self::No => write!(f, "no"),
        }
    }
}

impl std::str::FromStr for Attending {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "yes" => Ok(Self::Yes),
            "no" => Ok(Self::No),
            _ => Err(Error::validation(INVALID_ATTENDING)),
        }
    }
}

/// A validated submission that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRsvp {
    /// Guest name, trimmed and non-empty.
    pub name: String,
    /// Attendance choice.
    pub attending: Attending,
}

impl NewRsvp {
    /// Validate raw request fields.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] with [`MISSING_FIELDS`] when the name is
    /// absent or blank or `attending` is absent, and with
    /// [`INVALID_ATTENDING`] when `attending` is not `yes` or `no`.
    pub fn from_fields(name: Option<&str>, attending: Option<&str>) -> Result<Self> {
        let name = name.map(str::trim).filter(|n| !n.is_empty());
        let attending = attending.filter(|a| !a.is_empty());

        let (Some(name), Some(attending)) = (name, attending) else {
            return Err(Error::validation(MISSING_FIELDS));
        };

        Ok(Self {
            name: name.to_string(),
            attending: attending.parse()?,
        })
    }
}

/// A stored RSVP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rsvp {
    /// Stable identifier assigned at creation.
    pub id: Uuid,
    /// Guest name.
    pub name: String,
    /// Attendance choice.
    pub attending: Attending,
    /// When the RSVP was received, at millisecond precision.
    pub submitted_at: DateTime<Utc>,
}

impl Rsvp {
    /// Stamp a new submission with a fresh id and the current time.
    #[must_use]
    pub fn new(submission: NewRsvp) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: submission.name,
            attending: submission.attending,
            submitted_at: now(),
        }
    }

    /// Whether the guest said yes.
    #[must_use]
    pub fn is_attending(&self) -> bool {
        self.attending == Attending::Yes
    }
}

/// Current time truncated to milliseconds, the precision every backend keeps.
#[must_use]
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}
