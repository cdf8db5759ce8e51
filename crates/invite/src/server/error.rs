//! Mapping from crate errors to HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::error;

use crate::api::{ErrorBody, INVALID_INDEX, METHOD_NOT_ALLOWED, NOT_FOUND};
use crate::error::Error;

/// Which endpoint operation failed, for logging and the generic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// `GET`
    Fetch,
    /// `POST`
    Submit,
    /// `DELETE`
    Delete,
}

impl Operation {
    /// The message a caller sees when the backend fails.
    #[must_use]
    pub fn failure(self) -> &'static str {
        match self {
            Self::Fetch => "Failed to fetch RSVPs",
            Self::Submit => "Failed to submit RSVP",
            Self::Delete => "Failed to delete RSVP",
        }
    }
}

/// An error on its way out of a handler.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The caller sent something unusable.
    #[error("{0}")]
    BadRequest(String),

    /// The method is not served on this path.
    #[error("{}", METHOD_NOT_ALLOWED)]
    MethodNotAllowed,

    /// The store failed. Details are logged, not returned.
    #[error("{}", .operation.failure())]
    Internal {
        /// Operation that failed.
        operation: Operation,
        /// The underlying error.
        #[source]
        source: Error,
    },
}

impl ApiError {
    /// Classify a store error raised during `operation`.
    #[must_use]
    pub fn from_store(operation: Operation, err: Error) -> Self {
        match err {
            Error::Validation { message } => Self::BadRequest(message),
            Error::InvalidPosition { .. } => Self::BadRequest(INVALID_INDEX.to_string()),
            Error::NotFound { .. } => Self::BadRequest(NOT_FOUND.to_string()),
            source => Self::Internal { operation, source },
        }
    }

    /// HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Internal { operation, source } = &self {
            error!(?operation, "RSVP {operation:?} failed: {source}");
        }

        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
