//! Errors surfaced by the RSVP client.

use thiserror::Error;

/// Everything that can go wrong talking to the RSVP endpoint.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The input was rejected before any request was made.
    #[error("{0}")]
    Validation(String),

    /// The endpoint answered with an error status.
    #[error("{message} (HTTP {status})")]
    Api {
        /// HTTP status code.
        status: u16,
        /// The endpoint's `error` field, or a generic description.
        message: String,
    },

    /// No HTTP response was received.
    #[error("request failed: {0}")]
    Transport(String),

    /// The endpoint answered 2xx with a body we could not read.
    #[error("unexpected response body: {0}")]
    Decode(String),

    /// The offline fallback could not complete the operation.
    #[error("offline fallback failed: {0}")]
    Fallback(#[from] invite::Error),
}

impl ClientError {
    /// Whether the endpoint was never reached.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

/// Result alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ClientError::Api {
            status: 400,
            message: "Invalid RSVP index".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid RSVP index (HTTP 400)");
        assert!(!err.is_transport());
    }

    #[test]
    fn test_transport_error() {
        let err = ClientError::Transport("connection refused".to_string());
        assert!(err.is_transport());
        assert!(err.to_string().contains("connection refused"));
    }
}
