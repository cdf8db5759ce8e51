//! Error types for invite.
//!
//! This module defines all error types used throughout the invite crate,
//! from request validation down to the storage backends.

use std::path::PathBuf;
use thiserror::Error;

use crate::storage::Backend;

/// The main error type for invite operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Request Errors ===
    /// A submission was missing a required field or carried an invalid value.
    #[error("validation failed: {message}")]
    Validation {
        /// Description of the validation failure.
        message: String,
    },

    /// A positional delete addressed a slot outside the current listing.
    #[error("invalid RSVP position {position} (collection has {len} entries)")]
    InvalidPosition {
        /// The requested position.
        position: i64,
        /// Number of records at the time of the call.
        len: usize,
    },

    /// No record carries the requested identifier.
    #[error("no RSVP with id {id}")]
    NotFound {
        /// The requested identifier.
        id: String,
    },

    // === Backend Errors ===
    /// The selected backend is missing credentials or connection details.
    #[error("backend misconfigured: {message}")]
    BackendConfiguration {
        /// Description of what is missing.
        message: String,
    },

    /// The underlying store rejected or could not perform the operation.
    #[error("{backend} backend unavailable: {message}")]
    BackendUnavailable {
        /// Which backend failed.
        backend: Backend,
        /// Description of what went wrong.
        message: String,
    },

    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for invite operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new backend configuration error.
    #[must_use]
    pub fn backend_configuration(message: impl Into<String>) -> Self {
        Self::BackendConfiguration {
            message: message.into(),
        }
    }

    /// Create a new backend unavailable error.
    #[must_use]
    pub fn backend_unavailable(backend: Backend, message: impl Into<String>) -> Self {
        Self::BackendUnavailable {
            backend,
            message: message.into(),
        }
    }

    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::validation("name is required");
        assert_eq!(err.to_string(), "validation failed: name is required");

        let err = Error::internal("test error");
        assert_eq!(err.to_string(), "internal error: test error");
    }

    #[test]
    fn test_invalid_position_display() {
        let err = Error::InvalidPosition {
            position: 99,
            len: 2,
        };
        let msg = err.to_string();
        assert!(msg.contains("99"));
        assert!(msg.contains('2'));
    }

    #[test]
    fn test_not_found_display() {
        let err = Error::NotFound {
            id: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "no RSVP with id abc");
    }

    #[test]
    fn test_backend_unavailable_display() {
        let err = Error::backend_unavailable(Backend::Supabase, "connection refused");
        assert_eq!(
            err.to_string(),
            "supabase backend unavailable: connection refused"
        );
    }

    #[test]
    fn test_backend_configuration_display() {
        let err = Error::backend_configuration("SUPABASE_URL is not set");
        assert!(err.to_string().contains("SUPABASE_URL"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_rusqlite_error() {
        let result = rusqlite::Connection::open_with_flags(
            "/nonexistent/path/db.sqlite",
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY,
        );
        if let Err(sqlite_err) = result {
            let err: Error = sqlite_err.into();
            assert!(matches!(err, Error::DatabaseQuery(_)));
        }
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "invalid bind address".to_string(),
        };
        assert!(err.to_string().contains("invalid bind address"));
    }

    #[test]
    fn test_directory_create_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::DirectoryCreate {
            path: PathBuf::from("/root/forbidden"),
            source: io_err,
        };
        assert!(err.to_string().contains("/root/forbidden"));
    }
}
