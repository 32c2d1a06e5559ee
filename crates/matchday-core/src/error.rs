//! Error types for the Matchday core library
//!
//! Request-level failures are classified as [`RequestError`](crate::http::RequestError)
//! and carried through this crate-level error when they meet configuration
//! or storage failures in the same call path.

use thiserror::Error;

use crate::http::RequestError;

/// Main error type for Matchday core operations
#[derive(Error, Debug)]
pub enum Error {
    /// A classified request failure
    #[error(transparent)]
    Request(#[from] RequestError),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// Session storage errors
    #[error("Session store error: {message}")]
    SessionStore {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing and serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// Generic internal error with context
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a configuration error without an underlying cause
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Status code of the underlying request failure, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Request(err) => Some(err.status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Internal {
            message: err.to_string(),
            source: err,
        }
    }
}
