//! Error types and handling for the CLI
//!
//! Request failures are split by kind so scripts can tell an expired
//! session from a missing resource or an unreachable backend by exit code.

use matchday_core::http::ErrorKind;
use matchday_core::RequestError;
use std::io;
use std::path::PathBuf;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for CLI operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error (file operations, etc.)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Error from matchday-core outside a request
    #[error("Core error: {0}")]
    Core(matchday_core::Error),

    /// The backend rejected the session or the credentials
    #[error("Not signed in: {message}")]
    Unauthorized { message: String },

    /// No route variant knew the resource
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// The backend could not be reached or the request was cancelled
    #[error("Network error: {0}")]
    Network(String),

    /// Any other failed response
    #[error("Backend error ({status}): {message}")]
    Api { status: u16, message: String },

    /// File not found
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// Invalid file format
    #[error("Invalid file format for {}: expected {} format", path.display(), expected)]
    InvalidFormat { path: PathBuf, expected: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid argument combination
    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Generic error with context
    #[error("{message}")]
    Other { message: String },
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an invalid arguments error
    pub fn invalid_args(message: impl Into<String>) -> Self {
        Self::InvalidArgs(message.into())
    }

    /// Create a generic error with message
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Io(_) => 1,
            Self::Core(_) => 2,
            Self::Unauthorized { .. } => 3,
            Self::NotFound { .. } => 4,
            Self::Network(_) => 5,
            Self::Api { .. } => 6,
            Self::FileNotFound { .. } => 7,
            Self::InvalidFormat { .. } => 8,
            Self::Config(_) => 9,
            Self::InvalidArgs(_) => 10,
            Self::Json(_) => 12,
            Self::Yaml(_) => 13,
            Self::Other { .. } => 99,
        }
    }

    /// Check if this error should display usage help
    pub fn should_show_help(&self) -> bool {
        matches!(self, Self::InvalidArgs(_))
    }
}

impl From<RequestError> for Error {
    fn from(err: RequestError) -> Self {
        match err.kind() {
            ErrorKind::Unauthorized => Self::Unauthorized { message: err.message },
            ErrorKind::RouteNotFound => Self::NotFound { message: err.message },
            ErrorKind::Transport => Self::Network(err.message),
            ErrorKind::Status => Self::Api {
                status: err.status,
                message: err.message,
            },
        }
    }
}

impl From<matchday_core::Error> for Error {
    fn from(err: matchday_core::Error) -> Self {
        match err {
            matchday_core::Error::Request(request) => request.into(),
            matchday_core::Error::Configuration { message, .. } => Self::Config(message),
            other => Self::Core(other),
        }
    }
}

/// Format an error for display to the user
pub fn format_error(error: &Error, use_color: bool) -> String {
    let message = crate::logging::redaction::redact_sensitive(&error.to_string());

    if use_color {
        use colored::Colorize;
        format!("{} {}", "Error:".red().bold(), message)
    } else {
        format!("Error: {}", message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_errors_map_to_exit_codes() {
        let cases = [
            (RequestError::new(401, "Unauthorized"), 3),
            (RequestError::new(404, "Player not found"), 4),
            (RequestError::cancelled(), 5),
            (RequestError::new(500, "Boom"), 6),
        ];

        for (request, code) in cases {
            assert_eq!(Error::from(request).exit_code(), code);
        }
    }

    #[test]
    fn test_core_error_unwraps_request() {
        let core = matchday_core::Error::Request(RequestError::new(404, "gone"));
        assert!(matches!(Error::from(core), Error::NotFound { .. }));

        let core = matchday_core::Error::configuration("bad origin");
        assert_eq!(Error::from(core).exit_code(), 9);
    }

    #[test]
    fn test_format_error_plain() {
        let err = Error::Api {
            status: 500,
            message: "Boom".to_string(),
        };
        assert_eq!(format_error(&err, false), "Error: Backend error (500): Boom");
    }

    #[test]
    fn test_format_error_redacts() {
        let err = Error::other("login failed with password=hunter22");
        let formatted = format_error(&err, false);
        assert!(!formatted.contains("hunter22"));
    }
}
