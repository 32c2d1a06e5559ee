//! Request error classification
//!
//! Every non-success response and every transport failure is normalized into
//! a [`RequestError`] carrying the numeric status and a readable message.
//! Fallback decisions branch on the status alone.

use reqwest::{Method, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Status code used for failures where no response was received
pub const TRANSPORT_STATUS: u16 = 0;

/// Classification of a request failure, derived from its status code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// 404 - this route variant does not exist here
    RouteNotFound,
    /// 401 - missing or rejected credentials
    Unauthorized,
    /// Any other non-success status
    Status,
    /// No response reached the client (unreachable, aborted, cancelled)
    Transport,
}

impl ErrorKind {
    /// Classify a status code
    pub fn from_status(status: u16) -> Self {
        match status {
            TRANSPORT_STATUS => ErrorKind::Transport,
            401 => ErrorKind::Unauthorized,
            404 => ErrorKind::RouteNotFound,
            _ => ErrorKind::Status,
        }
    }

    /// Whether a fallback chain may move on to the next endpoint variant
    pub fn is_continuable(&self) -> bool {
        matches!(self, ErrorKind::RouteNotFound)
    }
}

/// Normalized request failure
#[derive(Debug, Clone, PartialEq, thiserror::Error, Serialize, Deserialize)]
#[error("{message} (status {status})")]
pub struct RequestError {
    /// HTTP status, or 0 when no response was received
    pub status: u16,
    /// Human-readable message, from the response body when available
    pub message: String,
    /// Parsed error body, if the server sent JSON
    pub details: Option<Value>,
}

impl RequestError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            details: None,
        }
    }

    /// A failure where no response was received
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(TRANSPORT_STATUS, message)
    }

    /// The caller triggered the cancellation handle
    pub fn cancelled() -> Self {
        Self::transport("request cancelled")
    }

    /// Create from a reqwest send/read failure
    pub fn from_request_error(error: reqwest::Error) -> Self {
        Self::transport(error.to_string())
    }

    /// A success response whose body did not match the declared type
    pub fn decode(method: &Method, path: &str, status: u16, error: impl std::fmt::Display) -> Self {
        Self::new(
            status,
            format!("{} {} returned an unreadable body: {}", method, path, error),
        )
    }

    /// Classify a non-success response
    ///
    /// `fallback` is used as the message when the body carries none.
    pub async fn from_response(response: Response, fallback: String) -> Self {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Self::classify(status, &body, fallback)
    }

    /// Classify a status and raw body
    pub fn classify(status: u16, body: &str, fallback: String) -> Self {
        let details = serde_json::from_str::<Value>(body).ok();
        let message = details
            .as_ref()
            .and_then(extract_message)
            .unwrap_or(fallback);

        Self {
            status,
            message,
            details,
        }
    }

    /// Message used when a failed response carries no message of its own
    pub fn default_message(method: &Method, path: &str, status: u16) -> String {
        format!("{} {} failed ({})", method, path, status)
    }

    pub fn kind(&self) -> ErrorKind {
        ErrorKind::from_status(self.status)
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::RouteNotFound
    }

    pub fn is_unauthorized(&self) -> bool {
        self.kind() == ErrorKind::Unauthorized
    }

    pub fn is_transport(&self) -> bool {
        self.kind() == ErrorKind::Transport
    }
}

/// Pull a message out of a JSON error body
///
/// Accepts `{"message": ".."}`, `{"error": ".."}` and `{"error": {"message": ".."}}`.
fn extract_message(json: &Value) -> Option<String> {
    let message = json
        .get("message")
        .and_then(Value::as_str)
        .or_else(|| match json.get("error") {
            Some(Value::String(s)) => Some(s.as_str()),
            Some(error) => error.get("message").and_then(Value::as_str),
            None => None,
        })?;

    let message = message.trim();
    if message.is_empty() {
        None
    } else {
        Some(message.to_string())
    }
}
