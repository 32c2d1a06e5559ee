//! Resilient request layer for the Matchday backend
//!
//! This module provides:
//! - URL resolution against a configurable base, without duplicated `api` segments
//! - Header construction with optional bearer credentials
//! - Session invalidation and redirect on authorization failure
//! - Error classification into a status plus message
//! - One executor operation per HTTP verb, each cancellable
//! - Sequential fallback across equivalent endpoint variants

pub mod auth;
pub mod builder;
pub mod client;
pub mod error;
pub mod fallback;
pub mod guard;
pub mod resolver;
pub mod session;

pub use auth::{build_headers, AuthHandler, NoAuth, SessionAuth};
pub use builder::{FileUpload, RequestBody, RequestBuilder, RequestConfig};
pub use client::{HttpClient, HttpClientConfig, NO_BODY};
pub use error::{ErrorKind, RequestError};
pub use fallback::{
    classify_attempt, AttemptOutcome, ChainState, FallbackAttempt, FallbackChain, FallbackPolicy, Served,
};
pub use guard::{Navigator, NullNavigator, SessionGuard};
pub use resolver::UrlResolver;
pub use session::{FileSessionStore, MemorySessionStore, SessionStore};

// Re-export commonly used types
pub use reqwest::{Method, StatusCode};
pub use tokio_util::sync::CancellationToken;

/// Result of a single request, chain or domain operation
pub type RequestResult<T> = std::result::Result<T, RequestError>;
