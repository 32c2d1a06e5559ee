//! Matchday Core - resilient request layer for the Matchday backend
//!
//! The backend exposes some resources under more than one route depending on
//! the deployment. This crate hides that behind a small request layer that
//! tries equivalent routes in order and only moves on when a route does not
//! exist.
//!
//! # Main Components
//!
//! - **Request layer** (`http`): URL resolution, headers, session guard,
//!   error classification, per-verb executor and the fallback chain runner
//! - **Wire types** (`types`): players, groups, matches and auth payloads
//! - **Services** (`services`): domain operations built on the request layer
//! - **Error Handling**: crate error type using `thiserror` and `anyhow`
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use matchday_core::http::{HttpClient, HttpClientConfig, MemorySessionStore, NullNavigator};
//! use matchday_core::services::MatchdayApi;
//! use matchday_core::types::Credentials;
//!
//! async fn example() -> matchday_core::Result<()> {
//!     let client = HttpClient::new(
//!         HttpClientConfig::new("https://matchday.example.com/api"),
//!         Arc::new(MemorySessionStore::new()),
//!         Arc::new(NullNavigator::default()),
//!     )?;
//!     let api = MatchdayApi::new(client);
//!
//!     api.auth.login(&Credentials::new("a@b.com", "secret"), None).await?;
//!     let groups = api.groups.list(None).await?;
//!     println!("{} groups", groups.len());
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod http;
pub mod services;
pub mod types;

// Re-export main types for convenience
pub use error::{Error, Result};
pub use http::{
    FallbackChain, FallbackPolicy, HttpClient, HttpClientConfig, Navigator, RequestError, RequestResult,
    SessionStore,
};
pub use services::MatchdayApi;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
