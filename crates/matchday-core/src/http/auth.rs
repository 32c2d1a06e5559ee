//! Request header construction
//!
//! Two variants:
//! - Session auth: JSON content type plus a bearer token read from the session store
//! - No auth: content type only, for credential-issuing flows

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

use crate::http::SessionStore;

/// Authorization scheme prefix
pub const BEARER_PREFIX: &str = "Bearer ";

/// Trait for applying authentication to outgoing request headers
pub trait AuthHandler: Send + Sync {
    /// Apply authentication to request headers
    fn apply_auth(&self, headers: &mut HeaderMap);
}

/// Attaches the current session token, when one is present
#[derive(Clone)]
pub struct SessionAuth {
    session: Arc<dyn SessionStore>,
}

impl SessionAuth {
    pub fn new(session: Arc<dyn SessionStore>) -> Self {
        Self { session }
    }
}

impl AuthHandler for SessionAuth {
    fn apply_auth(&self, headers: &mut HeaderMap) {
        let Some(token) = self.session.token() else {
            return;
        };

        match HeaderValue::from_str(&bearer_value(&token)) {
            Ok(mut value) => {
                value.set_sensitive(true);
                headers.insert(AUTHORIZATION, value);
            }
            Err(_) => {
                tracing::warn!("Stored session token is not a valid header value; sending request without it");
            }
        }
    }
}

/// Never sends credentials
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAuth;

impl AuthHandler for NoAuth {
    fn apply_auth(&self, _headers: &mut HeaderMap) {}
}

/// Prefix the token with the bearer scheme unless it already carries it
pub fn bearer_value(token: &str) -> String {
    if token.starts_with(BEARER_PREFIX) {
        token.to_string()
    } else {
        format!("{}{}", BEARER_PREFIX, token)
    }
}

/// Build the header set for a request
pub fn build_headers(auth: &dyn AuthHandler, json: bool) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if json {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    }
    auth.apply_auth(&mut headers);
    headers
}
