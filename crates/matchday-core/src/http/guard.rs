//! Session invalidation on authorization failure
//!
//! When an authenticated request comes back 401 the stored token is dropped
//! and the user is sent to the public entry point, unless they are already
//! on a public screen (navigating there again would loop).

use std::sync::Arc;

use tracing::{debug, warn};

use crate::http::{RequestError, SessionStore};

/// Screens reachable without a session
pub const DEFAULT_PUBLIC_DESTINATIONS: &[&str] = &["/login", "/register", "/forgot"];

/// Where the guard sends the user after invalidating the session
pub const DEFAULT_ENTRY_POINT: &str = "/login";

/// Navigation capability injected into the guard
pub trait Navigator: Send + Sync {
    /// Route identifier of the active screen
    fn current_location(&self) -> String;

    /// Perform a hard navigation
    fn navigate(&self, destination: &str);
}

/// Navigator for contexts without screens; it stays put and logs
#[derive(Debug, Clone)]
pub struct NullNavigator {
    location: String,
}

impl NullNavigator {
    pub fn at(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
        }
    }
}

impl Default for NullNavigator {
    fn default() -> Self {
        Self::at("/")
    }
}

impl Navigator for NullNavigator {
    fn current_location(&self) -> String {
        self.location.clone()
    }

    fn navigate(&self, destination: &str) {
        debug!(destination, "Navigation requested without a navigation context");
    }
}

/// Reacts to 401 responses on authenticated requests
#[derive(Clone)]
pub struct SessionGuard {
    session: Arc<dyn SessionStore>,
    navigator: Arc<dyn Navigator>,
    public_destinations: Vec<String>,
    entry_point: String,
}

impl SessionGuard {
    pub fn new(
        session: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
        public_destinations: Vec<String>,
        entry_point: impl Into<String>,
    ) -> Self {
        Self {
            session,
            navigator,
            public_destinations,
            entry_point: entry_point.into(),
        }
    }

    /// Whether `location` is a pre-authentication screen
    pub fn is_public(&self, location: &str) -> bool {
        self.public_destinations.iter().any(|d| d == location)
    }

    /// Invalidate the session, redirect if needed, and return the error to raise
    ///
    /// The caller always gets an unauthorized error back from this path.
    pub fn handle_unauthorized(&self, error: RequestError) -> RequestError {
        if let Err(e) = self.session.clear() {
            warn!(error = %e, "Failed to clear session after authorization failure");
        }

        let location = self.navigator.current_location();
        if self.is_public(&location) {
            debug!(location = %location, "Session invalidated on a public screen; not redirecting");
        } else {
            debug!(from = %location, to = %self.entry_point, "Session invalidated; redirecting");
            self.navigator.navigate(&self.entry_point);
        }

        RequestError {
            status: 401,
            message: "Unauthorized".to_string(),
            details: error.details,
        }
    }
}
