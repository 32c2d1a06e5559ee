//! Terminal stand-in for screen navigation
//!
//! Each command maps to a screen location. When the backend rejects the
//! session the guard asks to navigate to the sign-in screen; in a terminal
//! that means telling the user how to sign in again.

use colored::Colorize;
use matchday_core::Navigator;
use std::sync::Mutex;

/// Navigator for CLI commands
#[derive(Debug)]
pub struct CliNavigator {
    location: String,
    redirected_to: Mutex<Option<String>>,
}

impl CliNavigator {
    pub fn at(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            redirected_to: Mutex::new(None),
        }
    }

    /// Destination of the last navigation request, if any
    pub fn redirected_to(&self) -> Option<String> {
        self.redirected_to.lock().ok().and_then(|guard| guard.clone())
    }
}

impl Navigator for CliNavigator {
    fn current_location(&self) -> String {
        self.location.clone()
    }

    fn navigate(&self, destination: &str) {
        tracing::info!(from = %self.location, to = destination, "Redirecting after session loss");
        if let Ok(mut redirected) = self.redirected_to.lock() {
            *redirected = Some(destination.to_string());
        }
        eprintln!(
            "{} Run `matchday login` to sign in again.",
            "Session expired.".yellow().bold()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_redirect() {
        let navigator = CliNavigator::at("/players");
        assert_eq!(navigator.current_location(), "/players");
        assert_eq!(navigator.redirected_to(), None);

        navigator.navigate("/login");
        assert_eq!(navigator.redirected_to().as_deref(), Some("/login"));
    }
}
