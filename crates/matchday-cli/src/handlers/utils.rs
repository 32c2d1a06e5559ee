//! Shared utilities for command handlers

use crate::config::Config;
use crate::error::{Error, Result};
use crate::navigator::CliNavigator;
use crate::output::OutputWriter;
use matchday_core::http::{CancellationToken, FileSessionStore};
use matchday_core::{HttpClient, MatchdayApi, SessionStore};
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

/// Everything a backend command needs
pub struct Backend {
    pub api: MatchdayApi,
    pub cancel: CancellationToken,
    pub session_path: PathBuf,
    navigator: Arc<CliNavigator>,
}

impl Backend {
    /// Connect to the configured backend as the screen at `location`
    pub fn connect(config: &Config, location: &str) -> Result<Self> {
        let session_path = config.session_path()?;
        let store: Arc<dyn SessionStore> = Arc::new(FileSessionStore::new(session_path.clone()));
        let navigator = Arc::new(CliNavigator::at(location));

        let client = HttpClient::new(config.http_config(), store, navigator.clone())?;
        tracing::debug!(
            base_url = %client.config().base_url,
            session = %session_path.display(),
            location,
            "Backend client ready"
        );

        Ok(Self {
            api: MatchdayApi::new(client),
            cancel: cancel_on_interrupt(),
            session_path,
            navigator,
        })
    }

    /// Await `future` behind a spinner, mapping its failure to a CLI error
    pub async fn request<T, E, F>(&self, output: &OutputWriter, message: &str, future: F) -> Result<T>
    where
        F: Future<Output = std::result::Result<T, E>>,
        Error: From<E>,
    {
        let spinner = output.spinner(message);
        let result = future.await;
        if let Some(pb) = spinner {
            pb.finish_and_clear();
        }

        result.map_err(|e| with_login_hint(Error::from(e), self.navigator.redirected_to().is_some()))
    }

    pub fn cancel_token(&self) -> Option<&CancellationToken> {
        Some(&self.cancel)
    }
}

/// Point the user at `matchday login` when credentials were rejected
///
/// A redirect already printed the sign-in notice, so the error is left alone.
fn with_login_hint(err: Error, redirected: bool) -> Error {
    match err {
        Error::Unauthorized { message } if !redirected => {
            tracing::debug!("Credentials rejected without leaving the current screen");
            Error::Unauthorized {
                message: format!("{} (run `matchday login` to sign in)", message),
            }
        }
        other => other,
    }
}

/// Token cancelled when the user presses Ctrl-C
fn cancel_on_interrupt() -> CancellationToken {
    let token = CancellationToken::new();
    let child = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling in-flight request");
            child.cancel();
        }
    });
    token
}
