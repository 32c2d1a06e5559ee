//! Shared test support utilities for integration tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use matchday_core::http::{HttpClient, HttpClientConfig, MemorySessionStore, Navigator, SessionStore};
use matchday_core::services::MatchdayApi;
use wiremock::MockServer;

/// Navigator that records every navigation it is asked to perform
pub struct RecordingNavigator {
    location: String,
    visits: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn at(location: &str) -> Arc<Self> {
        Arc::new(Self {
            location: location.to_string(),
            visits: Mutex::new(Vec::new()),
        })
    }

    pub fn visits(&self) -> Vec<String> {
        self.visits.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn current_location(&self) -> String {
        self.location.clone()
    }

    fn navigate(&self, destination: &str) {
        self.visits.lock().unwrap().push(destination.to_string());
    }
}

/// Session store that counts writes and clears
#[derive(Default)]
pub struct CountingSessionStore {
    inner: MemorySessionStore,
    writes: AtomicUsize,
    clears: AtomicUsize,
}

impl CountingSessionStore {
    pub fn with_token(token: &str) -> Arc<Self> {
        Arc::new(Self {
            inner: MemorySessionStore::with_token(token),
            ..Self::default()
        })
    }

    pub fn empty() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn clears(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }
}

impl SessionStore for CountingSessionStore {
    fn token(&self) -> Option<String> {
        self.inner.token()
    }

    fn set_token(&self, token: &str) -> matchday_core::Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.set_token(token)
    }

    fn clear(&self) -> matchday_core::Result<()> {
        self.clears.fetch_add(1, Ordering::SeqCst);
        self.inner.clear()
    }
}

/// A client wired to a local mock backend
pub struct Harness {
    pub server: MockServer,
    pub store: Arc<CountingSessionStore>,
    pub navigator: Arc<RecordingNavigator>,
    pub client: HttpClient,
}

impl Harness {
    /// Client whose base URL is the mock server root
    pub async fn start(location: &str, token: Option<&str>) -> Self {
        let server = MockServer::start().await;
        let base = server.uri();
        Self::with_config(server, HttpClientConfig::new(base), location, token)
    }

    /// Client whose base URL ends in `/api`
    pub async fn start_api(location: &str, token: Option<&str>) -> Self {
        let server = MockServer::start().await;
        let base = format!("{}/api", server.uri());
        Self::with_config(server, HttpClientConfig::new(base), location, token)
    }

    pub fn with_config(server: MockServer, config: HttpClientConfig, location: &str, token: Option<&str>) -> Self {
        let store = match token {
            Some(t) => CountingSessionStore::with_token(t),
            None => CountingSessionStore::empty(),
        };
        let navigator = RecordingNavigator::at(location);
        let client = HttpClient::new(config, store.clone(), navigator.clone()).unwrap();

        Self {
            server,
            store,
            navigator,
            client,
        }
    }

    pub fn api(&self) -> MatchdayApi {
        MatchdayApi::new(self.client.clone())
    }

    pub async fn request_count(&self) -> usize {
        self.server.received_requests().await.map(|r| r.len()).unwrap_or(0)
    }

    pub async fn requested_paths(&self) -> Vec<String> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(|r| r.url.path().to_string())
            .collect()
    }
}
