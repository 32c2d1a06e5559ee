//! Request executor
//!
//! One operation per verb. Each call resolves its path, builds fresh headers,
//! dispatches once and normalizes the outcome: success bodies are decoded,
//! everything else becomes a [`RequestError`]. Authenticated calls that come
//! back 401 go through the [`SessionGuard`] before the error is returned.

use std::future::Future;
use std::sync::Arc;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client as ReqwestClient, Method, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::http::auth::{AuthHandler, NoAuth, SessionAuth};
use crate::http::builder::{FileUpload, RequestBody, RequestBuilder};
use crate::http::fallback::{FallbackChain, FallbackPolicy};
use crate::http::guard::{Navigator, SessionGuard, DEFAULT_ENTRY_POINT, DEFAULT_PUBLIC_DESTINATIONS};
use crate::http::{RequestError, RequestResult, SessionStore, UrlResolver};
use crate::{Error, Result};

/// Environment variable holding the API base URL
pub const API_URL_ENV: &str = "MATCHDAY_API_URL";
/// Legacy name for [`API_URL_ENV`]
pub const LEGACY_API_URL_ENV: &str = "MATCHDAY_API_BASE_URL";
/// Environment variable holding the origin for site-relative targets
pub const ORIGIN_ENV: &str = "MATCHDAY_ORIGIN";

/// Typed "no payload" for body-less POST, PUT and PATCH calls
pub const NO_BODY: Option<&'static ()> = None;

/// Configuration for the HTTP client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpClientConfig {
    /// API base URL; may be empty, relative or absolute
    pub base_url: String,
    /// Absolute origin that completes site-relative targets
    pub origin: Option<String>,
    /// Screens that do not trigger a redirect on authorization failure
    pub public_destinations: Vec<String>,
    /// Where the session guard sends the user
    pub entry_point: String,
    pub user_agent: String,
    pub fallback: FallbackPolicy,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            origin: None,
            public_destinations: DEFAULT_PUBLIC_DESTINATIONS.iter().map(|d| d.to_string()).collect(),
            entry_point: DEFAULT_ENTRY_POINT.to_string(),
            user_agent: format!("matchday/{}", crate::VERSION),
            fallback: FallbackPolicy::default(),
        }
    }
}

impl HttpClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Read the base URL and origin from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup
    ///
    /// The current variable name wins over the legacy one; blank values are
    /// treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            base_url: non_blank(API_URL_ENV)
                .or_else(|| non_blank(LEGACY_API_URL_ENV))
                .unwrap_or_default(),
            origin: non_blank(ORIGIN_ENV),
            ..Self::default()
        }
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    pub fn with_fallback_policy(mut self, policy: FallbackPolicy) -> Self {
        self.fallback = policy;
        self
    }

    /// Reject URLs that cannot be parsed
    pub fn validate(&self) -> Result<()> {
        let base = self.base_url.trim();
        if base.contains("://") {
            Url::parse(base).map_err(|e| Error::Configuration {
                message: format!("Invalid base URL '{}'", base),
                source: Some(e.into()),
            })?;
        }

        self.parsed_origin()?;

        if self.entry_point.trim().is_empty() {
            return Err(Error::configuration("Entry point cannot be empty"));
        }

        Ok(())
    }

    fn parsed_origin(&self) -> Result<Option<Url>> {
        let Some(origin) = self.origin.as_deref().map(str::trim).filter(|o| !o.is_empty()) else {
            return Ok(None);
        };

        let url = Url::parse(origin).map_err(|e| Error::Configuration {
            message: format!("Invalid origin '{}'", origin),
            source: Some(e.into()),
        })?;

        if url.cannot_be_a_base() {
            return Err(Error::configuration(format!("Origin '{}' cannot be a base URL", origin)));
        }

        Ok(Some(url))
    }
}

/// Which 401 behaviour a call gets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AuthPolicy {
    /// Session token attached; 401 invalidates the session
    Session,
    /// No credentials; 401 is an ordinary failure
    Public,
}

struct ClientInner {
    client: ReqwestClient,
    builder: RequestBuilder,
    session: Arc<dyn SessionStore>,
    session_auth: SessionAuth,
    guard: SessionGuard,
    config: HttpClientConfig,
}

/// HTTP client for the Matchday backend
///
/// Cheap to clone; clones share the connection pool and session store.
#[derive(Clone)]
pub struct HttpClient {
    inner: Arc<ClientInner>,
}

impl HttpClient {
    /// Create a client over `session`, redirecting through `navigator`
    pub fn new(
        config: HttpClientConfig,
        session: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        config.validate()?;

        let client = ReqwestClient::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| Error::Configuration {
                message: format!("Failed to create HTTP client: {}", e),
                source: Some(e.into()),
            })?;

        let builder = RequestBuilder::new(UrlResolver::new(&config.base_url), config.parsed_origin()?);
        let guard = SessionGuard::new(
            session.clone(),
            navigator,
            config.public_destinations.clone(),
            config.entry_point.clone(),
        );

        Ok(Self {
            inner: Arc::new(ClientInner {
                client,
                builder,
                session_auth: SessionAuth::new(session.clone()),
                session,
                guard,
                config,
            }),
        })
    }

    pub fn session(&self) -> &Arc<dyn SessionStore> {
        &self.inner.session
    }

    pub fn config(&self) -> &HttpClientConfig {
        &self.inner.config
    }

    pub fn fallback_policy(&self) -> &FallbackPolicy {
        &self.inner.config.fallback
    }

    /// Resolve `path` against the configured base
    pub fn resolve(&self, path: &str) -> String {
        self.inner.builder.resolver().resolve(path)
    }

    /// Start a fallback chain using this client's policy
    pub fn chain<'a, T: Send + 'a>(&self, operation: impl Into<String>) -> FallbackChain<'a, T> {
        FallbackChain::new(operation).with_policy(self.inner.config.fallback.clone())
    }

    /// Fetch and decode a JSON resource
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        cancel: Option<&CancellationToken>,
    ) -> RequestResult<T> {
        self.execute_json(Method::GET, path, None, AuthPolicy::Session, cancel).await
    }

    /// Fetch a binary resource
    pub async fn get_files(&self, path: &str, cancel: Option<&CancellationToken>) -> RequestResult<Vec<u8>> {
        let config = self.inner.builder.build_binary(path, &self.inner.session_auth, cancel);
        let (request, cancel) = self.inner.builder.prepare(&self.inner.client, config)?;
        let method = Method::GET;

        with_cancel(cancel.as_ref(), async {
            let response = request.send().await.map_err(RequestError::from_request_error)?;
            let response = self.check_status(&method, path, response, AuthPolicy::Session).await?;
            let bytes = response.bytes().await.map_err(RequestError::from_request_error)?;
            Ok(bytes.to_vec())
        })
        .await
    }

    /// Create a resource
    pub async fn post<T, P>(&self, path: &str, payload: Option<&P>, cancel: Option<&CancellationToken>) -> RequestResult<T>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let body = json_body(payload)?;
        self.execute_json(Method::POST, path, body, AuthPolicy::Session, cancel).await
    }

    /// POST without credentials, for login and registration flows
    ///
    /// A 401 here means bad credentials, not an expired session, so the
    /// session guard is not involved.
    pub async fn post_no_auth<T, P>(
        &self,
        path: &str,
        payload: Option<&P>,
        cancel: Option<&CancellationToken>,
    ) -> RequestResult<T>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let body = json_body(payload)?;
        self.execute_json(Method::POST, path, body, AuthPolicy::Public, cancel).await
    }

    /// Upload a file as multipart form data
    pub async fn post_files<T: DeserializeOwned>(
        &self,
        path: &str,
        upload: FileUpload,
        cancel: Option<&CancellationToken>,
    ) -> RequestResult<T> {
        self.execute_json(
            Method::POST,
            path,
            Some(RequestBody::Multipart(upload)),
            AuthPolicy::Session,
            cancel,
        )
        .await
    }

    /// Replace a resource
    pub async fn put<T, P>(&self, path: &str, payload: Option<&P>, cancel: Option<&CancellationToken>) -> RequestResult<T>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let body = json_body(payload)?;
        self.execute_json(Method::PUT, path, body, AuthPolicy::Session, cancel).await
    }

    /// Partially update a resource
    pub async fn patch<T, P>(&self, path: &str, payload: Option<&P>, cancel: Option<&CancellationToken>) -> RequestResult<T>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let body = json_body(payload)?;
        self.execute_json(Method::PATCH, path, body, AuthPolicy::Session, cancel).await
    }

    /// Delete a resource
    ///
    /// A 204 or a non-JSON response decodes as JSON `null`.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str, cancel: Option<&CancellationToken>) -> RequestResult<T> {
        self.execute_json(Method::DELETE, path, None, AuthPolicy::Session, cancel).await
    }

    async fn execute_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<RequestBody>,
        policy: AuthPolicy,
        cancel: Option<&CancellationToken>,
    ) -> RequestResult<T> {
        let auth: &dyn AuthHandler = match policy {
            AuthPolicy::Session => &self.inner.session_auth,
            AuthPolicy::Public => &NoAuth,
        };

        let config = self.inner.builder.build(method.clone(), path, auth, body, cancel);
        debug!(method = %method, url = %config.url, "Dispatching request");
        let (request, cancel) = self.inner.builder.prepare(&self.inner.client, config)?;

        with_cancel(cancel.as_ref(), async {
            let response = request.send().await.map_err(RequestError::from_request_error)?;
            let response = self.check_status(&method, path, response, policy).await?;

            let status = response.status();
            let is_json = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(|v| v.contains("json"))
                .unwrap_or(false);
            let bytes = response.bytes().await.map_err(RequestError::from_request_error)?;

            let empty = status == StatusCode::NO_CONTENT
                || bytes.iter().all(u8::is_ascii_whitespace)
                || (method == Method::DELETE && !is_json);
            decode_body(&method, path, status.as_u16(), empty, &bytes)
        })
        .await
    }

    /// Pass success responses through; classify everything else
    async fn check_status(
        &self,
        method: &Method,
        path: &str,
        response: Response,
        policy: AuthPolicy,
    ) -> RequestResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let code = status.as_u16();
        if status == StatusCode::UNAUTHORIZED {
            return Err(match policy {
                AuthPolicy::Session => {
                    let error =
                        RequestError::from_response(response, RequestError::default_message(method, path, code)).await;
                    self.inner.guard.handle_unauthorized(error)
                }
                AuthPolicy::Public => {
                    RequestError::from_response(response, format!("{} {} unauthorized", method, path)).await
                }
            });
        }

        Err(RequestError::from_response(response, RequestError::default_message(method, path, code)).await)
    }
}

/// Race `work` against the caller's cancellation handle
async fn with_cancel<T, F>(cancel: Option<&CancellationToken>, work: F) -> RequestResult<T>
where
    F: Future<Output = RequestResult<T>>,
{
    match cancel {
        Some(token) => {
            tokio::select! {
                biased;
                _ = token.cancelled() => Err(RequestError::cancelled()),
                result = work => result,
            }
        }
        None => work.await,
    }
}

fn json_body<P: Serialize + ?Sized>(payload: Option<&P>) -> RequestResult<Option<RequestBody>> {
    payload
        .map(|p| {
            serde_json::to_value(p)
                .map(RequestBody::Json)
                .map_err(|e| RequestError::transport(format!("Failed to serialize request body: {}", e)))
        })
        .transpose()
}

fn decode_body<T: DeserializeOwned>(
    method: &Method,
    path: &str,
    status: u16,
    empty: bool,
    bytes: &[u8],
) -> RequestResult<T> {
    let decoded = if empty {
        serde_json::from_value(Value::Null)
    } else {
        serde_json::from_slice(bytes)
    };
    decoded.map_err(|e| RequestError::decode(method, path, status, e))
}
