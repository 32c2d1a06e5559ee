//! Credential flows
//!
//! Login, registration and password reset go out without credentials and are
//! tried against the current `/api/auth` routes before the legacy `/auth` ones.

use serde_json::json;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::http::{HttpClient, RequestResult};
use crate::services::route_chain;
use crate::types::{Credentials, MessageResponse, Registration, TokenResponse};
use crate::Result;

pub const LOGIN_ROUTES: &[&str] = &["/api/auth/login", "/auth/login"];
pub const REGISTER_ROUTES: &[&str] = &["/api/auth/register", "/auth/register"];
pub const FORGOT_PASSWORD_ROUTES: &[&str] = &["/api/auth/forgot-password", "/auth/forgot-password"];

#[derive(Clone)]
pub struct AuthService {
    client: HttpClient,
}

impl AuthService {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// Exchange credentials for a token and make it the active session
    pub async fn login(&self, credentials: &Credentials, cancel: Option<&CancellationToken>) -> Result<String> {
        let response: TokenResponse = route_chain(&self.client, "auth.login", LOGIN_ROUTES, move |route| {
            self.client.post_no_auth(route, Some(credentials), cancel)
        })
        .run()
        .await?;

        self.client.session().set_token(&response.token)?;
        info!("Session started");
        Ok(response.token)
    }

    /// Create an account; the result names the route that accepted it
    pub async fn register(
        &self,
        credentials: &Credentials,
        cancel: Option<&CancellationToken>,
    ) -> RequestResult<Registration> {
        let served = route_chain(&self.client, "auth.register", REGISTER_ROUTES, move |route| {
            self.client.post_no_auth::<TokenResponse, _>(route, Some(credentials), cancel)
        })
        .run_detailed()
        .await?;

        Ok(Registration {
            token: served.value.token,
            endpoint: served.endpoint,
        })
    }

    /// Ask the backend to email a password reset link
    pub async fn request_password_reset(
        &self,
        email: &str,
        cancel: Option<&CancellationToken>,
    ) -> RequestResult<Option<MessageResponse>> {
        let payload = json!({ "email": email });
        let payload = &payload;
        route_chain(&self.client, "auth.forgot_password", FORGOT_PASSWORD_ROUTES, move |route| {
            self.client.post_no_auth(route, Some(payload), cancel)
        })
        .run()
        .await
    }

    /// Drop the active session
    pub fn logout(&self) -> Result<()> {
        self.client.session().clear()?;
        info!("Session cleared");
        Ok(())
    }

    pub fn is_authenticated(&self) -> bool {
        self.client.session().has_session()
    }
}
