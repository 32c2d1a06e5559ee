//! Session command handlers

use super::utils::Backend;
use crate::cli::{CredentialArgs, ForgotArgs, OutputFormat};
use crate::config::Config;
use crate::error::Result;
use crate::output::OutputWriter;
use matchday_core::types::Credentials;
use serde_json::json;

/// Handle the login command
pub async fn handle_login(args: CredentialArgs, backend: &Backend, output: &mut OutputWriter) -> Result<()> {
    let credentials = Credentials::new(args.email.trim(), args.password);

    backend
        .request(
            output,
            "Signing in",
            backend.api.auth.login(&credentials, backend.cancel_token()),
        )
        .await?;

    if output.format() == OutputFormat::Human {
        output.success(&format!("✓ Signed in as {}", credentials.email))
    } else {
        output.data(&json!({ "email": credentials.email, "authenticated": true }))
    }
}

/// Handle the register command
pub async fn handle_register(args: CredentialArgs, backend: &Backend, output: &mut OutputWriter) -> Result<()> {
    let credentials = Credentials::new(args.email.trim(), args.password);

    let registration = backend
        .request(
            output,
            "Creating account",
            backend.api.auth.register(&credentials, backend.cancel_token()),
        )
        .await?;
    tracing::info!(endpoint = %registration.endpoint, "Account created");

    if output.format() == OutputFormat::Human {
        output.success(&format!("✓ Account created for {}", credentials.email))?;
        output.info("Run `matchday login` to start a session.")
    } else {
        output.data(&json!({ "email": credentials.email, "endpoint": registration.endpoint }))
    }
}

/// Handle the forgot command
pub async fn handle_forgot(args: ForgotArgs, backend: &Backend, output: &mut OutputWriter) -> Result<()> {
    let response = backend
        .request(
            output,
            "Requesting password reset",
            backend.api.auth.request_password_reset(args.email.trim(), backend.cancel_token()),
        )
        .await?;

    let message = response
        .map(|r| r.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| "If the account exists, a reset link is on its way.".to_string());

    if output.format() == OutputFormat::Human {
        output.success(&message)
    } else {
        output.data(&json!({ "message": message }))
    }
}

/// Handle the logout command
pub fn handle_logout(backend: &Backend, output: &mut OutputWriter) -> Result<()> {
    let was_signed_in = backend.api.auth.is_authenticated();
    backend.api.auth.logout()?;

    if output.format() != OutputFormat::Human {
        return output.data(&json!({ "authenticated": false }));
    }

    if was_signed_in {
        output.success("✓ Signed out")
    } else {
        output.info("No active session")
    }
}

/// Handle the whoami command
pub fn handle_whoami(backend: &Backend, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let authenticated = backend.api.auth.is_authenticated();

    if output.format() != OutputFormat::Human {
        return output.data(&json!({
            "authenticated": authenticated,
            "base_url": config.api.base_url,
            "session_file": backend.session_path,
        }));
    }

    output.table(
        &["KEY", "VALUE"],
        vec![
            vec![
                "session".to_string(),
                if authenticated { "active" } else { "none" }.to_string(),
            ],
            vec!["base_url".to_string(), config.api.base_url.clone()],
            vec!["session_file".to_string(), backend.session_path.display().to_string()],
        ],
    )
}
