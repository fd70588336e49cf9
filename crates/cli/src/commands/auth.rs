//! Session management commands.
//!
//! # Environment Variables
//!
//! - `MARIGOLD_API_BASE_URL` - Base URL of the storefront backend
//! - `MARIGOLD_CREDENTIAL_DIR` - Directory for the durable credential file

use marigold_client::api::RegisterRequest;
use marigold_client::{AuthApi, AuthSession, ClientConfig, TokenStore};
use marigold_core::{Email, RouteDecision};

use super::CommandError;

/// Build the session context from environment configuration.
fn session() -> Result<AuthSession, CommandError> {
    let config = ClientConfig::from_env()?;
    let api = AuthApi::new(&config.api_base_url);
    let tokens = TokenStore::file_backed(&config.credential_dir);
    Ok(AuthSession::with_splash_delay(
        api,
        tokens,
        config.splash_delay,
    ))
}

/// Log in and persist the returned credential.
pub async fn login(email: &str, password: &str) -> Result<(), CommandError> {
    let email = Email::parse(email)?;
    let session = session()?;
    let user = session.login(email.as_str(), password).await?;

    tracing::info!("Logged in as {} ({})", user.email, user.role);
    Ok(())
}

/// Register a new account and persist the returned credential.
pub async fn register(
    name: &str,
    email: &str,
    password: &str,
    phone: Option<String>,
) -> Result<(), CommandError> {
    let email = Email::parse(email)?;
    let session = session()?;
    let user = session
        .register(&RegisterRequest {
            name: name.to_owned(),
            email: email.into_inner(),
            password: password.to_owned(),
            phone,
        })
        .await?;

    tracing::info!("Registered {} ({})", user.email, user.role);
    Ok(())
}

/// Log out: best-effort remote invalidation, unconditional local cleanup.
pub async fn logout() -> Result<(), CommandError> {
    let session = session()?;
    session.logout().await;

    tracing::info!("Logged out; credential cleared");
    Ok(())
}

/// Bootstrap the session and show the resolved user.
pub async fn whoami() -> Result<(), CommandError> {
    let session = session()?;
    let decision = session.bootstrap().await;

    match session.state().user {
        Some(user) => {
            tracing::info!("{} ({})", user.email, user.role);
            if let Some(name) = user.name {
                tracing::info!("  Name: {name}");
            }
        }
        None => tracing::info!("Anonymous session"),
    }
    tracing::info!("Startup route: {}", decision.route());
    Ok(())
}

/// Show the startup routing decision without touching the network.
pub fn route() -> Result<(), CommandError> {
    let config = ClientConfig::from_env()?;
    let tokens = TokenStore::file_backed(&config.credential_dir);

    let decision = RouteDecision::resolve(tokens.get().as_ref());
    match &decision {
        RouteDecision::NoToken => tracing::info!("No stored credential"),
        RouteDecision::GuestSession => tracing::info!("Guest session"),
        RouteDecision::Authorized(claims) => tracing::info!("Authorized as {}", claims.role),
        RouteDecision::Unauthorized(claims) => tracing::info!("Unauthorized role {}", claims.role),
        RouteDecision::DecodeFailed(e) => tracing::info!("Credential undecodable: {e}"),
    }
    tracing::info!("Route: {}", decision.route());
    Ok(())
}

/// Request a password-reset email.
pub async fn forgot_password(email: &str) -> Result<(), CommandError> {
    let email = Email::parse(email)?;
    let config = ClientConfig::from_env()?;
    let api = AuthApi::new(&config.api_base_url);
    api.forgot_password(email.as_str()).await?;

    tracing::info!("Password reset requested for {email}");
    Ok(())
}
