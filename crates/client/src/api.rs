//! Remote auth API client.
//!
//! Thin JSON-over-HTTP wrapper around the storefront backend's auth
//! endpoints. The client is cheaply cloneable via `Arc` and holds no session
//! state of its own; [`crate::session::AuthSession`] composes it with the
//! credential store.

use std::sync::Arc;

use marigold_core::{Credential, Role};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;
use url::Url;

/// Errors that can occur when calling the auth backend.
#[derive(Debug, Error)]
pub enum AuthApiError {
    /// HTTP transport failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, as returned.
        message: String,
    },

    /// A login or register call is already in flight.
    #[error("an authentication request is already in flight")]
    InFlight,
}

/// Account profile returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Backend account identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Account email.
    pub email: String,
    /// Account role.
    #[serde(default)]
    pub role: Role,
}

/// Registration payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Successful login/register response.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    /// Bearer credential to store.
    pub token: Credential,
    /// Authenticated account profile.
    pub user: UserProfile,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct ForgotPasswordRequest<'a> {
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct ResetPasswordRequest<'a> {
    token: &'a str,
    password: &'a str,
}

/// Client for the storefront auth API.
#[derive(Clone)]
pub struct AuthApi {
    inner: Arc<AuthApiInner>,
}

struct AuthApiInner {
    client: reqwest::Client,
    base_url: String,
}

impl AuthApi {
    /// Create a new auth API client.
    #[must_use]
    pub fn new(base_url: &Url) -> Self {
        Self {
            inner: Arc::new(AuthApiInner {
                client: reqwest::Client::new(),
                base_url: base_url.as_str().trim_end_matches('/').to_owned(),
            }),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    /// Authenticate with email and password.
    ///
    /// # Errors
    ///
    /// Returns the remote call's failure unchanged: transport errors as
    /// [`AuthApiError::Http`], invalid credentials or any other backend
    /// rejection as [`AuthApiError::Api`]. No local retry.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, AuthApiError> {
        let response = self
            .inner
            .client
            .post(self.endpoint("/auth/login"))
            .json(&LoginRequest { email, password })
            .send()
            .await?;

        json_or_api_error(response).await
    }

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Same contract as [`AuthApi::login`].
    #[instrument(skip(self, request))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, AuthApiError> {
        let response = self
            .inner
            .client
            .post(self.endpoint("/auth/register"))
            .json(request)
            .send()
            .await?;

        json_or_api_error(response).await
    }

    /// Invalidate the credential on the backend.
    ///
    /// # Errors
    ///
    /// Returns the remote failure; callers performing logout treat this as
    /// best-effort and always proceed with local cleanup.
    #[instrument(skip(self, credential))]
    pub async fn logout(&self, credential: &Credential) -> Result<(), AuthApiError> {
        let response = self
            .inner
            .client
            .post(self.endpoint("/auth/logout"))
            .bearer_auth(credential.as_str())
            .send()
            .await?;

        ack_or_api_error(response).await
    }

    /// Fetch the profile for the stored credential.
    ///
    /// # Errors
    ///
    /// Returns [`AuthApiError::Api`] when the credential is rejected (the
    /// bootstrap path clears it and falls back to anonymous).
    #[instrument(skip(self, credential))]
    pub async fn me(&self, credential: &Credential) -> Result<UserProfile, AuthApiError> {
        let response = self
            .inner
            .client
            .get(self.endpoint("/auth/me"))
            .bearer_auth(credential.as_str())
            .send()
            .await?;

        json_or_api_error(response).await
    }

    /// Request a password-reset email. Pass-through endpoint.
    ///
    /// # Errors
    ///
    /// Returns the remote call's failure unchanged.
    #[instrument(skip(self))]
    pub async fn forgot_password(&self, email: &str) -> Result<(), AuthApiError> {
        let response = self
            .inner
            .client
            .post(self.endpoint("/auth/password/forgot"))
            .json(&ForgotPasswordRequest { email })
            .send()
            .await?;

        ack_or_api_error(response).await
    }

    /// Complete a password reset. Pass-through endpoint.
    ///
    /// # Errors
    ///
    /// Returns the remote call's failure unchanged.
    #[instrument(skip(self, token, password))]
    pub async fn reset_password(&self, token: &str, password: &str) -> Result<(), AuthApiError> {
        let response = self
            .inner
            .client
            .post(self.endpoint("/auth/password/reset"))
            .json(&ResetPasswordRequest { token, password })
            .send()
            .await?;

        ack_or_api_error(response).await
    }
}

/// Parse a JSON body on success, or surface the status and body.
async fn json_or_api_error<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, AuthApiError> {
    let status = response.status();

    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(AuthApiError::Api {
            status: status.as_u16(),
            message,
        });
    }

    Ok(response.json().await?)
}

/// Accept any success status, or surface the status and body.
async fn ack_or_api_error(response: reqwest::Response) -> Result<(), AuthApiError> {
    let status = response.status();

    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(AuthApiError::Api {
            status: status.as_u16(),
            message,
        });
    }

    Ok(())
}
