//! The auth context: process-wide session state.
//!
//! [`AuthSession`] owns `{ user, loading }`, the credential store, and the
//! remote auth client. It is created once at application start and threaded
//! by reference to the UI tree root; there is no ambient singleton. Every
//! state write synchronously notifies all subscribed observers.
//!
//! Failure policy mirrors the backend contract:
//! - `login`/`register` propagate remote failures unchanged, with no retry;
//! - `logout` and the startup refresh are best-effort remote calls whose
//!   local cleanup is unconditional.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use marigold_core::RouteDecision;
use tracing::instrument;

use crate::api::{AuthApi, AuthApiError, RegisterRequest, UserProfile};
use crate::store::TokenStore;

/// In-memory session state.
///
/// Lives for the process; only the credential survives a restart. `loading`
/// starts `true` and becomes `false` exactly once, when [`AuthSession::bootstrap`]
/// completes - the UI must not treat the session as resolved before then.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    /// Authenticated profile, or `None` when anonymous.
    pub user: Option<UserProfile>,
    /// Whether the startup bootstrap is still running.
    pub loading: bool,
}

type Observer = Box<dyn Fn(&SessionState) + Send + Sync>;

/// Process-wide authentication context.
///
/// Cheaply cloneable via `Arc`; all clones share one session.
#[derive(Clone)]
pub struct AuthSession {
    inner: Arc<AuthSessionInner>,
}

struct AuthSessionInner {
    api: AuthApi,
    tokens: TokenStore,
    splash_delay: Duration,
    state: Mutex<SessionState>,
    observers: Mutex<Vec<Observer>>,
    auth_in_flight: AtomicBool,
}

/// Resets the in-flight flag when an auth call completes, on every path.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl AuthSession {
    /// Create a new session context.
    #[must_use]
    pub fn new(api: AuthApi, tokens: TokenStore) -> Self {
        Self::with_splash_delay(api, tokens, Duration::ZERO)
    }

    /// Create a session context with a cosmetic splash delay before startup
    /// routing (used by the admin-facing variant; zero means none).
    #[must_use]
    pub fn with_splash_delay(api: AuthApi, tokens: TokenStore, splash_delay: Duration) -> Self {
        Self {
            inner: Arc::new(AuthSessionInner {
                api,
                tokens,
                splash_delay,
                state: Mutex::new(SessionState {
                    user: None,
                    loading: true,
                }),
                observers: Mutex::new(Vec::new()),
                auth_in_flight: AtomicBool::new(false),
            }),
        }
    }

    /// Snapshot of the current session state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.inner
            .state
            .lock()
            .map(|state| state.clone())
            .unwrap_or_default()
    }

    /// Subscribe to state changes. The observer is called synchronously
    /// after every state write, with the state as written.
    pub fn subscribe(&self, observer: impl Fn(&SessionState) + Send + Sync + 'static) {
        if let Ok(mut observers) = self.inner.observers.lock() {
            observers.push(Box::new(observer));
        }
    }

    /// The token store backing this session.
    #[must_use]
    pub fn tokens(&self) -> &TokenStore {
        &self.inner.tokens
    }

    /// Resolve the routing decision for the currently stored credential.
    #[must_use]
    pub fn route_decision(&self) -> RouteDecision {
        RouteDecision::resolve(self.inner.tokens.get().as_ref())
    }

    /// Authenticate with email and password.
    ///
    /// On success the returned credential is persisted and `user` is set.
    ///
    /// # Errors
    ///
    /// Propagates the remote failure unchanged; returns
    /// [`AuthApiError::InFlight`] if another login/register is still running
    /// (double-submit guard).
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<UserProfile, AuthApiError> {
        let _guard = self.begin_auth_call()?;

        let response = self.inner.api.login(email, password).await?;

        self.inner.tokens.set(&response.token);
        let user = response.user;
        self.write_state(|state| state.user = Some(user.clone()));

        Ok(user)
    }

    /// Register a new account. Same contract as [`AuthSession::login`].
    ///
    /// # Errors
    ///
    /// Propagates the remote failure unchanged, or
    /// [`AuthApiError::InFlight`] on a concurrent login/register.
    #[instrument(skip(self, request))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<UserProfile, AuthApiError> {
        let _guard = self.begin_auth_call()?;

        let response = self.inner.api.register(request).await?;

        self.inner.tokens.set(&response.token);
        let user = response.user;
        self.write_state(|state| state.user = Some(user.clone()));

        Ok(user)
    }

    /// Log out.
    ///
    /// The remote invalidation is best-effort: its failure is logged, never
    /// returned. Local cleanup - credential gone, session anonymous - happens
    /// unconditionally.
    #[instrument(skip(self))]
    pub async fn logout(&self) {
        if let Some(credential) = self.inner.tokens.get()
            && let Err(e) = self.inner.api.logout(&credential).await
        {
            tracing::warn!("remote logout failed, clearing local session anyway: {e}");
        }

        self.inner.tokens.clear();
        self.write_state(|state| state.user = None);
    }

    /// Startup effect; run once at application mount.
    ///
    /// If a credential is stored (and is not the guest sentinel), refreshes
    /// the profile from `GET /auth/me`; a rejected credential is cleared and
    /// the session falls back to anonymous. `loading` becomes `false`
    /// exactly once at the end, on every path. Returns the routing decision
    /// for whatever credential survived.
    #[instrument(skip(self))]
    pub async fn bootstrap(&self) -> RouteDecision {
        if !self.inner.splash_delay.is_zero() {
            tokio::time::sleep(self.inner.splash_delay).await;
        }

        let mut refreshed: Option<UserProfile> = None;

        if let Some(credential) = self.inner.tokens.get() {
            // Guest sessions have no backend profile to refresh.
            if !credential.is_guest_sentinel() {
                match self.inner.api.me(&credential).await {
                    Ok(user) => refreshed = Some(user),
                    Err(e) => {
                        tracing::warn!("stored credential rejected, falling back to anonymous: {e}");
                        self.inner.tokens.clear();
                    }
                }
            }
        }

        let decision = self.route_decision();

        self.write_state(|state| {
            state.user = refreshed;
            state.loading = false;
        });

        decision
    }

    /// Mark an auth call in flight, rejecting a concurrent one.
    fn begin_auth_call(&self) -> Result<InFlightGuard<'_>, AuthApiError> {
        self.inner
            .auth_in_flight
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .map_err(|_| AuthApiError::InFlight)?;

        Ok(InFlightGuard(&self.inner.auth_in_flight))
    }

    /// Mutate the state, then synchronously notify every observer.
    fn write_state(&self, mutate: impl FnOnce(&mut SessionState)) {
        let snapshot = {
            let Ok(mut state) = self.inner.state.lock() else {
                return;
            };
            mutate(&mut state);
            state.clone()
        };

        if let Ok(observers) = self.inner.observers.lock() {
            for observer in observers.iter() {
                observer(&snapshot);
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use marigold_core::{Credential, Route, GUEST_ADMIN_SENTINEL};
    use url::Url;

    use crate::store::MemoryCredentialStore;

    use super::*;

    fn memory_tokens() -> TokenStore {
        TokenStore::new(
            Box::new(MemoryCredentialStore::new()),
            Box::new(MemoryCredentialStore::new()),
        )
    }

    fn session_for(server: &mockito::ServerGuard) -> AuthSession {
        let api = AuthApi::new(&Url::parse(&server.url()).unwrap());
        AuthSession::new(api, memory_tokens())
    }

    #[tokio::test]
    async fn test_initial_state_is_loading_and_anonymous() {
        let server = mockito::Server::new_async().await;
        let session = session_for(&server);

        let state = session.state();
        assert!(state.loading);
        assert!(state.user.is_none());
    }

    #[tokio::test]
    async fn test_bootstrap_without_credential() {
        let server = mockito::Server::new_async().await;
        let session = session_for(&server);

        let decision = session.bootstrap().await;

        assert_eq!(decision.route(), Route::Login);
        let state = session.state();
        assert!(!state.loading);
        assert!(state.user.is_none());
    }

    #[tokio::test]
    async fn test_bootstrap_refreshes_profile() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/auth/me")
            .with_status(200)
            .with_body(r#"{"email":"a@b.c","role":"ADMIN"}"#)
            .create_async()
            .await;

        let session = session_for(&server);
        session
            .tokens()
            .set(&Credential::from("abc.eyJyb2xlIjoiQURNSU4ifQ.sig"));

        let decision = session.bootstrap().await;

        assert_eq!(decision.route(), Route::Landing);
        let state = session.state();
        assert!(!state.loading);
        assert_eq!(state.user.unwrap().email, "a@b.c");
    }

    #[tokio::test]
    async fn test_bootstrap_clears_rejected_credential() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/auth/me")
            .with_status(401)
            .with_body("expired")
            .create_async()
            .await;

        let session = session_for(&server);
        session.tokens().set(&Credential::from("a.b.c"));

        let decision = session.bootstrap().await;

        assert_eq!(decision.route(), Route::Login);
        assert!(session.tokens().get().is_none());
        let state = session.state();
        assert!(!state.loading);
        assert!(state.user.is_none());
    }

    #[tokio::test]
    async fn test_bootstrap_guest_sentinel_skips_refresh() {
        // No /auth/me mock registered: a request would 501 and clear the
        // credential, so landing proves the refresh was skipped.
        let server = mockito::Server::new_async().await;
        let session = session_for(&server);
        session.tokens().set(&Credential::from(GUEST_ADMIN_SENTINEL));

        let decision = session.bootstrap().await;

        assert_eq!(decision.route(), Route::Landing);
        assert!(session.tokens().get().is_some());
        assert!(!session.state().loading);
    }

    #[tokio::test]
    async fn test_login_stores_credential_and_user() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/auth/login")
            .with_status(200)
            .with_body(r#"{"token":"h.p.s","user":{"email":"a@b.c","role":"CUSTOMER"}}"#)
            .create_async()
            .await;

        let session = session_for(&server);
        let user = session.login("a@b.c", "hunter22").await.unwrap();

        assert_eq!(user.email, "a@b.c");
        assert_eq!(session.tokens().get(), Some(Credential::from("h.p.s")));
        assert_eq!(session.state().user.unwrap().email, "a@b.c");
    }

    #[tokio::test]
    async fn test_login_failure_leaves_state_untouched() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/auth/login")
            .with_status(401)
            .with_body("invalid credentials")
            .create_async()
            .await;

        let session = session_for(&server);
        let err = session.login("a@b.c", "wrong").await.unwrap_err();

        assert!(matches!(err, AuthApiError::Api { status: 401, .. }));
        assert!(session.tokens().get().is_none());
        assert!(session.state().user.is_none());
    }

    #[tokio::test]
    async fn test_logout_clears_local_state_even_when_remote_fails() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/auth/logout")
            .with_status(500)
            .with_body("backend down")
            .create_async()
            .await;

        let session = session_for(&server);
        session.tokens().set(&Credential::from("h.p.s"));

        session.logout().await;

        assert!(session.tokens().get().is_none());
        assert!(session.state().user.is_none());
    }

    #[tokio::test]
    async fn test_concurrent_login_rejected_while_in_flight() {
        let server = mockito::Server::new_async().await;
        let session = session_for(&server);

        // Simulate a login still in flight.
        session.inner.auth_in_flight.store(true, Ordering::Release);

        let err = session.login("a@b.c", "pw").await.unwrap_err();
        assert!(matches!(err, AuthApiError::InFlight));
    }

    #[tokio::test]
    async fn test_in_flight_flag_resets_after_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/auth/login")
            .with_status(401)
            .with_body("nope")
            .expect(2)
            .create_async()
            .await;

        let session = session_for(&server);
        assert!(session.login("a@b.c", "x").await.is_err());
        // The guard released the flag; a second attempt reaches the backend.
        let err = session.login("a@b.c", "x").await.unwrap_err();
        assert!(matches!(err, AuthApiError::Api { status: 401, .. }));
    }

    #[tokio::test]
    async fn test_observers_notified_synchronously() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/auth/login")
            .with_status(200)
            .with_body(r#"{"token":"h.p.s","user":{"email":"a@b.c","role":"CUSTOMER"}}"#)
            .create_async()
            .await;

        let session = session_for(&server);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        session.subscribe(move |state| {
            sink.lock().unwrap().push(state.clone());
        });

        session.login("a@b.c", "pw").await.unwrap();
        session.logout().await;

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert!(seen[0].user.is_some());
        assert!(seen[1].user.is_none());
    }
}
