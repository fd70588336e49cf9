//! Integration tests for Marigold Market.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p marigold-integration-tests
//! ```
//!
//! The remote storefront backend is stood in for by a `mockito` server, so
//! the suite runs hermetically: no live backend, no credentials.
//!
//! # Test Categories
//!
//! - `startup_routing` - end-to-end routing for stored credentials
//! - `session_flow` - login/logout/bootstrap against the mock backend

use std::path::{Path, PathBuf};

use base64::{Engine, engine::general_purpose::STANDARD};
use marigold_client::{AuthApi, AuthSession, TokenStore};
use mockito::ServerGuard;
use url::Url;

/// A session context wired to a mock backend, with a file-backed credential
/// store in a fresh temp directory.
pub struct TestContext {
    pub session: AuthSession,
    credential_dir: PathBuf,
}

impl TestContext {
    /// Create a context talking to `server`, with an empty credential store.
    ///
    /// # Panics
    ///
    /// Panics if the mock server URL is unparseable (test setup bug).
    #[must_use]
    #[allow(clippy::unwrap_used)]
    pub fn new(server: &ServerGuard, tag: &str) -> Self {
        let credential_dir = std::env::temp_dir().join(format!(
            "marigold-it-{tag}-{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&credential_dir);

        let api = AuthApi::new(&Url::parse(&server.url()).unwrap());
        let tokens = TokenStore::file_backed(&credential_dir);

        Self {
            session: AuthSession::new(api, tokens),
            credential_dir,
        }
    }

    /// The token store backing the session.
    #[must_use]
    pub fn tokens(&self) -> &TokenStore {
        self.session.tokens()
    }

    /// Directory holding the durable credential file.
    #[must_use]
    pub fn credential_dir(&self) -> &Path {
        &self.credential_dir
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.credential_dir);
    }
}

/// Build a three-segment token whose payload is `payload_json`, in the
/// URL-safe unpadded form the backend issues.
#[must_use]
pub fn token_with_payload(payload_json: &str) -> String {
    let payload: String = STANDARD
        .encode(payload_json)
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();
    format!("header.{payload}.signature")
}
