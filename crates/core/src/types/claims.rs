//! Claims decoding from a bearer credential.
//!
//! A well-formed credential is three period-separated segments; the middle
//! one is the claims payload in URL-safe base64. Decoding substitutes the
//! URL-safe alphabet back to the standard one (`-`→`+`, `_`→`/`), pads to a
//! multiple of 4, base64-decodes, and parses JSON.
//!
//! No signature verification happens here. The decoded claims drive UI
//! routing only and must never be treated as an authorization boundary; the
//! backend re-checks the token on every call.

use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::credential::Credential;
use super::role::Role;

/// Errors that can occur when decoding a [`Credential`] into [`Claims`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum DecodeError {
    /// The token does not have exactly three segments.
    #[error("expected 3 token segments, found {found}")]
    SegmentCount {
        /// Number of segments found.
        found: usize,
    },
    /// The payload segment is not valid base64.
    #[error("payload is not valid base64: {0}")]
    InvalidBase64(String),
    /// The decoded payload is not valid JSON claims.
    #[error("payload is not a valid claims record: {0}")]
    InvalidPayload(String),
}

/// Claims decoded from a credential payload.
///
/// Ephemeral: always re-derived from the stored credential, never persisted
/// on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Role claim, used for route resolution.
    pub role: Role,
    /// Subject identifier, if the backend includes one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Account email, if the backend includes one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Expiry as a Unix timestamp in seconds, if present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

impl Claims {
    /// Decode claims from a credential.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] on wrong segment count, invalid base64, or an
    /// unparseable payload. Callers must catch this and apply their fallback
    /// policy (route to login); it is never fatal.
    pub fn decode(credential: &Credential) -> Result<Self, DecodeError> {
        let segments: Vec<&str> = credential.segments().collect();
        let [_, payload, _] = segments.as_slice() else {
            return Err(DecodeError::SegmentCount {
                found: segments.len(),
            });
        };

        let bytes = decode_base64_url(payload)?;

        serde_json::from_slice(&bytes).map_err(|e| DecodeError::InvalidPayload(e.to_string()))
    }

    /// Expiry as a UTC timestamp, if the claims carry one.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|exp| DateTime::from_timestamp(exp, 0))
    }

    /// Whether the claims are expired relative to `now`.
    ///
    /// Claims without an `exp` field never expire.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_some_and(|at| at <= now)
    }
}

/// Decode a URL-safe base64 segment via the standard alphabet.
///
/// Substitutes `-`→`+` and `_`→`/`, then pads with `=` to a multiple of 4.
fn decode_base64_url(segment: &str) -> Result<Vec<u8>, DecodeError> {
    let mut standard: String = segment
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();

    while standard.len() % 4 != 0 {
        standard.push('=');
    }

    STANDARD
        .decode(&standard)
        .map_err(|e| DecodeError::InvalidBase64(e.to_string()))
}
