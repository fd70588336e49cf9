//! Bearer credential type.
//!
//! A [`Credential`] is the opaque string handed back by the auth backend on
//! login. It is either the reserved guest sentinel or a three-segment signed
//! claims token (`header.payload.signature`). This type never inspects the
//! signature; it only carries the string and exposes the payload segment for
//! decoding.

use serde::{Deserialize, Serialize};

/// Reserved sentinel value denoting a guest/demo admin session.
///
/// A stored credential equal to this value routes straight to the landing
/// surface without any claims decoding.
pub const GUEST_ADMIN_SENTINEL: &str = "admin_guest_session";

/// An opaque bearer credential.
///
/// Owned exclusively by the credential store; never mutated, only replaced
/// or deleted wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    /// Create a credential from a raw token string.
    #[must_use]
    pub const fn new(token: String) -> Self {
        Self(token)
    }

    /// Returns the credential as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the credential and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Whether this credential is the reserved guest sentinel.
    #[must_use]
    pub fn is_guest_sentinel(&self) -> bool {
        self.0 == GUEST_ADMIN_SENTINEL
    }

    /// The period-separated segments of the token.
    ///
    /// A well-formed claims token has exactly three: header, payload,
    /// signature.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }
}

impl std::fmt::Display for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Credential {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl From<&str> for Credential {
    fn from(token: &str) -> Self {
        Self(token.to_owned())
    }
}

impl From<Credential> for String {
    fn from(credential: Credential) -> Self {
        credential.0
    }
}

impl AsRef<str> for Credential {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_guest_sentinel() {
        assert!(Credential::from(GUEST_ADMIN_SENTINEL).is_guest_sentinel());
        assert!(!Credential::from("abc.def.ghi").is_guest_sentinel());
    }

    #[test]
    fn test_segments() {
        let credential = Credential::from("abc.def.ghi");
        let segments: Vec<_> = credential.segments().collect();
        assert_eq!(segments, vec!["abc", "def", "ghi"]);
    }

    #[test]
    fn test_serde_transparent() {
        let credential = Credential::from("abc.def.ghi");
        let json = serde_json::to_string(&credential).unwrap();
        assert_eq!(json, "\"abc.def.ghi\"");
    }
}
