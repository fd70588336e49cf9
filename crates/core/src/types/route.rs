//! Role-gated route resolution.
//!
//! One-shot state machine evaluated at application load: a stored credential
//! (or its absence) resolves to a terminal [`RouteDecision`], which maps to
//! the surface the UI should navigate to. Resolution is a pure function so a
//! future server-verified variant can replace it without touching call sites.

use serde::{Deserialize, Serialize};

use super::claims::{Claims, DecodeError};
use super::credential::Credential;

/// Navigable surfaces the router can resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    /// Authenticated landing surface (dashboard).
    Landing,
    /// Login surface.
    Login,
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Landing => write!(f, "landing"),
            Self::Login => write!(f, "login"),
        }
    }
}

/// Terminal state of the startup routing state machine.
///
/// Special-case sentinel handling takes precedence over decoded role claims:
/// a guest-sentinel credential resolves to [`RouteDecision::GuestSession`]
/// without any decode attempt.
#[derive(Debug, Clone)]
pub enum RouteDecision {
    /// No stored credential.
    NoToken,
    /// Stored credential equals the reserved guest sentinel.
    GuestSession,
    /// Decoded claims carry a privileged role.
    Authorized(Claims),
    /// Decoded claims carry a non-privileged role.
    Unauthorized(Claims),
    /// The credential could not be decoded.
    DecodeFailed(DecodeError),
}

impl RouteDecision {
    /// Resolve the routing decision for an optional stored credential.
    ///
    /// Never returns an error and never panics; decode failures are a
    /// terminal state of the machine, not a fault.
    #[must_use]
    pub fn resolve(credential: Option<&Credential>) -> Self {
        let Some(credential) = credential else {
            return Self::NoToken;
        };

        if credential.is_guest_sentinel() {
            return Self::GuestSession;
        }

        match Claims::decode(credential) {
            Ok(claims) if claims.role.is_privileged() => Self::Authorized(claims),
            Ok(claims) => Self::Unauthorized(claims),
            Err(e) => Self::DecodeFailed(e),
        }
    }

    /// The surface this decision routes to.
    #[must_use]
    pub const fn route(&self) -> Route {
        match self {
            Self::GuestSession | Self::Authorized(_) => Route::Landing,
            Self::NoToken | Self::Unauthorized(_) | Self::DecodeFailed(_) => Route::Login,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use base64::{Engine, engine::general_purpose::STANDARD};

    use super::*;
    use crate::types::credential::GUEST_ADMIN_SENTINEL;
    use crate::types::role::Role;

    fn token_for_role(role: &str) -> Credential {
        let payload = STANDARD.encode(format!(r#"{{"role":"{role}"}}"#));
        Credential::from(format!("abc.{}.sig", payload.trim_end_matches('=')))
    }

    #[test]
    fn test_no_token_routes_to_login() {
        let decision = RouteDecision::resolve(None);
        assert!(matches!(decision, RouteDecision::NoToken));
        assert_eq!(decision.route(), Route::Login);
    }

    #[test]
    fn test_guest_sentinel_routes_to_landing() {
        let credential = Credential::from(GUEST_ADMIN_SENTINEL);
        let decision = RouteDecision::resolve(Some(&credential));
        assert!(matches!(decision, RouteDecision::GuestSession));
        assert_eq!(decision.route(), Route::Landing);
    }

    #[test]
    fn test_sentinel_wins_even_though_undecodable() {
        // The sentinel is not a three-segment token; precedence means we
        // never try to decode it.
        let credential = Credential::from(GUEST_ADMIN_SENTINEL);
        assert!(Claims::decode(&credential).is_err());
        assert_eq!(
            RouteDecision::resolve(Some(&credential)).route(),
            Route::Landing
        );
    }

    #[test]
    fn test_privileged_roles_route_to_landing() {
        for role in ["ADMIN", "SUPER_ADMIN"] {
            let credential = token_for_role(role);
            let decision = RouteDecision::resolve(Some(&credential));
            assert!(matches!(decision, RouteDecision::Authorized(_)), "{role}");
            assert_eq!(decision.route(), Route::Landing, "{role}");
        }
    }

    #[test]
    fn test_other_roles_route_to_login() {
        for role in ["CUSTOMER", "VENDOR", "DELIVERY_AGENT"] {
            let credential = token_for_role(role);
            let decision = RouteDecision::resolve(Some(&credential));
            assert!(matches!(decision, RouteDecision::Unauthorized(_)), "{role}");
            assert_eq!(decision.route(), Route::Login, "{role}");
        }
    }

    #[test]
    fn test_unauthorized_carries_decoded_claims() {
        let credential = token_for_role("CUSTOMER");
        match RouteDecision::resolve(Some(&credential)) {
            RouteDecision::Unauthorized(claims) => assert_eq!(claims.role, Role::Customer),
            other => panic!("unexpected decision: {other:?}"),
        }
    }

    #[test]
    fn test_malformed_tokens_route_to_login() {
        for raw in ["abc", "a.b", "a.b.c.d", "h.%%%%.s", "h..s"] {
            let credential = Credential::from(raw);
            let decision = RouteDecision::resolve(Some(&credential));
            assert!(matches!(decision, RouteDecision::DecodeFailed(_)), "{raw}");
            assert_eq!(decision.route(), Route::Login, "{raw}");
        }
    }
}
