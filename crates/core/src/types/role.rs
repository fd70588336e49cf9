//! User roles carried in decoded claims.

use serde::{Deserialize, Serialize};

/// Role claim from a decoded credential.
///
/// The backend encodes roles in `SCREAMING_SNAKE_CASE`. Unknown role strings
/// deserialize to [`Role::Unknown`] rather than failing the whole decode, so
/// a new backend role degrades to the login surface instead of a decode
/// error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Full access including admin user management.
    SuperAdmin,
    /// Full access to store management.
    Admin,
    /// Vendor-facing seller account.
    Vendor,
    /// Regular customer account.
    #[default]
    Customer,
    /// Any role string this client does not recognize.
    #[serde(other)]
    Unknown,
}

impl Role {
    /// Whether this role may enter the admin landing surface.
    ///
    /// The privileged set is exactly {`ADMIN`, `SUPER_ADMIN`}.
    #[must_use]
    pub const fn is_privileged(self) -> bool {
        matches!(self, Self::SuperAdmin | Self::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SuperAdmin => write!(f, "SUPER_ADMIN"),
            Self::Admin => write!(f, "ADMIN"),
            Self::Vendor => write!(f, "VENDOR"),
            Self::Customer => write!(f, "CUSTOMER"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SUPER_ADMIN" => Ok(Self::SuperAdmin),
            "ADMIN" => Ok(Self::Admin),
            "VENDOR" => Ok(Self::Vendor),
            "CUSTOMER" => Ok(Self::Customer),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}
