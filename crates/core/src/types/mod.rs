//! Core types for Marigold Market.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod claims;
pub mod contact;
pub mod credential;
pub mod email;
pub mod id;
pub mod price;
pub mod role;
pub mod route;

pub use claims::{Claims, DecodeError};
pub use contact::{ContactError, Phone, Pincode};
pub use credential::{Credential, GUEST_ADMIN_SENTINEL};
pub use email::{Email, EmailError};
pub use id::*;
pub use price::{CurrencyCode, Price};
pub use role::Role;
pub use route::{Route, RouteDecision};
