//! Marigold Client - storefront client library.
//!
//! Everything the Marigold front ends need to talk to the remote storefront
//! backend and keep local session state:
//!
//! - [`store`] - two-tier credential persistence (durable file + in-memory
//!   session store)
//! - [`api`] - the remote auth API client (login, register, logout, me,
//!   password reset)
//! - [`session`] - the auth context: session state, observers, startup
//!   bootstrap, role-gated route resolution
//! - [`geocode`] - reverse geocoding and geolocation for address prefill
//! - [`address_book`] - validated delivery-address CRUD
//! - [`config`] - environment-variable configuration
//!
//! The decoded-claims routing in [`marigold_core`] is a UI convenience only;
//! nothing in this crate treats it as an authorization decision. The backend
//! re-validates the bearer credential on every call.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod address_book;
pub mod api;
pub mod config;
pub mod geocode;
pub mod session;
pub mod store;

pub use address_book::{AddressBook, AddressBookError};
pub use api::{AuthApi, AuthApiError, RegisterRequest, UserProfile};
pub use config::{ClientConfig, ConfigError};
pub use geocode::{GeoPosition, GeocodeClient, GeocodeError, PositionError, PositionProvider};
pub use session::{AuthSession, SessionState};
pub use store::{CredentialStore, FileCredentialStore, MemoryCredentialStore, TokenStore};
