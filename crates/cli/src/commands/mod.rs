//! CLI command implementations.

use marigold_client::address_book::PrefillError;
use marigold_client::{AuthApiError, ConfigError};
use marigold_core::address::AddressError;
use marigold_core::EmailError;
use thiserror::Error;

pub mod address;
pub mod auth;

/// Errors that can occur while running a CLI command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The auth backend rejected or failed a call.
    #[error(transparent)]
    Auth(#[from] AuthApiError),

    /// The supplied email address is malformed.
    #[error("invalid email: {0}")]
    Email(#[from] EmailError),

    /// Address form validation failed.
    #[error(transparent)]
    Address(#[from] AddressError),

    /// Geolocation or reverse geocoding failed.
    #[error(transparent)]
    Prefill(#[from] PrefillError),

    /// No geocoding API key configured.
    #[error("GEOCODE_API_KEY is not set; address prefill is unavailable")]
    GeocodeUnavailable,
}
