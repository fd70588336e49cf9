//! Marigold Core - Shared types library.
//!
//! This crate provides common types used across all Marigold Market components:
//! - `client` - Storefront client library (auth session, address book, cart)
//! - `cli` - Command-line front end
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. Claim decoding and route resolution live here precisely because
//! they are pure: a `Credential` string goes in, a `RouteDecision` comes out,
//! and nothing here ever touches the network or a credential store.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for credentials, claims, roles, routes,
//!   emails, phone numbers, pincodes, IDs, and prices
//! - [`address`] - Validated delivery address records
//! - [`cart`] - Shopping cart state and its reducer

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod address;
pub mod cart;
pub mod types;

pub use types::*;
