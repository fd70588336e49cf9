//! Delivery address records and form validation.
//!
//! An [`AddressDraft`] carries raw form input; validation promotes it to a
//! [`ValidatedAddress`] with typed phone/pincode fields. Identity
//! ([`AddressId`]) is assigned by the address book at creation, not here.

use serde::{Deserialize, Serialize};

use crate::types::contact::{ContactError, Phone, Pincode};
use crate::types::id::AddressId;

/// Errors that can occur when validating an address form.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AddressError {
    /// A required free-text field is empty.
    #[error("{field} cannot be empty")]
    EmptyField {
        /// Which field was empty.
        field: &'static str,
    },
    /// Phone or pincode failed validation.
    #[error(transparent)]
    Contact(#[from] ContactError),
}

/// A saved delivery address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Identity assigned at creation; never reused after deletion.
    pub id: AddressId,
    /// Recipient name.
    pub name: String,
    /// 10-digit contact phone.
    pub phone: Phone,
    /// 6-digit postal pincode.
    pub pincode: Pincode,
    /// Street address.
    pub address: String,
    /// City.
    pub city: String,
    /// State or region.
    pub state: String,
}

/// Raw address form input, prior to validation.
///
/// All fields are plain strings exactly as entered; [`AddressDraft::validate`]
/// is the only way to turn one into something the address book will accept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressDraft {
    pub name: String,
    pub phone: String,
    pub pincode: String,
    pub address: String,
    pub city: String,
    pub state: String,
}

/// A draft that has passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedAddress {
    pub name: String,
    pub phone: Phone,
    pub pincode: Pincode,
    pub address: String,
    pub city: String,
    pub state: String,
}

impl AddressDraft {
    /// Validate the draft.
    ///
    /// All six fields must be non-empty; phone must be exactly 10 digits and
    /// pincode exactly 6. The first violation found is returned and nothing
    /// is mutated.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError`] describing the offending field.
    pub fn validate(&self) -> Result<ValidatedAddress, AddressError> {
        let name = require_non_empty(&self.name, "name")?;
        let address = require_non_empty(&self.address, "address")?;
        let city = require_non_empty(&self.city, "city")?;
        let state = require_non_empty(&self.state, "state")?;

        let phone = Phone::parse(self.phone.trim())?;
        let pincode = Pincode::parse(self.pincode.trim())?;

        Ok(ValidatedAddress {
            name,
            phone,
            pincode,
            address,
            city,
            state,
        })
    }
}

impl ValidatedAddress {
    /// Attach an identity, producing a saved [`Address`].
    #[must_use]
    pub fn with_id(self, id: AddressId) -> Address {
        Address {
            id,
            name: self.name,
            phone: self.phone,
            pincode: self.pincode,
            address: self.address,
            city: self.city,
            state: self.state,
        }
    }
}

/// Reject empty (or whitespace-only) free-text fields.
fn require_non_empty(value: &str, field: &'static str) -> Result<String, AddressError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AddressError::EmptyField { field });
    }
    Ok(trimmed.to_owned())
}
