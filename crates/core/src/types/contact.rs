//! Phone number and postal pincode types.
//!
//! Delivery addresses require an exactly-10-digit phone number and an
//! exactly-6-digit pincode; both are validated at the edge so downstream
//! code only ever sees well-formed values.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Phone`] or [`Pincode`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum ContactError {
    /// The input string is empty.
    #[error("{field} cannot be empty")]
    Empty {
        /// Which field was empty.
        field: &'static str,
    },
    /// The input has the wrong number of digits.
    #[error("{field} must be exactly {expected} digits (got {found})")]
    WrongLength {
        /// Which field was rejected.
        field: &'static str,
        /// Required digit count.
        expected: usize,
        /// Digit count found.
        found: usize,
    },
    /// The input contains a non-digit character.
    #[error("{field} must contain only digits")]
    NonDigit {
        /// Which field was rejected.
        field: &'static str,
    },
}

/// A 10-digit phone number.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    /// Required number of digits.
    pub const DIGITS: usize = 10;

    /// Parse a `Phone` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, contains a non-digit
    /// character, or is not exactly 10 digits long.
    pub fn parse(s: &str) -> Result<Self, ContactError> {
        parse_digits(s, "phone", Self::DIGITS).map(Self)
    }

    /// Returns the phone number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Phone {
    type Err = ContactError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A 6-digit postal pincode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Pincode(String);

impl Pincode {
    /// Required number of digits.
    pub const DIGITS: usize = 6;

    /// Parse a `Pincode` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, contains a non-digit
    /// character, or is not exactly 6 digits long.
    pub fn parse(s: &str) -> Result<Self, ContactError> {
        parse_digits(s, "pincode", Self::DIGITS).map(Self)
    }

    /// Returns the pincode as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Pincode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Pincode {
    type Err = ContactError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Validate an all-digit string of an exact length.
fn parse_digits(s: &str, field: &'static str, expected: usize) -> Result<String, ContactError> {
    if s.is_empty() {
        return Err(ContactError::Empty { field });
    }

    if !s.chars().all(|c| c.is_ascii_digit()) {
        return Err(ContactError::NonDigit { field });
    }

    if s.len() != expected {
        return Err(ContactError::WrongLength {
            field,
            expected,
            found: s.len(),
        });
    }

    Ok(s.to_owned())
}
