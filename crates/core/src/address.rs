//! Address - validated wallet/account key
//!
//! The empty string plays the role of the "zero address" in the source
//! system and is rejected at construction. Mint and burn endpoints are
//! expressed as `Option<&Address>` instead of a magic value.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur when constructing an address
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("address cannot be empty")]
    Empty,

    #[error("address cannot contain whitespace: {0:?}")]
    ContainsWhitespace(String),
}

/// A validated wallet/account key.
///
/// # Invariant
/// The inner string is non-empty and contains no whitespace.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    /// Create a new address, rejecting empty or whitespace-bearing keys.
    pub fn new(value: impl Into<String>) -> Result<Self, AddressError> {
        let value = value.into();
        if value.is_empty() {
            return Err(AddressError::Empty);
        }
        if value.chars().any(char::is_whitespace) {
            return Err(AddressError::ContainsWhitespace(value));
        }
        Ok(Self(value))
    }

    /// Get the inner string
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Address {
    type Error = AddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}
