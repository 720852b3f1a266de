//! Claim topics and country codes
//!
//! A claim topic identifies a category of attestation an identity can be
//! verified against (KYC, accreditation, collateral backing, ...).
//! Country codes follow ISO 3166-1 numeric.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier for a category of identity attestation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimTopic(pub u32);

impl ClaimTopic {
    /// Create a new claim topic
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw topic identifier
    #[inline]
    pub const fn id(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for ClaimTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "topic:{}", self.0)
    }
}

impl From<u32> for ClaimTopic {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// ISO 3166-1 numeric country code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CountryCode(pub u16);

impl CountryCode {
    /// Create a new country code
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Get the raw numeric code
    #[inline]
    pub const fn code(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "country:{}", self.0)
    }
}

impl From<u16> for CountryCode {
    fn from(code: u16) -> Self {
        Self(code)
    }
}
