//! Identity registry trait
//!
//! The registry answers three questions about a wallet: is it registered,
//! does it hold the required claim topics, and which identity/country
//! does it resolve to. How claims are issued or signed is not this
//! crate's concern.

use aegis_core::{Address, ClaimTopic, CountryCode};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of a registered identity.
///
/// Several wallets may resolve to the same identity; wallet recovery
/// relies on that.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityId(String);

impl IdentityId {
    /// Create a new identity id
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Get the inner string
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdentityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// External identity-registry collaborator.
pub trait IdentityRegistry: Send + Sync {
    /// Whether the wallet is known to the registry at all
    fn is_registered(&self, address: &Address) -> bool;

    /// Whether the wallet holds valid attestations for every required topic
    fn is_verified(&self, address: &Address, required: &[ClaimTopic]) -> bool;

    /// Country the wallet's identity is registered in
    fn country_of(&self, address: &Address) -> Option<CountryCode>;

    /// Identity the wallet resolves to
    fn identity_of(&self, address: &Address) -> Option<IdentityId>;
}
