//! Collateral claims
//!
//! A claim bounds what the token may issue: the collateral gate fetches
//! the claim of its configured topic from the token's own identity and
//! compares the encoded amount against post-mint supply. Claims are never
//! persisted by the engine; they are re-derived on every check.

use aegis_core::{Amount, ClaimTopic};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An attestation carried by an identity, encoding an amount and expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    /// Topic this claim attests
    pub topic: ClaimTopic,
    /// Amount the claim vouches for (e.g., collateral backing)
    pub amount: Amount,
    /// Issuer of the attestation
    pub issuer: String,
    /// Moment the claim stops being valid
    pub expires_at: DateTime<Utc>,
}

impl Claim {
    /// Create a new claim
    pub fn new(
        topic: ClaimTopic,
        amount: Amount,
        issuer: impl Into<String>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            topic,
            amount,
            issuer: issuer.into(),
            expires_at,
        }
    }

    /// Whether the claim is still valid at the given instant
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

/// Source of the token's own claims (the token contract's identity in the
/// source system). Consulted by the collateral gate on every mint.
pub trait ClaimSource: Send + Sync {
    /// The single claim of the given topic, if one exists
    fn claim_of(&self, topic: ClaimTopic) -> Option<Claim>;
}
