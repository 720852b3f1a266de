//! Collateral-claim gate
//!
//! The ceiling is not stored: on every mint the gate fetches the claim
//! of its configured topic from the token's own identity and compares
//! the encoded amount against post-mint supply.

use aegis_core::{Amount, ClaimTopic};
use aegis_identity::ClaimSource;
use chrono::{DateTime, Utc};

use crate::error::GateError;

/// Mint ceiling derived from an external collateral attestation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollateralGate {
    topic: ClaimTopic,
}

impl CollateralGate {
    /// Create a gate bound to the claim topic carrying the backing
    pub fn new(topic: ClaimTopic) -> Self {
        Self { topic }
    }

    /// The configured claim topic
    pub fn topic(&self) -> ClaimTopic {
        self.topic
    }

    /// Reject a mint lacking a valid claim or outgrowing the backing.
    pub fn check_mint(
        &self,
        source: &dyn ClaimSource,
        supply: Amount,
        amount: Amount,
        now: DateTime<Utc>,
    ) -> Result<(), GateError> {
        let claim = source
            .claim_of(self.topic)
            .filter(|claim| claim.is_valid_at(now))
            .ok_or(GateError::NoCollateralClaim { topic: self.topic })?;

        let exceeded = match supply.checked_add(amount) {
            Some(post) => post > claim.amount,
            None => true,
        };
        if exceeded {
            return Err(GateError::InsufficientCollateral {
                collateral: claim.amount,
                supply,
                requested: amount,
            });
        }
        Ok(())
    }
}
