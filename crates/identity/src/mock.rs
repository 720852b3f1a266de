//! Mock identity registry and claim store
//!
//! Deterministic in-memory implementations of the identity boundary,
//! used by unit tests, the integration suite and demo wiring.

use std::collections::HashMap;
use std::sync::RwLock;

use aegis_core::{Address, ClaimTopic, CountryCode};
use chrono::{DateTime, Utc};

use crate::claim::{Claim, ClaimSource};
use crate::registry::{IdentityId, IdentityRegistry};

#[derive(Debug, Clone)]
struct Registration {
    identity: IdentityId,
    country: CountryCode,
    topics: Vec<ClaimTopic>,
}

/// In-memory identity registry.
///
/// Interior mutability lets tests mutate registrations while the engine
/// holds the registry behind `Arc<dyn IdentityRegistry>`.
#[derive(Debug, Default)]
pub struct MockIdentityRegistry {
    registrations: RwLock<HashMap<Address, Registration>>,
}

impl MockIdentityRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a wallet under an identity with a country and claim topics
    pub fn register(
        &self,
        address: Address,
        identity: IdentityId,
        country: CountryCode,
        topics: Vec<ClaimTopic>,
    ) {
        self.registrations.write().expect("registry lock poisoned").insert(
            address,
            Registration {
                identity,
                country,
                topics,
            },
        );
    }

    /// Remove a wallet registration
    pub fn deregister(&self, address: &Address) {
        self.registrations
            .write()
            .expect("registry lock poisoned")
            .remove(address);
    }

    /// Grant an additional claim topic to a registered wallet
    pub fn grant_topic(&self, address: &Address, topic: ClaimTopic) {
        if let Some(reg) = self
            .registrations
            .write()
            .expect("registry lock poisoned")
            .get_mut(address)
        {
            if !reg.topics.contains(&topic) {
                reg.topics.push(topic);
            }
        }
    }

    /// Revoke a claim topic from a registered wallet
    pub fn revoke_topic(&self, address: &Address, topic: ClaimTopic) {
        if let Some(reg) = self
            .registrations
            .write()
            .expect("registry lock poisoned")
            .get_mut(address)
        {
            reg.topics.retain(|t| *t != topic);
        }
    }
}

impl IdentityRegistry for MockIdentityRegistry {
    fn is_registered(&self, address: &Address) -> bool {
        self.registrations
            .read()
            .expect("registry lock poisoned")
            .contains_key(address)
    }

    fn is_verified(&self, address: &Address, required: &[ClaimTopic]) -> bool {
        let registrations = self.registrations.read().expect("registry lock poisoned");
        match registrations.get(address) {
            Some(reg) => required.iter().all(|topic| reg.topics.contains(topic)),
            None => false,
        }
    }

    fn country_of(&self, address: &Address) -> Option<CountryCode> {
        self.registrations
            .read()
            .expect("registry lock poisoned")
            .get(address)
            .map(|reg| reg.country)
    }

    fn identity_of(&self, address: &Address) -> Option<IdentityId> {
        self.registrations
            .read()
            .expect("registry lock poisoned")
            .get(address)
            .map(|reg| reg.identity.clone())
    }
}

/// In-memory claim store standing in for the token's own identity.
#[derive(Debug, Default)]
pub struct MockClaimStore {
    claims: RwLock<HashMap<ClaimTopic, Claim>>,
}

impl MockClaimStore {
    /// Create an empty claim store
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or replace the claim for a topic
    pub fn set_claim(&self, claim: Claim) {
        self.claims
            .write()
            .expect("claim lock poisoned")
            .insert(claim.topic, claim);
    }

    /// Remove the claim for a topic
    pub fn revoke_claim(&self, topic: ClaimTopic) {
        self.claims.write().expect("claim lock poisoned").remove(&topic);
    }

    /// Expire the claim for a topic at the given instant
    pub fn expire_claim(&self, topic: ClaimTopic, at: DateTime<Utc>) {
        if let Some(claim) = self.claims.write().expect("claim lock poisoned").get_mut(&topic) {
            claim.expires_at = at;
        }
    }
}

impl ClaimSource for MockClaimStore {
    fn claim_of(&self, topic: ClaimTopic) -> Option<Claim> {
        self.claims
            .read()
            .expect("claim lock poisoned")
            .get(&topic)
            .cloned()
    }
}
