//! Authorization boundary
//!
//! Role storage is an external collaborator: the engine consumes one
//! boolean per operation category and never inspects how the grant came
//! to be.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use aegis_core::Address;
use strum_macros::{Display, EnumString};

/// Privileged operation categories the engine asks about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum OperationCategory {
    Freeze,
    ForcedTransfer,
    Recovery,
    Pause,
    Mint,
    Burn,
    Settings,
}

/// External authorization collaborator.
pub trait Authorizer: Send + Sync {
    /// Whether the actor may perform operations of the given category
    fn is_authorized(&self, actor: &Address, category: OperationCategory) -> bool;
}

/// Grants everything to everyone. Test and demo wiring only.
#[derive(Debug, Default)]
pub struct AllowAllAuthorizer;

impl Authorizer for AllowAllAuthorizer {
    fn is_authorized(&self, _actor: &Address, _category: OperationCategory) -> bool {
        true
    }
}

/// Fixed grant table with interior mutability so wiring can evolve
/// while the engine holds the authorizer behind an `Arc`.
#[derive(Debug, Default)]
pub struct StaticAuthorizer {
    grants: RwLock<HashMap<Address, HashSet<OperationCategory>>>,
}

impl StaticAuthorizer {
    /// Create an empty grant table
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant a category to an actor
    pub fn grant(&self, actor: Address, category: OperationCategory) {
        self.grants
            .write()
            .expect("grant lock poisoned")
            .entry(actor)
            .or_default()
            .insert(category);
    }

    /// Revoke a category from an actor
    pub fn revoke(&self, actor: &Address, category: OperationCategory) {
        if let Some(set) = self
            .grants
            .write()
            .expect("grant lock poisoned")
            .get_mut(actor)
        {
            set.remove(&category);
        }
    }
}

impl Authorizer for StaticAuthorizer {
    fn is_authorized(&self, actor: &Address, category: OperationCategory) -> bool {
        self.grants
            .read()
            .expect("grant lock poisoned")
            .get(actor)
            .is_some_and(|set| set.contains(&category))
    }
}
