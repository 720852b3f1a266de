//! Canonical token events
//!
//! One variant per observable state change. All events carry a uuid and
//! a timestamp; balance-changing events also carry the initiating actor
//! so the journal answers "who did this" without a second lookup.

use aegis_core::{Address, Amount, ClaimTopic, OperationMode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Events appended to the token journal (append-only).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum TokenEvent {
    /// Full-freeze flag of an account changed (or was re-asserted)
    AddressFrozen {
        id: String,
        account: Address,
        frozen: bool,
        initiator: Address,
        timestamp: DateTime<Utc>,
    },

    /// Part of an account's balance was locked
    TokensFrozen {
        id: String,
        account: Address,
        amount: Amount,
        initiator: Address,
        timestamp: DateTime<Utc>,
    },

    /// Part of an account's locked balance was released
    TokensUnfrozen {
        id: String,
        account: Address,
        amount: Amount,
        initiator: Address,
        timestamp: DateTime<Utc>,
    },

    /// Freeze state migrated from a lost wallet to its replacement
    RecoverySucceeded {
        id: String,
        lost_wallet: Address,
        new_wallet: Address,
        identity: String,
        initiator: Address,
        timestamp: DateTime<Utc>,
    },

    /// Tokens were created
    Minted {
        id: String,
        to: Address,
        amount: Amount,
        initiator: Address,
        timestamp: DateTime<Utc>,
    },

    /// Tokens moved between two accounts
    Transferred {
        id: String,
        from: Address,
        to: Address,
        amount: Amount,
        mode: OperationMode,
        initiator: Address,
        timestamp: DateTime<Utc>,
    },

    /// Tokens were destroyed
    Burned {
        id: String,
        from: Address,
        amount: Amount,
        initiator: Address,
        timestamp: DateTime<Utc>,
    },

    /// A compliance module was registered
    ModuleAdded {
        id: String,
        module: String,
        timestamp: DateTime<Utc>,
    },

    /// A compliance module was removed
    ModuleRemoved {
        id: String,
        module: String,
        timestamp: DateTime<Utc>,
    },

    /// A registered module's parameters were replaced
    ModuleParamsUpdated {
        id: String,
        module: String,
        timestamp: DateTime<Utc>,
    },

    /// The required claim-topic list was replaced
    RequiredTopicsSet {
        id: String,
        topics: Vec<ClaimTopic>,
        timestamp: DateTime<Utc>,
    },

    /// The yield schedule was configured (immutable afterwards)
    YieldScheduleSet {
        id: String,
        starts_at: DateTime<Utc>,
        timestamp: DateTime<Utc>,
    },

    /// All mutating operations suspended
    Paused {
        id: String,
        initiator: Address,
        timestamp: DateTime<Utc>,
    },

    /// Operations resumed
    Unpaused {
        id: String,
        initiator: Address,
        timestamp: DateTime<Utc>,
    },
}

fn next_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

impl TokenEvent {
    /// Get the event id
    pub fn id(&self) -> &str {
        match self {
            TokenEvent::AddressFrozen { id, .. }
            | TokenEvent::TokensFrozen { id, .. }
            | TokenEvent::TokensUnfrozen { id, .. }
            | TokenEvent::RecoverySucceeded { id, .. }
            | TokenEvent::Minted { id, .. }
            | TokenEvent::Transferred { id, .. }
            | TokenEvent::Burned { id, .. }
            | TokenEvent::ModuleAdded { id, .. }
            | TokenEvent::ModuleRemoved { id, .. }
            | TokenEvent::ModuleParamsUpdated { id, .. }
            | TokenEvent::RequiredTopicsSet { id, .. }
            | TokenEvent::YieldScheduleSet { id, .. }
            | TokenEvent::Paused { id, .. }
            | TokenEvent::Unpaused { id, .. } => id,
        }
    }

    /// Get the event timestamp
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            TokenEvent::AddressFrozen { timestamp, .. }
            | TokenEvent::TokensFrozen { timestamp, .. }
            | TokenEvent::TokensUnfrozen { timestamp, .. }
            | TokenEvent::RecoverySucceeded { timestamp, .. }
            | TokenEvent::Minted { timestamp, .. }
            | TokenEvent::Transferred { timestamp, .. }
            | TokenEvent::Burned { timestamp, .. }
            | TokenEvent::ModuleAdded { timestamp, .. }
            | TokenEvent::ModuleRemoved { timestamp, .. }
            | TokenEvent::ModuleParamsUpdated { timestamp, .. }
            | TokenEvent::RequiredTopicsSet { timestamp, .. }
            | TokenEvent::YieldScheduleSet { timestamp, .. }
            | TokenEvent::Paused { timestamp, .. }
            | TokenEvent::Unpaused { timestamp, .. } => *timestamp,
        }
    }

    /// Create an AddressFrozen event
    pub fn address_frozen(account: Address, frozen: bool, initiator: Address) -> Self {
        TokenEvent::AddressFrozen {
            id: next_id(),
            account,
            frozen,
            initiator,
            timestamp: Utc::now(),
        }
    }

    /// Create a TokensFrozen event
    pub fn tokens_frozen(account: Address, amount: Amount, initiator: Address) -> Self {
        TokenEvent::TokensFrozen {
            id: next_id(),
            account,
            amount,
            initiator,
            timestamp: Utc::now(),
        }
    }

    /// Create a TokensUnfrozen event
    pub fn tokens_unfrozen(account: Address, amount: Amount, initiator: Address) -> Self {
        TokenEvent::TokensUnfrozen {
            id: next_id(),
            account,
            amount,
            initiator,
            timestamp: Utc::now(),
        }
    }

    /// Create a RecoverySucceeded event
    pub fn recovery_succeeded(
        lost_wallet: Address,
        new_wallet: Address,
        identity: impl Into<String>,
        initiator: Address,
    ) -> Self {
        TokenEvent::RecoverySucceeded {
            id: next_id(),
            lost_wallet,
            new_wallet,
            identity: identity.into(),
            initiator,
            timestamp: Utc::now(),
        }
    }

    /// Create a Minted event
    pub fn minted(to: Address, amount: Amount, initiator: Address) -> Self {
        TokenEvent::Minted {
            id: next_id(),
            to,
            amount,
            initiator,
            timestamp: Utc::now(),
        }
    }

    /// Create a Transferred event
    pub fn transferred(
        from: Address,
        to: Address,
        amount: Amount,
        mode: OperationMode,
        initiator: Address,
    ) -> Self {
        TokenEvent::Transferred {
            id: next_id(),
            from,
            to,
            amount,
            mode,
            initiator,
            timestamp: Utc::now(),
        }
    }

    /// Create a Burned event
    pub fn burned(from: Address, amount: Amount, initiator: Address) -> Self {
        TokenEvent::Burned {
            id: next_id(),
            from,
            amount,
            initiator,
            timestamp: Utc::now(),
        }
    }

    /// Create a ModuleAdded event
    pub fn module_added(module: impl Into<String>) -> Self {
        TokenEvent::ModuleAdded {
            id: next_id(),
            module: module.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create a ModuleRemoved event
    pub fn module_removed(module: impl Into<String>) -> Self {
        TokenEvent::ModuleRemoved {
            id: next_id(),
            module: module.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create a ModuleParamsUpdated event
    pub fn module_params_updated(module: impl Into<String>) -> Self {
        TokenEvent::ModuleParamsUpdated {
            id: next_id(),
            module: module.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create a RequiredTopicsSet event
    pub fn required_topics_set(topics: Vec<ClaimTopic>) -> Self {
        TokenEvent::RequiredTopicsSet {
            id: next_id(),
            topics,
            timestamp: Utc::now(),
        }
    }

    /// Create a YieldScheduleSet event
    pub fn yield_schedule_set(starts_at: DateTime<Utc>) -> Self {
        TokenEvent::YieldScheduleSet {
            id: next_id(),
            starts_at,
            timestamp: Utc::now(),
        }
    }

    /// Create a Paused event
    pub fn paused(initiator: Address) -> Self {
        TokenEvent::Paused {
            id: next_id(),
            initiator,
            timestamp: Utc::now(),
        }
    }

    /// Create an Unpaused event
    pub fn unpaused(initiator: Address) -> Self {
        TokenEvent::Unpaused {
            id: next_id(),
            initiator,
            timestamp: Utc::now(),
        }
    }
}
