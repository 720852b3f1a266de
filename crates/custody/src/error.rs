//! Custody errors

use aegis_core::{Address, Amount};
use thiserror::Error;

/// Frozen-state invariant violations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CustodyError {
    #[error("sender account {account} is frozen")]
    SenderFrozen { account: Address },

    #[error("recipient account {account} is frozen")]
    RecipientFrozen { account: Address },

    #[error("freeze of {requested} on {account} exceeds available balance {available}")]
    ExceedsAvailableBalance {
        account: Address,
        available: Amount,
        requested: Amount,
    },

    #[error("unfreeze of {requested} on {account} exceeds frozen tokens {frozen}")]
    InsufficientFrozenTokens {
        account: Address,
        frozen: Amount,
        requested: Amount,
    },

    #[error("amount {requested} on {account} exceeds unfrozen balance {available}")]
    InsufficientUnfrozenBalance {
        account: Address,
        available: Amount,
        requested: Amount,
    },

    #[error("amount {requested} on {account} exceeds full balance {balance}")]
    InsufficientBalance {
        account: Address,
        balance: Amount,
        requested: Amount,
    },

    #[error("frozen-amount arithmetic overflow on {account}")]
    FrozenOverflow { account: Address },
}
