//! Ledger errors

use aegis_core::{Address, Amount};
use thiserror::Error;

/// Errors that can occur in raw ledger updates
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("insufficient balance on {account}: have {available}, need {requested}")]
    InsufficientBalance {
        account: Address,
        available: Amount,
        requested: Amount,
    },

    #[error("balance arithmetic overflow on {account}")]
    BalanceOverflow { account: Address },

    #[error("total supply arithmetic overflow")]
    SupplyOverflow,

    #[error("update requires at least one endpoint (both from and to are absent)")]
    MissingEndpoints,
}
