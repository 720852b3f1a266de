//! Transfer context - data passed to every module

use aegis_core::{Address, Amount};

/// The operation a module is asked to judge.
///
/// `from = None` is a mint, `to = None` is a burn; both endpoints are
/// present for a wallet-to-wallet transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferContext {
    /// Sending account, absent on mint
    pub from: Option<Address>,
    /// Receiving account, absent on burn
    pub to: Option<Address>,
    /// Amount being moved
    pub amount: Amount,
}

impl TransferContext {
    /// Context for a wallet-to-wallet transfer
    pub fn transfer(from: Address, to: Address, amount: Amount) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
            amount,
        }
    }

    /// Context for a mint
    pub fn mint(to: Address, amount: Amount) -> Self {
        Self {
            from: None,
            to: Some(to),
            amount,
        }
    }

    /// Context for a burn
    pub fn burn(from: Address, amount: Amount) -> Self {
        Self {
            from: Some(from),
            to: None,
            amount,
        }
    }
}
