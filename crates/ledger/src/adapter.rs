//! Balance ledger trait - the raw credit/debit primitive
//!
//! `execute_update` uses `None` as the no-address sentinel: an absent
//! `from` denotes a mint, an absent `to` denotes a burn. The ledger
//! performs no gating beyond raw balance arithmetic; all authorization
//! lives in the pipeline.

use aegis_core::{Address, Amount};

use crate::error::LedgerError;

/// Raw balance storage and credit/debit primitive.
pub trait BalanceLedger: Send {
    /// Current balance of an account (zero if unknown)
    fn balance_of(&self, account: &Address) -> Amount;

    /// Current total supply
    fn total_supply(&self) -> Amount;

    /// Apply one raw balance update.
    ///
    /// - `from = None` mints `amount` to `to`
    /// - `to = None` burns `amount` from `from`
    /// - both present moves `amount` between the two accounts
    /// - both absent is rejected
    fn execute_update(
        &mut self,
        from: Option<&Address>,
        to: Option<&Address>,
        amount: Amount,
    ) -> Result<(), LedgerError>;
}
