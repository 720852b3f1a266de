//! In-memory reference ledger adapter

use std::collections::HashMap;

use aegis_core::{Address, Amount};

use crate::adapter::BalanceLedger;
use crate::error::LedgerError;

/// HashMap-backed ledger used by tests and default wiring.
///
/// # Invariant
/// `total_supply` equals the sum of all balances after every update.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedger {
    balances: HashMap<Address, Amount>,
    total_supply: Amount,
}

impl InMemoryLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a ledger seeded with the given balances.
    ///
    /// Used by batch staging to build an overlay view of the accounts a
    /// batch touches.
    pub fn with_balances(
        balances: impl IntoIterator<Item = (Address, Amount)>,
        total_supply: Amount,
    ) -> Self {
        Self {
            balances: balances.into_iter().collect(),
            total_supply,
        }
    }

    fn credit(&mut self, account: &Address, amount: Amount) -> Result<(), LedgerError> {
        let current = self.balance_of(account);
        let updated = current
            .checked_add(amount)
            .ok_or_else(|| LedgerError::BalanceOverflow {
                account: account.clone(),
            })?;
        self.balances.insert(account.clone(), updated);
        Ok(())
    }

    fn debit(&mut self, account: &Address, amount: Amount) -> Result<(), LedgerError> {
        let current = self.balance_of(account);
        let updated = current
            .checked_sub(amount)
            .ok_or_else(|| LedgerError::InsufficientBalance {
                account: account.clone(),
                available: current,
                requested: amount,
            })?;
        self.balances.insert(account.clone(), updated);
        Ok(())
    }
}

impl BalanceLedger for InMemoryLedger {
    fn balance_of(&self, account: &Address) -> Amount {
        self.balances.get(account).copied().unwrap_or_default()
    }

    fn total_supply(&self) -> Amount {
        self.total_supply
    }

    fn execute_update(
        &mut self,
        from: Option<&Address>,
        to: Option<&Address>,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        match (from, to) {
            (None, None) => Err(LedgerError::MissingEndpoints),
            (None, Some(to)) => {
                // Mint: grow supply first so an overflow leaves balances untouched
                self.total_supply = self
                    .total_supply
                    .checked_add(amount)
                    .ok_or(LedgerError::SupplyOverflow)?;
                if let Err(e) = self.credit(to, amount) {
                    self.total_supply = self.total_supply.saturating_sub(amount);
                    return Err(e);
                }
                Ok(())
            }
            (Some(from), None) => {
                // Burn
                self.debit(from, amount)?;
                self.total_supply = self.total_supply.saturating_sub(amount);
                Ok(())
            }
            (Some(from), Some(to)) => {
                let original_from = self.balance_of(from);
                self.debit(from, amount)?;
                if let Err(e) = self.credit(to, amount) {
                    // Restore the exact pre-debit balance
                    self.balances.insert(from.clone(), original_from);
                    return Err(e);
                }
                Ok(())
            }
        }
    }
}
