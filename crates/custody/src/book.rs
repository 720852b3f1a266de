//! Custody book - freeze flags and partial-freeze counters
//!
//! Accounts come into existence implicitly (defaults) and are never
//! deleted, only reset. The book is `Clone` so batch staging can run
//! prechecks against a scratch copy.

use std::collections::HashMap;

use aegis_core::{Address, Amount};
use serde::{Deserialize, Serialize};

use crate::error::CustodyError;

/// Freeze state of a single account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreezeState {
    /// Full-freeze flag: the account can neither send nor receive
    /// standard operations
    pub frozen: bool,
    /// Locked sub-balance, always <= the account's ledger balance
    pub frozen_amount: Amount,
}

/// Outcome of a wallet recovery migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoveryMigration {
    /// Partial-freeze amount moved to the new wallet (zero if none)
    pub moved_amount: Amount,
    /// Whether the full-freeze flag was carried over
    pub flag_migrated: bool,
}

/// Per-account freeze accounting.
#[derive(Debug, Clone, Default)]
pub struct CustodyBook {
    accounts: HashMap<Address, FreezeState>,
}

impl CustodyBook {
    /// Create an empty book
    pub fn new() -> Self {
        Self::default()
    }

    /// Freeze state of an account (defaults if never touched)
    pub fn state_of(&self, account: &Address) -> FreezeState {
        self.accounts.get(account).copied().unwrap_or_default()
    }

    /// Whether the account is fully frozen
    pub fn is_frozen(&self, account: &Address) -> bool {
        self.state_of(account).frozen
    }

    /// Locked sub-balance of the account
    pub fn frozen_amount(&self, account: &Address) -> Amount {
        self.state_of(account).frozen_amount
    }

    /// Spendable part of the given balance
    pub fn available(&self, account: &Address, balance: Amount) -> Amount {
        balance.saturating_sub(self.frozen_amount(account))
    }

    /// Set the full-freeze flag.
    ///
    /// Idempotent: re-asserting the current flag changes nothing. The
    /// caller still emits a notification either way.
    pub fn set_frozen(&mut self, account: &Address, frozen: bool) {
        self.accounts.entry(account.clone()).or_default().frozen = frozen;
    }

    /// Lock `amount` of the account's balance.
    ///
    /// Requires `amount <= balance - frozen_amount`.
    pub fn freeze_partial(
        &mut self,
        account: &Address,
        amount: Amount,
        balance: Amount,
    ) -> Result<(), CustodyError> {
        let available = self.available(account, balance);
        if amount > available {
            return Err(CustodyError::ExceedsAvailableBalance {
                account: account.clone(),
                available,
                requested: amount,
            });
        }

        let entry = self.accounts.entry(account.clone()).or_default();
        entry.frozen_amount = entry
            .frozen_amount
            .checked_add(amount)
            .ok_or_else(|| CustodyError::FrozenOverflow {
                account: account.clone(),
            })?;
        Ok(())
    }

    /// Release `amount` of the account's locked balance.
    ///
    /// Requires `amount <= frozen_amount`.
    pub fn unfreeze_partial(
        &mut self,
        account: &Address,
        amount: Amount,
    ) -> Result<(), CustodyError> {
        let frozen = self.frozen_amount(account);
        let remaining = frozen
            .checked_sub(amount)
            .ok_or_else(|| CustodyError::InsufficientFrozenTokens {
                account: account.clone(),
                frozen,
                requested: amount,
            })?;

        self.accounts.entry(account.clone()).or_default().frozen_amount = remaining;
        Ok(())
    }

    /// Precheck the debit side of a standard transfer or redemption.
    pub fn check_standard_debit(
        &self,
        from: &Address,
        amount: Amount,
        balance: Amount,
    ) -> Result<(), CustodyError> {
        if self.is_frozen(from) {
            return Err(CustodyError::SenderFrozen {
                account: from.clone(),
            });
        }
        let available = self.available(from, balance);
        if amount > available {
            return Err(CustodyError::InsufficientUnfrozenBalance {
                account: from.clone(),
                available,
                requested: amount,
            });
        }
        Ok(())
    }

    /// Precheck the credit side of a standard transfer or mint.
    pub fn check_standard_credit(&self, to: &Address) -> Result<(), CustodyError> {
        if self.is_frozen(to) {
            return Err(CustodyError::RecipientFrozen { account: to.clone() });
        }
        Ok(())
    }

    /// Plan a debit that may consume frozen tokens (forced transfer or
    /// administrative burn).
    ///
    /// Requires only that the full balance covers the amount. Returns
    /// the shortfall that must be auto-unfrozen before the ledger
    /// update; zero when the unfrozen part already covers it.
    pub fn plan_covered_debit(
        &self,
        from: &Address,
        amount: Amount,
        balance: Amount,
    ) -> Result<Amount, CustodyError> {
        if amount > balance {
            return Err(CustodyError::InsufficientBalance {
                account: from.clone(),
                balance,
                requested: amount,
            });
        }
        Ok(amount.saturating_sub(self.available(from, balance)))
    }

    /// Migrate freeze state from a lost wallet to its replacement.
    ///
    /// The lost wallet ends reset to defaults; the new wallet gains the
    /// partial-freeze amount and, if the lost wallet was fully frozen,
    /// the flag.
    pub fn recover(
        &mut self,
        lost: &Address,
        new: &Address,
    ) -> Result<RecoveryMigration, CustodyError> {
        let lost_state = self.state_of(lost);

        if !lost_state.frozen_amount.is_zero() {
            let entry = self.accounts.entry(new.clone()).or_default();
            entry.frozen_amount = entry
                .frozen_amount
                .checked_add(lost_state.frozen_amount)
                .ok_or_else(|| CustodyError::FrozenOverflow {
                    account: new.clone(),
                })?;
        }
        if lost_state.frozen {
            self.accounts.entry(new.clone()).or_default().frozen = true;
        }
        self.accounts.insert(lost.clone(), FreezeState::default());

        Ok(RecoveryMigration {
            moved_amount: lost_state.frozen_amount,
            flag_migrated: lost_state.frozen,
        })
    }
}
