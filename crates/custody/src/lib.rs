//! Aegis Custody - per-account freeze state engine
//!
//! Tracks the full-freeze flag and partial-freeze counter for every
//! account and owns the numeric invariants around them:
//!
//! - `frozen_amount(a) <= balance(a)` at all times
//! - a fully-frozen account cannot send or receive standard operations
//! - a standard debit of `x` needs `balance - frozen_amount >= x`
//! - forced transfers and administrative burns may dip into frozen
//!   tokens by auto-unfreezing exactly the shortfall
//! - redemptions never touch frozen tokens
//!
//! Balances themselves live in the ledger collaborator; every check here
//! takes the relevant balance as a parameter.

pub mod book;
pub mod error;

pub use book::{CustodyBook, FreezeState, RecoveryMigration};
pub use error::CustodyError;
