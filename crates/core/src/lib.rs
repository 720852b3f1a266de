//! Aegis Core - Domain types shared across the token engine
//!
//! This crate contains the fundamental types used by every other crate:
//! - `Address`: validated wallet/account key
//! - `Amount`: non-negative decimal wrapper for token amounts
//! - `ClaimTopic`: attestation topic identifier
//! - `CountryCode`: ISO 3166-1 numeric country code
//! - `OperationMode`: standard vs. forced execution of an operation

pub mod address;
pub mod amount;
pub mod mode;
pub mod topic;

pub use address::{Address, AddressError};
pub use amount::{Amount, AmountError};
pub use mode::OperationMode;
pub use topic::{ClaimTopic, CountryCode};
