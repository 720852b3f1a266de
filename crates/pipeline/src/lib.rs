//! Aegis Pipeline - the transfer-authorization orchestrator
//!
//! Every balance-changing operation runs through one deterministic
//! state machine:
//!
//! ```text
//! Operation (mint / transfer / burn / redeem / forced)
//!     │
//!     ▼
//! ┌─────────────────────────────────────────────┐
//! │ PRECHECK  (read-only, fixed order)          │
//! │ pause → custodian → identity → compliance   │
//! │       → cap → collateral → yield (mint)     │──► any failure:
//! └──────────────────┬──────────────────────────┘    abort, zero mutation
//!                    ▼
//! ┌─────────────────────────────────────────────┐
//! │ EXECUTE   (auto-unfreeze shortfall,         │
//! │            raw ledger update)               │
//! └──────────────────┬──────────────────────────┘
//!                    ▼
//! ┌─────────────────────────────────────────────┐
//! │ POSTNOTIFY (module lifecycle callbacks,     │
//! │             canonical events)               │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! The order is the explicit constant [`PRECHECK_ORDER`], not an
//! artifact of call chaining. Forced mode is a per-call parameter
//! ([`aegis_core::OperationMode`]) and never ambient state. Batches are
//! validated in full against a staging view before the first mutation.

pub mod authorize;
pub mod engine;
pub mod error;
pub mod service;

pub use authorize::{AllowAllAuthorizer, Authorizer, OperationCategory, StaticAuthorizer};
pub use engine::{PrecheckStage, TokenEngine, TokenEngineBuilder, PRECHECK_ORDER};
pub use error::EngineError;
pub use service::TokenService;
