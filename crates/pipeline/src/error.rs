//! Engine errors - one classifiable reason per failed invocation
//!
//! Callers never get a bare boolean: every abort carries which gate
//! refused and why. Sub-crate errors convert via `#[from]`.

use aegis_compliance::ComplianceError;
use aegis_core::Address;
use aegis_custody::CustodyError;
use aegis_events::EventError;
use aegis_gates::GateError;
use aegis_ledger::LedgerError;
use thiserror::Error;

use crate::authorize::OperationCategory;

/// Errors aborting a pipeline invocation
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("{actor} is not authorized for {category}")]
    Authorization {
        actor: Address,
        category: OperationCategory,
    },

    #[error("identity verification failed for {address}")]
    Verification { address: Address },

    #[error(transparent)]
    Compliance(#[from] ComplianceError),

    #[error(transparent)]
    Custody(#[from] CustodyError),

    #[error(transparent)]
    Gate(#[from] GateError),

    #[error("token is paused")]
    Paused,

    #[error("batch arrays differ in length: {left} vs {right}")]
    BatchLengthMismatch { left: usize, right: usize },

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Journal(#[from] EventError),
}

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
