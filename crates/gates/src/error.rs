//! Gate errors

use aegis_core::{Amount, ClaimTopic};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Rejections from the supply ceilings and pause gate
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GateError {
    #[error("mint of {requested} would push supply {supply} past cap {cap}")]
    CapExceeded {
        cap: Amount,
        supply: Amount,
        requested: Amount,
    },

    #[error("no valid collateral claim for {topic}")]
    NoCollateralClaim { topic: ClaimTopic },

    #[error("mint of {requested} would push supply {supply} past collateral {collateral}")]
    InsufficientCollateral {
        collateral: Amount,
        supply: Amount,
        requested: Amount,
    },

    #[error("minting is closed: yield schedule started at {started_at}")]
    YieldActive { started_at: DateTime<Utc> },

    #[error("yield schedule is already set")]
    ScheduleAlreadySet,

    #[error("token is already paused")]
    AlreadyPaused,

    #[error("token is not paused")]
    NotPaused,
}
