//! Operation mode - standard vs. forced execution
//!
//! The mode is threaded through every pipeline call as an explicit
//! parameter. It is scoped to exactly one invocation and never stored,
//! so a forced operation cannot leak into subsequent calls.

use serde::{Deserialize, Serialize};

/// How an operation is executed through the authorization pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationMode {
    /// Full pre-check sequence applies
    Standard,
    /// Custodian, identity and compliance pre-checks are skipped for
    /// this single invocation
    Forced,
}

impl OperationMode {
    /// Check if this is a standard operation
    pub fn is_standard(&self) -> bool {
        matches!(self, OperationMode::Standard)
    }

    /// Check if this is a forced operation
    pub fn is_forced(&self) -> bool {
        matches!(self, OperationMode::Forced)
    }
}
