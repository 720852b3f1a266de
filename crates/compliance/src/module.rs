//! Compliance module trait - the capability interface rules implement

use aegis_core::{Address, Amount};
use serde_json::Value;

use crate::context::TransferContext;
use crate::error::ComplianceResult;

/// Verdict of a single module on a single operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleDecision {
    /// Module approves the operation
    Allow,
    /// Module vetoes the operation with a reason
    Reject { reason: String },
}

impl ModuleDecision {
    /// Create a rejection
    pub fn reject(reason: impl Into<String>) -> Self {
        ModuleDecision::Reject {
            reason: reason.into(),
        }
    }

    /// Check if this is an approval
    pub fn is_allowed(&self) -> bool {
        matches!(self, ModuleDecision::Allow)
    }
}

/// A pluggable rule evaluator.
///
/// Modules are registered explicitly with the chain along with a
/// parameter blob that the module itself validates. Veto power exists
/// only in [`check`](ComplianceModule::check); the lifecycle callbacks
/// run after execution and are infallible by design.
pub trait ComplianceModule: Send {
    /// Stable identifier, unique within a chain
    fn id(&self) -> &str;

    /// Validate a parameter blob without applying it
    fn validate_params(&self, params: &Value) -> ComplianceResult<()>;

    /// Apply a previously validated parameter blob
    fn configure(&mut self, params: &Value) -> ComplianceResult<()>;

    /// Judge an operation; the default approves everything
    fn check(&self, _ctx: &TransferContext) -> ModuleDecision {
        ModuleDecision::Allow
    }

    /// Tokens were minted to `to`
    fn on_created(&mut self, _to: &Address, _amount: Amount) {}

    /// Tokens moved from `from` to `to`
    fn on_transferred(&mut self, _from: &Address, _to: &Address, _amount: Amount) {}

    /// Tokens were burned from `from`
    fn on_destroyed(&mut self, _from: &Address, _amount: Amount) {}
}
