//! Module chain - ordered registry with AND-semantics evaluation
//!
//! Registration order is evaluation order. The index map stores 1-based
//! positions so that `0` (absent from the map) is distinguishable from
//! "registered at the head of the list"; removal is swap-with-last
//! followed by re-indexing the moved entry.

use std::collections::HashMap;

use aegis_core::{Address, Amount};
use serde_json::Value;

use crate::context::TransferContext;
use crate::error::{ComplianceError, ComplianceResult};
use crate::module::{ComplianceModule, ModuleDecision};

struct Registered {
    module: Box<dyn ComplianceModule>,
    params: Value,
}

/// Validate a whole candidate set before any registration happens
/// (factory-time wiring). Every module judges its own blob.
pub fn are_valid_modules(entries: &[(&dyn ComplianceModule, &Value)]) -> bool {
    entries
        .iter()
        .all(|(module, params)| module.validate_params(params).is_ok())
}

/// Ordered, dynamically managed set of compliance modules.
#[derive(Default)]
pub struct ModuleChain {
    modules: Vec<Registered>,
    /// 1-based position per module id
    index: HashMap<String, usize>,
}

impl ModuleChain {
    /// Create an empty chain
    pub fn new() -> Self {
        Self {
            modules: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Register a module with its parameter blob.
    ///
    /// The blob is validated by the module's own validator before the
    /// module is appended; duplicates are rejected.
    pub fn add_module(
        &mut self,
        mut module: Box<dyn ComplianceModule>,
        params: Value,
    ) -> ComplianceResult<()> {
        let id = module.id().to_string();
        if self.index.contains_key(&id) {
            return Err(ComplianceError::DuplicateModule(id));
        }

        module.validate_params(&params)?;
        module.configure(&params)?;

        self.modules.push(Registered { module, params });
        self.index.insert(id.clone(), self.modules.len());
        tracing::debug!(module = %id, position = self.modules.len(), "compliance module registered");
        Ok(())
    }

    /// Remove a module, clearing its parameters and destroying it.
    pub fn remove_module(&mut self, id: &str) -> ComplianceResult<()> {
        let position = self
            .index
            .remove(id)
            .ok_or_else(|| ComplianceError::ModuleNotFound(id.to_string()))?;

        // swap_remove moves the last entry into the vacated slot
        self.modules.swap_remove(position - 1);
        if position <= self.modules.len() {
            let moved_id = self.modules[position - 1].module.id().to_string();
            self.index.insert(moved_id, position);
        }
        tracing::debug!(module = %id, "compliance module removed");
        Ok(())
    }

    /// Re-validate and replace a registered module's parameters.
    pub fn set_module_parameters(&mut self, id: &str, params: Value) -> ComplianceResult<()> {
        let position = *self
            .index
            .get(id)
            .ok_or_else(|| ComplianceError::ModuleNotFound(id.to_string()))?;

        let entry = &mut self.modules[position - 1];
        entry.module.validate_params(&params)?;
        entry.module.configure(&params)?;
        entry.params = params;
        tracing::debug!(module = %id, "compliance module parameters updated");
        Ok(())
    }

    /// O(1) membership check
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Number of registered modules
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Whether the chain is empty
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Registered module ids in evaluation order
    pub fn ids(&self) -> Vec<&str> {
        self.modules.iter().map(|r| r.module.id()).collect()
    }

    /// Stored parameter blob of a registered module
    pub fn params_of(&self, id: &str) -> Option<&Value> {
        self.index.get(id).map(|pos| &self.modules[pos - 1].params)
    }

    /// Evaluate every module against the operation.
    ///
    /// AND semantics: the first rejection aborts the whole evaluation
    /// with a module-attributable error.
    pub fn can_transfer(&self, ctx: &TransferContext) -> ComplianceResult<()> {
        for entry in &self.modules {
            match entry.module.check(ctx) {
                ModuleDecision::Allow => {
                    tracing::debug!(module = entry.module.id(), "module approved");
                }
                ModuleDecision::Reject { reason } => {
                    tracing::warn!(
                        module = entry.module.id(),
                        reason = %reason,
                        "module rejected transfer"
                    );
                    return Err(ComplianceError::ModuleRejected {
                        module: entry.module.id().to_string(),
                        reason,
                    });
                }
            }
        }
        Ok(())
    }

    /// Broadcast a mint to all modules
    pub fn notify_created(&mut self, to: &Address, amount: Amount) {
        for entry in &mut self.modules {
            entry.module.on_created(to, amount);
        }
    }

    /// Broadcast a transfer to all modules
    pub fn notify_transferred(&mut self, from: &Address, to: &Address, amount: Amount) {
        for entry in &mut self.modules {
            entry.module.on_transferred(from, to, amount);
        }
    }

    /// Broadcast a burn to all modules
    pub fn notify_destroyed(&mut self, from: &Address, amount: Amount) {
        for entry in &mut self.modules {
            entry.module.on_destroyed(from, amount);
        }
    }
}
