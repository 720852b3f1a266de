//! Supply cap gate

use aegis_core::Amount;

use crate::error::GateError;

/// Immutable maximum total supply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupplyCap {
    cap: Amount,
}

impl SupplyCap {
    /// Create a cap gate
    pub fn new(cap: Amount) -> Self {
        Self { cap }
    }

    /// The configured ceiling
    pub fn cap(&self) -> Amount {
        self.cap
    }

    /// Reject a mint that would push supply past the cap.
    pub fn check_mint(&self, supply: Amount, amount: Amount) -> Result<(), GateError> {
        let exceeded = match supply.checked_add(amount) {
            Some(post) => post > self.cap,
            None => true,
        };
        if exceeded {
            return Err(GateError::CapExceeded {
                cap: self.cap,
                supply,
                requested: amount,
            });
        }
        Ok(())
    }
}
