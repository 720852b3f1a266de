//! Global pause gate

use crate::error::GateError;

/// Single global flag suspending all mutating operations.
#[derive(Debug, Clone, Copy, Default)]
pub struct PauseGate {
    paused: bool,
}

impl PauseGate {
    /// Create an unpaused gate
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the token is currently paused
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Suspend all mutating operations
    pub fn pause(&mut self) -> Result<(), GateError> {
        if self.paused {
            return Err(GateError::AlreadyPaused);
        }
        self.paused = true;
        Ok(())
    }

    /// Resume operations
    pub fn unpause(&mut self) -> Result<(), GateError> {
        if !self.paused {
            return Err(GateError::NotPaused);
        }
        self.paused = false;
        Ok(())
    }
}
