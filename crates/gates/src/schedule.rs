//! Yield-schedule gate
//!
//! Once a distribution schedule has started, supply must stay frozen:
//! all minting is rejected. The schedule can be set at most once and is
//! immutable afterwards.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::error::GateError;

/// External schedule exposing when distribution begins.
pub trait YieldSchedule: Send + Sync {
    /// Moment the first distribution period opens
    fn start_time(&self) -> DateTime<Utc>;
}

/// Schedule with a fixed start instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedYieldSchedule {
    starts_at: DateTime<Utc>,
}

impl FixedYieldSchedule {
    /// Create a schedule starting at the given instant
    pub fn new(starts_at: DateTime<Utc>) -> Self {
        Self { starts_at }
    }
}

impl YieldSchedule for FixedYieldSchedule {
    fn start_time(&self) -> DateTime<Utc> {
        self.starts_at
    }
}

/// Gate enforcing the supply freeze after distribution starts.
#[derive(Default)]
pub struct YieldGate {
    schedule: Option<Arc<dyn YieldSchedule>>,
}

impl YieldGate {
    /// Create a gate with no schedule
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a schedule has been configured
    pub fn is_set(&self) -> bool {
        self.schedule.is_some()
    }

    /// Start time of the configured schedule, if any
    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        self.schedule.as_ref().map(|s| s.start_time())
    }

    /// Set the schedule; rejected if one is already configured.
    pub fn set_schedule(&mut self, schedule: Arc<dyn YieldSchedule>) -> Result<(), GateError> {
        if self.schedule.is_some() {
            return Err(GateError::ScheduleAlreadySet);
        }
        self.schedule = Some(schedule);
        Ok(())
    }

    /// Reject minting once the schedule has started.
    pub fn check_mint(&self, now: DateTime<Utc>) -> Result<(), GateError> {
        if let Some(schedule) = &self.schedule {
            let started_at = schedule.start_time();
            if started_at <= now {
                return Err(GateError::YieldActive { started_at });
            }
        }
        Ok(())
    }
}
