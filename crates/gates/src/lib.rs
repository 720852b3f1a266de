//! Aegis Gates - mint-time ceilings and the global pause
//!
//! Three ceilings bound minting: an immutable supply cap, a
//! collateral-claim-derived ceiling re-fetched on every check, and a
//! yield schedule that freezes supply once distribution starts. The
//! pause gate suspends every mutating operation except unpause.

pub mod collateral;
pub mod error;
pub mod pause;
pub mod schedule;
pub mod supply;

pub use collateral::CollateralGate;
pub use error::GateError;
pub use pause::PauseGate;
pub use schedule::{FixedYieldSchedule, YieldGate, YieldSchedule};
pub use supply::SupplyCap;
