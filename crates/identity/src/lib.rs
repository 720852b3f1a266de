//! Aegis Identity - identity-registry boundary
//!
//! Identity-claim storage and signature verification live in an external
//! collaborator; the engine consumes only the [`IdentityRegistry`] and
//! [`ClaimSource`] traits. [`MockIdentityRegistry`] and [`MockClaimStore`]
//! are the in-repo reference implementations for tests and demos.

pub mod claim;
pub mod mock;
pub mod registry;

pub use claim::{Claim, ClaimSource};
pub use mock::{MockClaimStore, MockIdentityRegistry};
pub use registry::{IdentityId, IdentityRegistry};
