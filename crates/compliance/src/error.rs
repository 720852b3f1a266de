//! Compliance errors

use thiserror::Error;

/// Errors from module registration and evaluation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComplianceError {
    #[error("module {module} rejected the transfer: {reason}")]
    ModuleRejected { module: String, reason: String },

    #[error("module {0} is already registered")]
    DuplicateModule(String),

    #[error("module {0} is not registered")]
    ModuleNotFound(String),

    #[error("invalid parameters for module {module}: {reason}")]
    InvalidParameters { module: String, reason: String },
}

/// Result type for compliance operations
pub type ComplianceResult<T> = Result<T, ComplianceError>;
