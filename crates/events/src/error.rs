//! Event journal errors

use thiserror::Error;

/// Errors from the event journal
#[derive(Debug, Error)]
pub enum EventError {
    #[error("failed to write journal: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode event: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Result type for journal operations
pub type EventResult<T> = Result<T, EventError>;
