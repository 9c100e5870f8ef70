//! crates/suggestions_core/src/error.rs
//!
//! Defines the error type returned by a generation run.

use std::time::Duration;

use crate::ports::PortError;

/// The error type for the generation pipeline.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// An error that propagated up from one of the service ports.
    #[error("Service Port Error: {0}")]
    Port(#[from] PortError),

    /// An external call did not resolve within its configured budget.
    #[error("{operation} timed out after {after:?}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },
}

/// A convenience type alias for `Result<T, GenerationError>`.
pub type GenerationResult<T> = Result<T, GenerationError>;
