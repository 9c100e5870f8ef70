//! services/worker/src/error.rs
//!
//! Defines the primary error type for the worker service.

use crate::config::ConfigError;
use suggestions_core::GenerationError;

/// The primary error type for the `worker` service.
#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents a failed generation run.
    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    /// Represents an error from the underlying database library.
    #[error("Database Error: {0}")]
    Database(#[from] sqlx::Error),

    /// Represents a failure while applying database migrations.
    #[error("Migration Error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// The binary was started with the wrong arguments.
    #[error("Usage: {0}")]
    Usage(String),
}
