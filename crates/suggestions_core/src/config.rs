//! crates/suggestions_core/src/config.rs
//!
//! Tunables for a generation run.

use std::future::Future;
use std::time::Duration;

use crate::error::{GenerationError, GenerationResult};
use crate::ports::PortResult;

/// How many recent user words are sent to the LLM as context.
pub const DEFAULT_RECENT_CONTEXT_SIZE: usize = 3;
pub const DEFAULT_EXCLUDED_WORDS_LIMIT: usize = 50;
pub const DEFAULT_BATCH_SIZE: usize = 10;
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_LLM_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Number of most recently added words passed as LLM context.
    pub recent_context_size: usize,
    /// Upper bound on existing suggestions sent to the LLM as exclusions.
    pub excluded_words_limit: usize,
    /// Number of words requested from the LLM per run.
    pub batch_size: usize,
    /// Budget for each store call. `Duration::ZERO` waits indefinitely.
    pub store_timeout: Duration,
    /// Budget for the LLM call. `Duration::ZERO` waits indefinitely.
    pub llm_timeout: Duration,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            recent_context_size: DEFAULT_RECENT_CONTEXT_SIZE,
            excluded_words_limit: DEFAULT_EXCLUDED_WORDS_LIMIT,
            batch_size: DEFAULT_BATCH_SIZE,
            store_timeout: DEFAULT_STORE_TIMEOUT,
            llm_timeout: DEFAULT_LLM_TIMEOUT,
        }
    }
}

/// Awaits a port call, failing with `GenerationError::Timeout` once `budget` elapses.
pub(crate) async fn with_timeout<T, F>(
    operation: &'static str,
    budget: Duration,
    call: F,
) -> GenerationResult<T>
where
    F: Future<Output = PortResult<T>>,
{
    if budget.is_zero() {
        return Ok(call.await?);
    }
    match tokio::time::timeout(budget, call).await {
        Ok(result) => Ok(result?),
        Err(_) => Err(GenerationError::Timeout {
            operation,
            after: budget,
        }),
    }
}
