//! crates/suggestions_core/src/ports.rs
//!
//! Defines the service contracts (traits) the generation pipeline depends on.
//! These traits form the boundary of the hexagonal architecture, keeping the
//! core independent of the concrete store, LLM client and audit log.

use async_trait::async_trait;

use crate::domain::{
    Candidate, DefaultSuggestion, GenerationKey, GenerationMetadata, GenerationReport, UserWord,
    WordSuggestion,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Invalid response from external service: {0}")]
    InvalidResponse(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// LLM Request / Response
//=========================================================================================

/// Everything the LLM needs to propose a fresh batch of words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionRequest {
    pub first_lang: String,
    pub second_lang: String,
    /// Most recently added user words, most recent first.
    pub context_words: Vec<String>,
    /// Words the user has already been offered.
    pub excluded_words: Vec<String>,
    /// Set when the user has no vocabulary for this pair yet.
    pub cold_start: bool,
    /// How many words to ask for.
    pub count: usize,
}

#[derive(Debug, Clone, Default)]
pub struct SuggestionResponse {
    pub words: Vec<Candidate>,
    pub metadata: Option<GenerationMetadata>,
}

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait SuggestionRepository: Send + Sync {
    // --- Reads ---
    async fn find_user_words(&self, key: &GenerationKey) -> PortResult<Vec<UserWord>>;

    async fn find_user_suggestions(&self, key: &GenerationKey) -> PortResult<Vec<WordSuggestion>>;

    async fn find_default_suggestions(
        &self,
        first_lang: &str,
        second_lang: &str,
    ) -> PortResult<Vec<DefaultSuggestion>>;

    // --- Writes ---
    async fn insert_suggestions(&self, suggestions: &[WordSuggestion]) -> PortResult<()>;

    async fn insert_default_suggestions(&self, defaults: &[DefaultSuggestion]) -> PortResult<()>;
}

#[async_trait]
pub trait SuggestionModel: Send + Sync {
    /// Asks the model for new vocabulary for a language pair.
    async fn fetch_new_words_suggestions(
        &self,
        request: &SuggestionRequest,
    ) -> PortResult<SuggestionResponse>;
}

#[async_trait]
pub trait PromptReportSink: Send + Sync {
    /// Records the outcome of an LLM-backed generation run.
    async fn log_prompt_report(&self, report: &GenerationReport) -> PortResult<()>;
}
