pub mod candidates;
pub mod config;
pub mod dedup;
pub mod domain;
pub mod error;
pub mod generator;
pub mod lock;
pub mod ports;
pub mod source;

pub use candidates::{CandidateBatch, CandidateGenerator, Tier};
pub use config::GeneratorConfig;
pub use dedup::Deduplicator;
pub use domain::{
    Candidate, DefaultSuggestion, GenerationKey, GenerationMetadata, GenerationReport, UserWord,
    WordSuggestion,
};
pub use error::{GenerationError, GenerationResult};
pub use generator::{GenerationOutcome, SuggestionGenerator};
pub use lock::{GenerationGuard, GenerationLock};
pub use ports::{
    PortError, PortResult, PromptReportSink, SuggestionModel, SuggestionRepository,
    SuggestionRequest, SuggestionResponse,
};
pub use source::{select_recent_words, KnownWords, SuggestionSource};
