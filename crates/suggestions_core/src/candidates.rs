//! crates/suggestions_core/src/candidates.rs
//!
//! Picks where a run's candidates come from. The tiers are tried in a fixed
//! order: unseen defaults for the pair, then the LLM primed with the user's
//! recent words, then the LLM with no context at all.

use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::config::{with_timeout, GeneratorConfig};
use crate::domain::{Candidate, DefaultSuggestion, GenerationKey, GenerationMetadata};
use crate::error::GenerationResult;
use crate::ports::{SuggestionModel, SuggestionRequest};
use crate::source::{normalize, select_recent_words, KnownWords, SuggestionSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// Defaults for the pair the user has not seen yet.
    UnseenDefaults,
    /// LLM call with the user's most recent words as context.
    RecentWords,
    /// LLM call for a user with no vocabulary.
    ColdStart,
}

impl Tier {
    pub fn uses_llm(self) -> bool {
        !matches!(self, Tier::UnseenDefaults)
    }
}

/// Raw output of the candidate step.
#[derive(Debug, Clone)]
pub struct CandidateBatch {
    pub tier: Tier,
    pub candidates: Vec<Candidate>,
    /// Present only for LLM tiers.
    pub metadata: Option<GenerationMetadata>,
    /// The pair's default pool as read during this run.
    pub defaults: Vec<DefaultSuggestion>,
}

pub struct CandidateGenerator {
    source: SuggestionSource,
    model: Arc<dyn SuggestionModel>,
    recent_context_size: usize,
    excluded_words_limit: usize,
    batch_size: usize,
    llm_timeout: Duration,
}

impl CandidateGenerator {
    pub fn new(
        source: SuggestionSource,
        model: Arc<dyn SuggestionModel>,
        config: &GeneratorConfig,
    ) -> Self {
        Self {
            source,
            model,
            recent_context_size: config.recent_context_size,
            excluded_words_limit: config.excluded_words_limit,
            batch_size: config.batch_size,
            llm_timeout: config.llm_timeout,
        }
    }

    pub async fn generate(
        &self,
        key: &GenerationKey,
        known: &KnownWords,
    ) -> GenerationResult<CandidateBatch> {
        let defaults = self.source.default_suggestions(key).await?;
        let unseen = unseen_defaults(&defaults, known);
        if !unseen.is_empty() {
            debug!(key = %key, unseen = unseen.len(), "serving unseen defaults");
            return Ok(CandidateBatch {
                tier: Tier::UnseenDefaults,
                candidates: unseen,
                metadata: None,
                defaults,
            });
        }

        let (tier, context_words) = if known.has_vocabulary() {
            (
                Tier::RecentWords,
                select_recent_words(known.user_words(), self.recent_context_size),
            )
        } else {
            (Tier::ColdStart, Vec::new())
        };

        let request = SuggestionRequest {
            first_lang: key.first_lang().to_string(),
            second_lang: key.second_lang().to_string(),
            context_words,
            excluded_words: known.suggested_words(self.excluded_words_limit),
            cold_start: tier == Tier::ColdStart,
            count: self.batch_size,
        };
        debug!(
            key = %key,
            ?tier,
            context = request.context_words.len(),
            excluded = request.excluded_words.len(),
            "requesting words from the model"
        );

        let response = with_timeout(
            "fetch_new_words_suggestions",
            self.llm_timeout,
            self.model.fetch_new_words_suggestions(&request),
        )
        .await?;

        Ok(CandidateBatch {
            tier,
            candidates: response.words,
            metadata: response.metadata,
            defaults,
        })
    }
}

/// Defaults whose word the user has neither learned nor been offered.
pub fn unseen_defaults(defaults: &[DefaultSuggestion], known: &KnownWords) -> Vec<Candidate> {
    defaults
        .iter()
        .filter(|d| !known.contains(&d.word))
        .map(|d| Candidate::new(normalize(&d.word), d.translation.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserWord;
    use chrono::Utc;

    fn default(word: &str) -> DefaultSuggestion {
        DefaultSuggestion {
            word: word.to_string(),
            translation: format!("{word}-pl"),
            first_lang: "en".to_string(),
            second_lang: "pl".to_string(),
        }
    }

    #[test]
    fn unseen_defaults_skip_known_words() {
        let known = KnownWords::new(
            vec![UserWord {
                user_id: "user1".to_string(),
                text: "banana".to_string(),
                first_lang: "en".to_string(),
                second_lang: "pl".to_string(),
                add_date: Utc::now(),
            }],
            Vec::new(),
        );

        let unseen = unseen_defaults(&[default("banana"), default("apple")], &known);

        assert_eq!(unseen, vec![Candidate::new("apple", "apple-pl")]);
    }

    #[test]
    fn only_default_tier_skips_the_llm() {
        assert!(!Tier::UnseenDefaults.uses_llm());
        assert!(Tier::RecentWords.uses_llm());
        assert!(Tier::ColdStart.uses_llm());
    }
}
