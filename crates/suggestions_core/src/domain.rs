//! crates/suggestions_core/src/domain.rs
//!
//! Defines the pure, core data structures for the suggestion pipeline.
//! These structs are independent of any database or LLM wire format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identity of one generation run: a user and the language pair they study.
///
/// Rendered as `{user_id}_{first_lang}_{second_lang}` when used as a lock token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GenerationKey {
    user_id: String,
    first_lang: String,
    second_lang: String,
}

impl GenerationKey {
    pub fn new(
        user_id: impl Into<String>,
        first_lang: impl Into<String>,
        second_lang: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            first_lang: first_lang.into(),
            second_lang: second_lang.into(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn first_lang(&self) -> &str {
        &self.first_lang
    }

    pub fn second_lang(&self) -> &str {
        &self.second_lang
    }
}

impl fmt::Display for GenerationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}", self.user_id, self.first_lang, self.second_lang)
    }
}

/// A word the user already has in their vocabulary.
#[derive(Debug, Clone)]
pub struct UserWord {
    pub user_id: String,
    pub text: String,
    pub first_lang: String,
    pub second_lang: String,
    pub add_date: DateTime<Utc>,
}

/// A suggestion offered to a specific user. Never mutated after insert.
#[derive(Debug, Clone, PartialEq)]
pub struct WordSuggestion {
    pub id: Uuid,
    pub user_id: String,
    pub word: String,
    pub translation: String,
    pub first_lang: String,
    pub second_lang: String,
    pub created_at: DateTime<Utc>,
}

/// A language-pair-scoped suggestion shared by all users of that pair.
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultSuggestion {
    pub word: String,
    pub translation: String,
    pub first_lang: String,
    pub second_lang: String,
}

/// A raw (word, translation) pair before deduplication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub word: String,
    pub translation: String,
}

impl Candidate {
    pub fn new(word: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            translation: translation.into(),
        }
    }
}

/// Usage data returned by the LLM alongside its words.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_tokens: Option<u32>,
    /// Adapter-specific fields (prompt text, excluded words, ...).
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub details: serde_json::Value,
}

/// Outcome record of one LLM-backed run, handed to the prompt audit sink.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationReport {
    #[serde(flatten)]
    pub metadata: GenerationMetadata,
    pub words_added: usize,
    pub user_id: String,
    pub first_lang: String,
    pub second_lang: String,
}

impl GenerationReport {
    pub fn new(key: &GenerationKey, metadata: GenerationMetadata, words_added: usize) -> Self {
        Self {
            metadata,
            words_added,
            user_id: key.user_id().to_string(),
            first_lang: key.first_lang().to_string(),
            second_lang: key.second_lang().to_string(),
        }
    }
}
