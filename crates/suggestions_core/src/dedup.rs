//! crates/suggestions_core/src/dedup.rs
//!
//! Reconciles generated candidates against what the user already has and
//! turns the survivors into insertable `WordSuggestion` records.

use chrono::{DateTime, Utc};
use std::collections::HashSet;
use uuid::Uuid;

use crate::domain::{Candidate, GenerationKey, WordSuggestion};
use crate::source::{normalize, KnownWords};

/// Filters candidates for one user and language pair.
pub struct Deduplicator<'a> {
    known: &'a KnownWords,
    extra: HashSet<&'a str>,
}

impl<'a> Deduplicator<'a> {
    pub fn new(known: &'a KnownWords) -> Self {
        Self {
            known,
            extra: HashSet::new(),
        }
    }

    /// Also rejects any of `words`, e.g. defaults the user has already been shown.
    pub fn excluding<I>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.extra.extend(words.into_iter().map(normalize));
        self
    }

    /// Keeps candidates whose word is new to the user, in order, first occurrence wins.
    pub fn filter(&self, candidates: Vec<Candidate>) -> Vec<Candidate> {
        let mut seen: HashSet<String> = HashSet::new();
        candidates
            .into_iter()
            .filter(|candidate| {
                let word = normalize(&candidate.word);
                !word.is_empty()
                    && !self.known.contains(word)
                    && !self.extra.contains(word)
                    && seen.insert(word.to_string())
            })
            .collect()
    }

    /// Filters `candidates` and decorates the survivors for insertion.
    pub fn merge(
        &self,
        key: &GenerationKey,
        candidates: Vec<Candidate>,
        now: DateTime<Utc>,
    ) -> Vec<WordSuggestion> {
        self.filter(candidates)
            .into_iter()
            .map(|candidate| WordSuggestion {
                id: Uuid::new_v4(),
                user_id: key.user_id().to_string(),
                word: normalize(&candidate.word).to_string(),
                translation: candidate.translation.trim().to_string(),
                first_lang: key.first_lang().to_string(),
                second_lang: key.second_lang().to_string(),
                created_at: now,
            })
            .collect()
    }
}
