//! crates/suggestions_core/src/source.rs
//!
//! Read paths over the store: the user's vocabulary, their existing
//! suggestions and the shared default pool for a language pair.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use crate::config::with_timeout;
use crate::domain::{DefaultSuggestion, GenerationKey, UserWord, WordSuggestion};
use crate::error::GenerationResult;
use crate::ports::SuggestionRepository;

/// Timed, read-only access to the records a run needs.
#[derive(Clone)]
pub struct SuggestionSource {
    repo: Arc<dyn SuggestionRepository>,
    timeout: Duration,
}

impl SuggestionSource {
    pub fn new(repo: Arc<dyn SuggestionRepository>, timeout: Duration) -> Self {
        Self { repo, timeout }
    }

    pub async fn user_words(&self, key: &GenerationKey) -> GenerationResult<Vec<UserWord>> {
        with_timeout("find_user_words", self.timeout, self.repo.find_user_words(key)).await
    }

    pub async fn user_suggestions(
        &self,
        key: &GenerationKey,
    ) -> GenerationResult<Vec<WordSuggestion>> {
        with_timeout(
            "find_user_suggestions",
            self.timeout,
            self.repo.find_user_suggestions(key),
        )
        .await
    }

    pub async fn default_suggestions(
        &self,
        key: &GenerationKey,
    ) -> GenerationResult<Vec<DefaultSuggestion>> {
        with_timeout(
            "find_default_suggestions",
            self.timeout,
            self.repo
                .find_default_suggestions(key.first_lang(), key.second_lang()),
        )
        .await
    }
}

/// Snapshot of everything the user already has for one language pair.
#[derive(Debug, Clone, Default)]
pub struct KnownWords {
    user_words: Vec<UserWord>,
    suggestions: Vec<WordSuggestion>,
    index: HashSet<String>,
}

impl KnownWords {
    pub fn new(user_words: Vec<UserWord>, suggestions: Vec<WordSuggestion>) -> Self {
        let index = user_words
            .iter()
            .map(|w| normalize(&w.text).to_string())
            .chain(suggestions.iter().map(|s| normalize(&s.word).to_string()))
            .collect();
        Self {
            user_words,
            suggestions,
            index,
        }
    }

    pub fn user_words(&self) -> &[UserWord] {
        &self.user_words
    }

    pub fn suggestions(&self) -> &[WordSuggestion] {
        &self.suggestions
    }

    /// True when `word` matches a user word or an existing suggestion.
    pub fn contains(&self, word: &str) -> bool {
        self.index.contains(normalize(word))
    }

    pub fn has_vocabulary(&self) -> bool {
        !self.user_words.is_empty()
    }

    /// Existing suggestion words in read order, capped at `limit`.
    pub fn suggested_words(&self, limit: usize) -> Vec<String> {
        self.suggestions
            .iter()
            .take(limit)
            .map(|s| s.word.clone())
            .collect()
    }
}

/// Comparison form of a word: surrounding whitespace stripped, case kept.
pub fn normalize(word: &str) -> &str {
    word.trim()
}

/// Returns the text of the `n` most recently added words, most recent first.
///
/// Words sharing an `add_date` keep the order they were read in.
pub fn select_recent_words(words: &[UserWord], n: usize) -> Vec<String> {
    let mut ordered: Vec<&UserWord> = words.iter().collect();
    // `sort_by` is stable, which gives the read-order tie-break.
    ordered.sort_by(|a, b| b.add_date.cmp(&a.add_date));
    ordered
        .into_iter()
        .take(n)
        .map(|w| w.text.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn word(text: &str, day: u32) -> UserWord {
        UserWord {
            user_id: "user1".to_string(),
            text: text.to_string(),
            first_lang: "en".to_string(),
            second_lang: "pl".to_string(),
            add_date: Utc.with_ymd_and_hms(2025, 6, day, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn recent_words_are_most_recent_first() {
        let words = vec![word("cat", 1), word("dog", 5), word("apple", 10)];
        assert_eq!(select_recent_words(&words, 3), vec!["apple", "dog", "cat"]);
    }

    #[test]
    fn recent_words_are_capped() {
        let words = vec![word("cat", 1), word("dog", 5), word("apple", 10), word("pear", 12)];
        assert_eq!(select_recent_words(&words, 3), vec!["pear", "apple", "dog"]);
        assert!(select_recent_words(&words, 0).is_empty());
    }

    #[test]
    fn ties_keep_read_order() {
        let words = vec![word("b", 3), word("a", 3), word("c", 1), word("d", 3)];
        assert_eq!(select_recent_words(&words, 4), vec!["b", "a", "d", "c"]);
    }

    #[test]
    fn known_words_match_exactly_after_trim() {
        let known = KnownWords::new(vec![word("world", 1)], Vec::new());
        assert!(known.contains("world"));
        assert!(known.contains(" world "));
        assert!(!known.contains("World"));
        assert_eq!(known.user_words().len(), 1);
        assert!(known.suggestions().is_empty());
    }
}
