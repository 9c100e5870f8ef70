//! crates/suggestions_core/src/generator.rs
//!
//! The background "worker" entry point that runs one suggestion generation
//! for a user and language pair.

use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::candidates::{CandidateBatch, CandidateGenerator, Tier};
use crate::config::{with_timeout, GeneratorConfig};
use crate::dedup::Deduplicator;
use crate::domain::{
    DefaultSuggestion, GenerationKey, GenerationMetadata, GenerationReport, WordSuggestion,
};
use crate::error::GenerationResult;
use crate::lock::GenerationLock;
use crate::ports::{PromptReportSink, SuggestionModel, SuggestionRepository};
use crate::source::{normalize, KnownWords, SuggestionSource};

/// Represents the outcome of one `generate_suggestions_in_background` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// Another run already holds the key; nothing was read or written.
    Skipped,
    /// The run finished and inserted `words_added` suggestions.
    Completed { tier: Tier, words_added: usize },
}

/// Sequences lock, reads, candidate sourcing, dedup, insert and reporting.
pub struct SuggestionGenerator {
    repo: Arc<dyn SuggestionRepository>,
    reports: Arc<dyn PromptReportSink>,
    lock: Arc<GenerationLock>,
    source: SuggestionSource,
    candidates: CandidateGenerator,
    config: GeneratorConfig,
}

impl SuggestionGenerator {
    pub fn new(
        repo: Arc<dyn SuggestionRepository>,
        model: Arc<dyn SuggestionModel>,
        reports: Arc<dyn PromptReportSink>,
        lock: Arc<GenerationLock>,
        config: GeneratorConfig,
    ) -> Self {
        let source = SuggestionSource::new(Arc::clone(&repo), config.store_timeout);
        let candidates = CandidateGenerator::new(source.clone(), model, &config);
        Self {
            repo,
            reports,
            lock,
            source,
            candidates,
            config,
        }
    }

    pub fn lock(&self) -> &Arc<GenerationLock> {
        &self.lock
    }

    /// Runs one generation for the key, unless one is already in flight.
    ///
    /// Errors from the store or the model are returned after the key has been
    /// released. Once the suggestions are inserted, a failing prompt report or
    /// default-pool write is logged and otherwise ignored.
    pub async fn generate_suggestions_in_background(
        &self,
        user_id: &str,
        first_lang: &str,
        second_lang: &str,
    ) -> GenerationResult<GenerationOutcome> {
        let key = GenerationKey::new(user_id, first_lang, second_lang);
        if self.lock.is_in_progress(&key) {
            info!(key = %key, "generation already in progress, skipping");
            return Ok(GenerationOutcome::Skipped);
        }
        let Some(guard) = self.lock.try_acquire(&key) else {
            info!(key = %key, "generation started concurrently, skipping");
            return Ok(GenerationOutcome::Skipped);
        };

        self.run(guard.key()).await
    }

    /// Spawns a generation on the runtime and logs its result.
    pub fn spawn_generation(
        self: Arc<Self>,
        user_id: String,
        first_lang: String,
        second_lang: String,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            match self
                .generate_suggestions_in_background(&user_id, &first_lang, &second_lang)
                .await
            {
                Ok(outcome) => info!(
                    user_id = %user_id,
                    first_lang = %first_lang,
                    second_lang = %second_lang,
                    ?outcome,
                    "generation finished"
                ),
                Err(e) => error!(
                    user_id = %user_id,
                    first_lang = %first_lang,
                    second_lang = %second_lang,
                    error = %e,
                    "generation failed"
                ),
            }
        })
    }

    async fn run(&self, key: &GenerationKey) -> GenerationResult<GenerationOutcome> {
        let user_words = self.source.user_words(key).await?;
        let suggestions = self.source.user_suggestions(key).await?;
        let known = KnownWords::new(user_words, suggestions);

        let CandidateBatch {
            tier,
            candidates,
            metadata,
            defaults,
        } = self.candidates.generate(key, &known).await?;
        let generated = candidates.len();

        let records = Deduplicator::new(&known).merge(key, candidates, Utc::now());
        let words_added = records.len();
        if !records.is_empty() {
            with_timeout(
                "insert_suggestions",
                self.config.store_timeout,
                self.repo.insert_suggestions(&records),
            )
            .await?;
        }

        // The suggestions are stored from here on; later steps only warn.
        if let Some(metadata) = metadata.filter(|_| tier.uses_llm()) {
            self.report(key, metadata, words_added).await;
        }

        if tier == Tier::ColdStart {
            if let Err(e) = self.seed_defaults(key, &defaults, &records).await {
                warn!(key = %key, error = %e, "failed to seed default suggestions");
            }
        }

        info!(key = %key, ?tier, generated, words_added, "suggestions generated");
        Ok(GenerationOutcome::Completed { tier, words_added })
    }

    /// Hands the report to the audit sink.
    ///
    /// The sink is awaited inline, so the key stays held until it answers or
    /// `store_timeout` elapses.
    async fn report(&self, key: &GenerationKey, metadata: GenerationMetadata, words_added: usize) {
        let report = GenerationReport::new(key, metadata, words_added);
        let logged = with_timeout(
            "log_prompt_report",
            self.config.store_timeout,
            self.reports.log_prompt_report(&report),
        )
        .await;
        if let Err(e) = logged {
            warn!(key = %key, error = %e, "failed to log prompt report");
        }
    }

    /// Adds cold-start words missing from the pair's default pool.
    async fn seed_defaults(
        &self,
        key: &GenerationKey,
        existing: &[DefaultSuggestion],
        records: &[WordSuggestion],
    ) -> GenerationResult<()> {
        let pool: HashSet<&str> = existing.iter().map(|d| normalize(&d.word)).collect();
        let seeds: Vec<DefaultSuggestion> = records
            .iter()
            .filter(|r| !pool.contains(r.word.as_str()))
            .map(|r| DefaultSuggestion {
                word: r.word.clone(),
                translation: r.translation.clone(),
                first_lang: key.first_lang().to_string(),
                second_lang: key.second_lang().to_string(),
            })
            .collect();
        if seeds.is_empty() {
            return Ok(());
        }

        with_timeout(
            "insert_default_suggestions",
            self.config.store_timeout,
            self.repo.insert_default_suggestions(&seeds),
        )
        .await
    }
}
