//! In-memory fakes of the core ports.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use uuid::Uuid;

use suggestions_core::{
    Candidate, DefaultSuggestion, GenerationKey, GenerationLock, GenerationMetadata,
    GenerationReport, GeneratorConfig, PortError, PortResult, PromptReportSink,
    SuggestionGenerator, SuggestionModel, SuggestionRepository, SuggestionRequest,
    SuggestionResponse, UserWord, WordSuggestion,
};

pub const USER: &str = "user1";
pub const FIRST: &str = "en";
pub const SECOND: &str = "pl";

pub fn date(month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, month, day, 0, 0, 0).unwrap()
}

pub fn user_word(text: &str, add_date: DateTime<Utc>) -> UserWord {
    UserWord {
        user_id: USER.to_string(),
        text: text.to_string(),
        first_lang: FIRST.to_string(),
        second_lang: SECOND.to_string(),
        add_date,
    }
}

pub fn suggestion(word: &str) -> WordSuggestion {
    WordSuggestion {
        id: Uuid::new_v4(),
        user_id: USER.to_string(),
        word: word.to_string(),
        translation: format!("{word}-tr"),
        first_lang: FIRST.to_string(),
        second_lang: SECOND.to_string(),
        created_at: Utc::now(),
    }
}

pub fn default_suggestion(word: &str, translation: &str) -> DefaultSuggestion {
    DefaultSuggestion {
        word: word.to_string(),
        translation: translation.to_string(),
        first_lang: FIRST.to_string(),
        second_lang: SECOND.to_string(),
    }
}

//=========================================================================================
// Store
//=========================================================================================

#[derive(Default)]
pub struct InMemoryStore {
    pub words: Mutex<Vec<UserWord>>,
    pub suggestions: Mutex<Vec<WordSuggestion>>,
    pub defaults: Mutex<Vec<DefaultSuggestion>>,
    pub inserted_batches: Mutex<Vec<Vec<WordSuggestion>>>,
    pub inserted_defaults: Mutex<Vec<Vec<DefaultSuggestion>>>,
    pub reads: AtomicUsize,
    pub fail_reads: Mutex<bool>,
    pub fail_inserts: Mutex<bool>,
    pub fail_default_inserts: Mutex<bool>,
}

impl InMemoryStore {
    pub fn with_words(self, words: Vec<UserWord>) -> Self {
        *self.words.lock() = words;
        self
    }

    pub fn with_suggestions(self, suggestions: Vec<WordSuggestion>) -> Self {
        *self.suggestions.lock() = suggestions;
        self
    }

    pub fn with_defaults(self, defaults: Vec<DefaultSuggestion>) -> Self {
        *self.defaults.lock() = defaults;
        self
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn suggestion_words(&self) -> Vec<String> {
        self.suggestions.lock().iter().map(|s| s.word.clone()).collect()
    }

    fn read(&self) -> PortResult<()> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if *self.fail_reads.lock() {
            return Err(PortError::Unexpected("store unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl SuggestionRepository for InMemoryStore {
    async fn find_user_words(&self, key: &GenerationKey) -> PortResult<Vec<UserWord>> {
        self.read()?;
        Ok(self
            .words
            .lock()
            .iter()
            .filter(|w| {
                w.user_id == key.user_id()
                    && w.first_lang == key.first_lang()
                    && w.second_lang == key.second_lang()
            })
            .cloned()
            .collect())
    }

    async fn find_user_suggestions(&self, key: &GenerationKey) -> PortResult<Vec<WordSuggestion>> {
        self.read()?;
        Ok(self
            .suggestions
            .lock()
            .iter()
            .filter(|s| {
                s.user_id == key.user_id()
                    && s.first_lang == key.first_lang()
                    && s.second_lang == key.second_lang()
            })
            .cloned()
            .collect())
    }

    async fn find_default_suggestions(
        &self,
        first_lang: &str,
        second_lang: &str,
    ) -> PortResult<Vec<DefaultSuggestion>> {
        self.read()?;
        Ok(self
            .defaults
            .lock()
            .iter()
            .filter(|d| d.first_lang == first_lang && d.second_lang == second_lang)
            .cloned()
            .collect())
    }

    async fn insert_suggestions(&self, suggestions: &[WordSuggestion]) -> PortResult<()> {
        if *self.fail_inserts.lock() {
            return Err(PortError::Unexpected("insert rejected".to_string()));
        }
        self.inserted_batches.lock().push(suggestions.to_vec());
        self.suggestions.lock().extend_from_slice(suggestions);
        Ok(())
    }

    async fn insert_default_suggestions(&self, defaults: &[DefaultSuggestion]) -> PortResult<()> {
        if *self.fail_default_inserts.lock() {
            return Err(PortError::Unexpected("default pool rejected".to_string()));
        }
        self.inserted_defaults.lock().push(defaults.to_vec());
        self.defaults.lock().extend_from_slice(defaults);
        Ok(())
    }
}

//=========================================================================================
// Model
//=========================================================================================

/// Pauses the model until the test lets it continue.
#[derive(Default)]
pub struct Gate {
    pub entered: Notify,
    pub release: Notify,
}

#[derive(Default)]
pub struct FakeModel {
    pub responses: Mutex<VecDeque<PortResult<SuggestionResponse>>>,
    pub requests: Mutex<Vec<SuggestionRequest>>,
    pub gate: Option<Arc<Gate>>,
    pub delay: Option<Duration>,
}

impl FakeModel {
    pub fn returning(words: Vec<Candidate>, metadata: Option<GenerationMetadata>) -> Self {
        let model = Self::default();
        model.push(Ok(SuggestionResponse { words, metadata }));
        model
    }

    pub fn failing() -> Self {
        let model = Self::default();
        model.push(Err(PortError::Unexpected("model offline".to_string())));
        model
    }

    pub fn push(&self, response: PortResult<SuggestionResponse>) {
        self.responses.lock().push_back(response);
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn last_request(&self) -> Option<SuggestionRequest> {
        self.requests.lock().last().cloned()
    }
}

#[async_trait]
impl SuggestionModel for FakeModel {
    async fn fetch_new_words_suggestions(
        &self,
        request: &SuggestionRequest,
    ) -> PortResult<SuggestionResponse> {
        self.requests.lock().push(request.clone());
        if let Some(gate) = &self.gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        // An exhausted queue answers with an empty batch.
        let next = self.responses.lock().pop_front();
        next.unwrap_or_else(|| Ok(SuggestionResponse::default()))
    }
}

//=========================================================================================
// Report sink
//=========================================================================================

#[derive(Default)]
pub struct RecordingSink {
    pub reports: Mutex<Vec<GenerationReport>>,
    pub fail: bool,
}

#[async_trait]
impl PromptReportSink for RecordingSink {
    async fn log_prompt_report(&self, report: &GenerationReport) -> PortResult<()> {
        self.reports.lock().push(report.clone());
        if self.fail {
            return Err(PortError::Unexpected("audit log unreachable".to_string()));
        }
        Ok(())
    }
}

//=========================================================================================
// Harness
//=========================================================================================

pub struct Harness {
    pub store: Arc<InMemoryStore>,
    pub model: Arc<FakeModel>,
    pub sink: Arc<RecordingSink>,
    pub generator: Arc<SuggestionGenerator>,
}

impl Harness {
    pub fn new(store: InMemoryStore, model: FakeModel) -> Self {
        Self::build(store, model, RecordingSink::default(), GeneratorConfig::default())
    }

    pub fn build(
        store: InMemoryStore,
        model: FakeModel,
        sink: RecordingSink,
        config: GeneratorConfig,
    ) -> Self {
        let store = Arc::new(store);
        let model = Arc::new(model);
        let sink = Arc::new(sink);
        let generator = Arc::new(SuggestionGenerator::new(
            store.clone(),
            model.clone(),
            sink.clone(),
            Arc::new(GenerationLock::new()),
            config,
        ));
        Self {
            store,
            model,
            sink,
            generator,
        }
    }

    pub fn key(&self) -> GenerationKey {
        GenerationKey::new(USER, FIRST, SECOND)
    }
}
