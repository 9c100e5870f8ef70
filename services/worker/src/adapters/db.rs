//! services/worker/src/adapters/db.rs
//!
//! This module contains the database adapter, the concrete implementation of
//! the `SuggestionRepository` and `PromptReportSink` ports from the core crate.
//! It handles all interactions with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use suggestions_core::domain::{
    DefaultSuggestion, GenerationKey, GenerationReport, UserWord, WordSuggestion,
};
use suggestions_core::ports::{PortError, PortResult, PromptReportSink, SuggestionRepository};
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the store and prompt-log ports.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct UserWordRecord {
    user_id: String,
    text: String,
    first_lang: String,
    second_lang: String,
    add_date: DateTime<Utc>,
}
impl UserWordRecord {
    fn to_domain(self) -> UserWord {
        UserWord {
            user_id: self.user_id,
            text: self.text,
            first_lang: self.first_lang,
            second_lang: self.second_lang,
            add_date: self.add_date,
        }
    }
}

#[derive(FromRow)]
struct WordSuggestionRecord {
    id: Uuid,
    user_id: String,
    word: String,
    translation: String,
    first_lang: String,
    second_lang: String,
    created_at: DateTime<Utc>,
}
impl WordSuggestionRecord {
    fn to_domain(self) -> WordSuggestion {
        WordSuggestion {
            id: self.id,
            user_id: self.user_id,
            word: self.word,
            translation: self.translation,
            first_lang: self.first_lang,
            second_lang: self.second_lang,
            created_at: self.created_at,
        }
    }
}

#[derive(FromRow)]
struct DefaultSuggestionRecord {
    word: String,
    translation: String,
    first_lang: String,
    second_lang: String,
}
impl DefaultSuggestionRecord {
    fn to_domain(self) -> DefaultSuggestion {
        DefaultSuggestion {
            word: self.word,
            translation: self.translation,
            first_lang: self.first_lang,
            second_lang: self.second_lang,
        }
    }
}

//=========================================================================================
// `SuggestionRepository` Trait Implementation
//=========================================================================================

#[async_trait]
impl SuggestionRepository for DbAdapter {
    async fn find_user_words(&self, key: &GenerationKey) -> PortResult<Vec<UserWord>> {
        let records = sqlx::query_as::<_, UserWordRecord>(
            "SELECT user_id, text, first_lang, second_lang, add_date FROM words \
             WHERE user_id = $1 AND first_lang = $2 AND second_lang = $3 ORDER BY seq ASC",
        )
        .bind(key.user_id())
        .bind(key.first_lang())
        .bind(key.second_lang())
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn find_user_suggestions(&self, key: &GenerationKey) -> PortResult<Vec<WordSuggestion>> {
        let records = sqlx::query_as::<_, WordSuggestionRecord>(
            "SELECT id, user_id, word, translation, first_lang, second_lang, created_at \
             FROM word_suggestions \
             WHERE user_id = $1 AND first_lang = $2 AND second_lang = $3 ORDER BY created_at DESC",
        )
        .bind(key.user_id())
        .bind(key.first_lang())
        .bind(key.second_lang())
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn find_default_suggestions(
        &self,
        first_lang: &str,
        second_lang: &str,
    ) -> PortResult<Vec<DefaultSuggestion>> {
        let records = sqlx::query_as::<_, DefaultSuggestionRecord>(
            "SELECT word, translation, first_lang, second_lang FROM default_suggestions \
             WHERE first_lang = $1 AND second_lang = $2 ORDER BY seq ASC",
        )
        .bind(first_lang)
        .bind(second_lang)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn insert_suggestions(&self, suggestions: &[WordSuggestion]) -> PortResult<()> {
        if suggestions.is_empty() {
            return Ok(());
        }
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO word_suggestions \
             (id, user_id, word, translation, first_lang, second_lang, created_at) ",
        );
        builder.push_values(suggestions, |mut row, s| {
            row.push_bind(s.id)
                .push_bind(&s.user_id)
                .push_bind(&s.word)
                .push_bind(&s.translation)
                .push_bind(&s.first_lang)
                .push_bind(&s.second_lang)
                .push_bind(s.created_at);
        });
        builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }

    async fn insert_default_suggestions(&self, defaults: &[DefaultSuggestion]) -> PortResult<()> {
        if defaults.is_empty() {
            return Ok(());
        }
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO default_suggestions (word, translation, first_lang, second_lang) ",
        );
        builder.push_values(defaults, |mut row, d| {
            row.push_bind(&d.word)
                .push_bind(&d.translation)
                .push_bind(&d.first_lang)
                .push_bind(&d.second_lang);
        });
        builder.push(" ON CONFLICT (first_lang, second_lang, word) DO NOTHING");
        builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }
}

//=========================================================================================
// `PromptReportSink` Trait Implementation
//=========================================================================================

#[async_trait]
impl PromptReportSink for DbAdapter {
    async fn log_prompt_report(&self, report: &GenerationReport) -> PortResult<()> {
        let body = serde_json::to_value(report).map_err(|e| PortError::Unexpected(e.to_string()))?;
        let words_added = i32::try_from(report.words_added).unwrap_or(i32::MAX);

        sqlx::query(
            "INSERT INTO prompt_reports (id, user_id, first_lang, second_lang, words_added, report) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(Uuid::new_v4())
        .bind(&report.user_id)
        .bind(&report.first_lang)
        .bind(&report.second_lang)
        .bind(words_added)
        .bind(body)
        .execute(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(())
    }
}
