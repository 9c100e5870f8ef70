//! services/worker/src/config.rs
//!
//! Defines the worker's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::str::FromStr;
use std::time::Duration;
use suggestions_core::GeneratorConfig;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Where prompt reports are written.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PromptLogTarget {
    /// The `prompt_reports` table.
    Database,
    /// A structured `tracing` event.
    Tracing,
}

impl FromStr for PromptLogTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "database" | "db" => Ok(Self::Database),
            "tracing" | "log" => Ok(Self::Tracing),
            other => Err(format!("'{}' is not a prompt log target", other)),
        }
    }
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,
    pub log_level: Level,
    pub openai_api_key: Option<String>,
    pub suggestion_model: String,
    pub prompt_log: PromptLogTarget,
    pub generator: GeneratorConfig,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // --- Database Settings ---
        let database_url =
            lookup("DATABASE_URL").ok_or_else(|| ConfigError::MissingVar("DATABASE_URL".to_string()))?;
        let db_max_connections = parse_or(&lookup, "DB_MAX_CONNECTIONS", 5)?;

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- LLM Settings ---
        let openai_api_key = lookup("OPENAI_API_KEY");
        let suggestion_model =
            lookup("SUGGESTION_MODEL").unwrap_or_else(|| "gpt-4o-mini".to_string());
        let prompt_log = parse_or(&lookup, "PROMPT_LOG", PromptLogTarget::Database)?;

        // --- Generation Settings ---
        let defaults = GeneratorConfig::default();
        let generator = GeneratorConfig {
            recent_context_size: parse_or(&lookup, "RECENT_CONTEXT_SIZE", defaults.recent_context_size)?,
            excluded_words_limit: parse_or(&lookup, "EXCLUDED_WORDS_LIMIT", defaults.excluded_words_limit)?,
            batch_size: parse_or(&lookup, "SUGGESTION_BATCH_SIZE", defaults.batch_size)?,
            store_timeout: parse_or(&lookup, "STORE_TIMEOUT_SECS", defaults.store_timeout.as_secs())
                .map(Duration::from_secs)?,
            llm_timeout: parse_or(&lookup, "LLM_TIMEOUT_SECS", defaults.llm_timeout.as_secs())
                .map(Duration::from_secs)?,
        };

        Ok(Self {
            database_url,
            db_max_connections,
            log_level,
            openai_api_key,
            suggestion_model,
            prompt_log,
            generator,
        })
    }

    /// The OpenAI key, which the worker cannot start without.
    pub fn require_openai_api_key(&self) -> Result<&str, ConfigError> {
        self.openai_api_key
            .as_deref()
            .ok_or_else(|| ConfigError::MissingVar("OPENAI_API_KEY".to_string()))
    }
}

fn parse_or<F, T>(lookup: &F, name: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidValue(name.to_string(), e.to_string())),
        None => Ok(default),
    }
}
