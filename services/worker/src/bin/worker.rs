//! services/worker/src/bin/worker.rs
//!
//! Wires the adapters to the generator and runs one generation for the
//! user and language pair given on the command line.

use async_openai::{config::OpenAIConfig, Client};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use suggestions_core::{GenerationLock, PromptReportSink, SuggestionGenerator};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use worker_lib::{
    adapters::{DbAdapter, OpenAiSuggestionsAdapter, TracingPromptLogger},
    config::{Config, PromptLogTarget},
    error::WorkerError,
};

#[tokio::main]
async fn main() -> Result<(), WorkerError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut args = std::env::args().skip(1);
    let (Some(user_id), Some(first_lang), Some(second_lang)) = (args.next(), args.next(), args.next())
    else {
        return Err(WorkerError::Usage(
            "suggestions-worker <user_id> <first_lang> <second_lang>".to_string(),
        ));
    };
    info!("Configuration loaded. Starting worker...");

    // --- 2. Connect to Database & Run Migrations ---
    info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await?;
    let db_adapter = Arc::new(DbAdapter::new(db_pool));
    info!("Running database migrations...");
    db_adapter.run_migrations().await?;
    info!("Database migrations complete.");

    // --- 3. Initialize Service Adapters ---
    let openai_config = OpenAIConfig::new().with_api_key(config.require_openai_api_key()?);
    let openai_client = Client::with_config(openai_config);
    let model_adapter = Arc::new(OpenAiSuggestionsAdapter::new(
        openai_client,
        config.suggestion_model.clone(),
    ));

    let reports: Arc<dyn PromptReportSink> = match config.prompt_log {
        PromptLogTarget::Database => db_adapter.clone() as Arc<dyn PromptReportSink>,
        PromptLogTarget::Tracing => Arc::new(TracingPromptLogger),
    };

    // --- 4. Build the Generator ---
    let generator = SuggestionGenerator::new(
        db_adapter,
        model_adapter,
        reports,
        Arc::new(GenerationLock::new()),
        config.generator.clone(),
    );

    // --- 5. Run ---
    let outcome = generator
        .generate_suggestions_in_background(&user_id, &first_lang, &second_lang)
        .await?;
    info!(?outcome, "Worker finished.");

    Ok(())
}
