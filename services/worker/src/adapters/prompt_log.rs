//! services/worker/src/adapters/prompt_log.rs
//!
//! A `PromptReportSink` that writes each report as a structured `tracing` event.

use async_trait::async_trait;
use suggestions_core::{
    domain::GenerationReport,
    ports::{PortError, PortResult, PromptReportSink},
};
use tracing::info;

#[derive(Clone, Debug, Default)]
pub struct TracingPromptLogger;

#[async_trait]
impl PromptReportSink for TracingPromptLogger {
    async fn log_prompt_report(&self, report: &GenerationReport) -> PortResult<()> {
        let body =
            serde_json::to_string(report).map_err(|e| PortError::Unexpected(e.to_string()))?;
        info!(
            prompt.user_id = %report.user_id,
            prompt.first_lang = %report.first_lang,
            prompt.second_lang = %report.second_lang,
            prompt.words_added = report.words_added,
            prompt.model = report.metadata.model.as_deref().unwrap_or("unknown"),
            prompt.total_tokens = report.metadata.total_tokens.unwrap_or(0),
            prompt.report = %body,
            "prompt report"
        );
        Ok(())
    }
}
