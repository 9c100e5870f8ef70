//! services/worker/src/adapters/suggestions_llm.rs
//!
//! This module contains the adapter for the word-suggestion LLM.
//! It implements the `SuggestionModel` port from the core crate.

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use suggestions_core::{
    domain::{Candidate, GenerationMetadata},
    ports::{PortError, PortResult, SuggestionModel, SuggestionRequest, SuggestionResponse},
};
use tracing::debug;

const SYSTEM_PROMPT: &str = "You are a vocabulary tutor. You propose useful new words for a language learner. \
Respond with ONLY a JSON array of objects with the keys \"word\" and \"translation\", no prose and no markdown.";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `SuggestionModel` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiSuggestionsAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiSuggestionsAdapter {
    /// Creates a new `OpenAiSuggestionsAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }
}

//=========================================================================================
// `SuggestionModel` Trait Implementation
//=========================================================================================

#[async_trait]
impl SuggestionModel for OpenAiSuggestionsAdapter {
    async fn fetch_new_words_suggestions(
        &self,
        request: &SuggestionRequest,
    ) -> PortResult<SuggestionResponse> {
        let prompt = build_prompt(request);

        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(SYSTEM_PROMPT)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt.clone())
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
        ];

        let chat_request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .n(1)
            .temperature(0.7)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(chat_request)
            .await
            .map_err(|e: OpenAIError| PortError::Unexpected(e.to_string()))?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                PortError::InvalidResponse(
                    "Suggestion LLM response contained no text content.".to_string(),
                )
            })?;

        let words = parse_words(&content)?;
        debug!(model = %response.model, words = words.len(), "parsed suggestion response");

        let usage = response.usage;
        let metadata = GenerationMetadata {
            model: Some(response.model),
            prompt_tokens: usage.as_ref().map(|u| u.prompt_tokens),
            completion_tokens: usage.as_ref().map(|u| u.completion_tokens),
            total_tokens: usage.as_ref().map(|u| u.total_tokens),
            details: json!({
                "prompt": prompt,
                "words": words.iter().map(|c| c.word.as_str()).collect::<Vec<_>>(),
                "excludedWords": request.excluded_words,
                "hasExcludedWords": !request.excluded_words.is_empty(),
                "totalWords": words.len(),
                "coldStart": request.cold_start,
                "success": true,
            }),
        };

        Ok(SuggestionResponse {
            words,
            metadata: Some(metadata),
        })
    }
}

//=========================================================================================
// Prompt and Response Helpers
//=========================================================================================

/// Builds the user message for one request.
pub fn build_prompt(request: &SuggestionRequest) -> String {
    let mut prompt = format!(
        "Suggest {} new words in the language '{}', each with its translation into '{}'.",
        request.count, request.first_lang, request.second_lang
    );

    if request.cold_start {
        prompt.push_str(
            "\nThe learner has no vocabulary yet, so start with common, beginner-friendly words.",
        );
    } else if !request.context_words.is_empty() {
        prompt.push_str(&format!(
            "\nThe learner recently added these words: {}. Suggest words that fit the same topics and level.",
            request.context_words.join(", ")
        ));
    }

    if !request.excluded_words.is_empty() {
        prompt.push_str(&format!(
            "\nDo not suggest any of these words: {}.",
            request.excluded_words.join(", ")
        ));
    }

    prompt
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WordsPayload {
    List(Vec<Candidate>),
    Wrapped { words: Vec<Candidate> },
}

/// Parses the model's reply into candidates, tolerating a markdown code fence.
pub fn parse_words(content: &str) -> PortResult<Vec<Candidate>> {
    let body = strip_code_fence(content.trim());
    let payload: WordsPayload = serde_json::from_str(body)
        .map_err(|e| PortError::InvalidResponse(format!("Could not parse suggested words: {}", e)))?;

    let words = match payload {
        WordsPayload::List(words) | WordsPayload::Wrapped { words } => words,
    };
    Ok(words
        .into_iter()
        .filter(|c| !c.word.trim().is_empty())
        .collect())
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the optional language tag on the opening fence line.
    let rest = rest.find('\n').map_or("", |i| &rest[i + 1..]);
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}
