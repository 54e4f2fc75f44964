//! services/api/src/adapters/coach_llm.rs
//!
//! This module contains the adapter for the Eco-Coach chat LLM.
//! It implements the `CoachService` port from the `core` crate.

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
use eco_tracker_core::ports::{CoachService, PortError, PortResult};
use std::time::Duration;

use super::with_deadline;

const SYSTEM_INSTRUCTIONS: &str = "You are a friendly and encouraging Eco-Coach, providing helpful information and guidance on sustainability. Keep answers practical and upbeat.";

/// An adapter that implements `CoachService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiCoachAdapter {
    client: Client<OpenAIConfig>,
    model: String,
    timeout: Duration,
}

impl OpenAiCoachAdapter {
    pub fn new(client: Client<OpenAIConfig>, model: String, timeout: Duration) -> Self {
        Self {
            client,
            model,
            timeout,
        }
    }

    async fn complete(&self, query: &str) -> PortResult<String> {
        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(SYSTEM_INSTRUCTIONS)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(format!("User Query: {}", query))
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .n(1)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e: OpenAIError| PortError::Unexpected(e.to_string()))?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty());

        content.ok_or_else(|| {
            PortError::Unexpected("Coach LLM response contained no text content.".to_string())
        })
    }
}

#[async_trait]
impl CoachService for OpenAiCoachAdapter {
    async fn answer_query(&self, query: &str) -> PortResult<String> {
        with_deadline(self.timeout, self.complete(query)).await
    }
}
