//! Model bindings for the hosted LLM providers.
//!
//! Both providers are reached through an OpenAI-compatible chat completions
//! API; only the base URL, default model and secret name differ.

use anyhow::{Context, Result};
use async_openai::{
    Client,
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessageContentPartText, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, ChatCompletionRequestUserMessageContent,
        ChatCompletionRequestUserMessageContentPart, CreateChatCompletionRequestArgs,
    },
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::message::{ContentBlock, Message};

/// Defines the supported backend providers for agents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelType {
    OpenAI,
    Gemini,
}

impl ModelType {
    pub fn api_base(&self) -> &'static str {
        match self {
            ModelType::OpenAI => "https://api.openai.com/v1",
            ModelType::Gemini => "https://generativelanguage.googleapis.com/v1beta/openai",
        }
    }

    /// The model used when a definition omits `model_id`.
    pub fn default_model_id(&self) -> &'static str {
        match self {
            ModelType::OpenAI => "gpt-4o",
            ModelType::Gemini => "gemini-2.5-flash",
        }
    }

    /// Name of the environment variable and stored secret holding the API key.
    pub fn secret_name(&self) -> &'static str {
        match self {
            ModelType::OpenAI => "OpenAIApiKey",
            ModelType::Gemini => "GeminiApiKey",
        }
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelType::OpenAI => write!(f, "openai"),
            ModelType::Gemini => write!(f, "gemini"),
        }
    }
}

/// A single-shot conversation with a hosted model.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Sends the system prompt and one user turn made of `content`, returning
    /// the model's reply. Provider failures are returned unchanged.
    async fn converse(&self, system_prompt: &str, content: Vec<ContentBlock>) -> Result<Message>;
}

/// An implementation of `ChatModel` for any OpenAI-compatible API.
pub struct OpenAICompatibleModel {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAICompatibleModel {
    /// Creates a new client for an OpenAI-compatible service.
    ///
    /// # Arguments
    ///
    /// * `config` - The configuration for the OpenAI client, including API key and base URL.
    /// * `model` - The specific model identifier to use for chat completions (e.g., "gpt-4o").
    pub fn new(config: OpenAIConfig, model: String) -> Self {
        Self {
            client: Client::with_config(config),
            model,
        }
    }

    /// Binds a model of the given provider using its public API base.
    pub fn for_provider(model_type: ModelType, api_key: &str, model: String) -> Self {
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(model_type.api_base());
        Self::new(config, model)
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl ChatModel for OpenAICompatibleModel {
    async fn converse(&self, system_prompt: &str, content: Vec<ContentBlock>) -> Result<Message> {
        let parts: Vec<ChatCompletionRequestUserMessageContentPart> = content
            .into_iter()
            .map(|block| {
                ChatCompletionRequestUserMessageContentPart::Text(
                    ChatCompletionRequestMessageContentPartText { text: block.text },
                )
            })
            .collect();

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(vec![
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(system_prompt)
                    .build()?
                    .into(),
                ChatCompletionRequestUserMessageArgs::default()
                    .content(ChatCompletionRequestUserMessageContent::Array(parts))
                    .build()?
                    .into(),
            ])
            .build()?;

        debug!(model = %self.model, "Sending chat completion request");
        let response = self.client.chat().create(request).await?;

        let answer = response
            .choices
            .first()
            .context("No response choice from LLM")?
            .message
            .content
            .clone()
            .context("No content in LLM response")?;

        Ok(Message::assistant(answer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_type_wire_values() {
        assert_eq!(serde_json::to_string(&ModelType::OpenAI).unwrap(), "\"openai\"");
        assert_eq!(serde_json::to_string(&ModelType::Gemini).unwrap(), "\"gemini\"");

        let parsed: ModelType = serde_json::from_str("\"gemini\"").unwrap();
        assert_eq!(parsed, ModelType::Gemini);
        assert!(serde_json::from_str::<ModelType>("\"anthropic\"").is_err());
    }

    #[test]
    fn test_provider_defaults() {
        assert_eq!(ModelType::OpenAI.default_model_id(), "gpt-4o");
        assert_eq!(ModelType::Gemini.default_model_id(), "gemini-2.5-flash");
        assert_eq!(ModelType::OpenAI.secret_name(), "OpenAIApiKey");
        assert_eq!(ModelType::Gemini.secret_name(), "GeminiApiKey");
        assert!(ModelType::Gemini.api_base().contains("generativelanguage"));
    }

    #[test]
    fn test_for_provider_keeps_model_id() {
        let model =
            OpenAICompatibleModel::for_provider(ModelType::OpenAI, "sk-test", "gpt-4o".into());
        assert_eq!(model.model(), "gpt-4o");
    }
}
