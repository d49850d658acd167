//! OpenAI-compatible chat-completion backend.
//!
//! Serves both the managed inference API (key required, JSON schema sent as
//! the response format) and a local endpoint such as Ollama (no key, plain
//! text reply).

use super::CompletionBackend;
use crate::config::{EndpointSettings, LlmSettings};
use crate::dialogue::DialogueLength;
use crate::error::{Result, SamtaleError};
use crate::openai::create_client;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequest,
    CreateChatCompletionRequestArgs, ResponseFormat, ResponseFormatJsonSchema,
};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument};

/// Chat-completion backend over the OpenAI wire protocol.
pub struct OpenAiCompatibleBackend {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    name: &'static str,
    model: String,
    max_tokens: u32,
    temperature: f32,
    structured_output: bool,
}

impl OpenAiCompatibleBackend {
    /// Managed inference API with structured-output validation.
    pub fn managed(settings: &LlmSettings, api_key: &str) -> Result<Self> {
        Self::with_endpoint("managed", &settings.managed, Some(api_key), true, settings.timeout_seconds)
    }

    /// Local endpoint; no key and no response format.
    pub fn local(settings: &LlmSettings) -> Result<Self> {
        Self::with_endpoint("local", &settings.local, None, false, settings.timeout_seconds)
    }

    fn with_endpoint(
        name: &'static str,
        endpoint: &EndpointSettings,
        api_key: Option<&str>,
        structured_output: bool,
        timeout_seconds: u64,
    ) -> Result<Self> {
        Ok(Self {
            client: create_client(&endpoint.base_url, api_key, Duration::from_secs(timeout_seconds))?,
            name,
            model: endpoint.model.clone(),
            max_tokens: endpoint.max_tokens,
            temperature: endpoint.temperature,
            structured_output,
        })
    }

    #[allow(deprecated)]
    fn build_request(
        &self,
        system_prompt: &str,
        text: &str,
        length: DialogueLength,
    ) -> Result<CreateChatCompletionRequest> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(system_prompt.to_string())
                .build()
                .map_err(|e| SamtaleError::Generation(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(text.to_string())
                .build()
                .map_err(|e| SamtaleError::Generation(e.to_string()))?
                .into(),
        ];

        let mut builder = CreateChatCompletionRequestArgs::default();
        builder
            .model(&self.model)
            .messages(messages)
            .max_tokens(self.max_tokens)
            .temperature(self.temperature);

        if self.structured_output {
            builder.response_format(ResponseFormat::JsonSchema {
                json_schema: ResponseFormatJsonSchema {
                    description: Some(format!("Podcast dialogue ({})", length.label())),
                    name: length.schema_name().to_string(),
                    schema: Some(length.schema()),
                    strict: Some(false),
                },
            });
        }

        builder
            .build()
            .map_err(|e| SamtaleError::Generation(e.to_string()))
    }
}

#[async_trait]
impl CompletionBackend for OpenAiCompatibleBackend {
    #[instrument(skip(self, system_prompt, text), fields(backend = self.name, model = %self.model))]
    async fn complete(&self, system_prompt: &str, text: &str, length: DialogueLength) -> Result<String> {
        let request = self.build_request(system_prompt, text, length)?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| SamtaleError::OpenAI(format!("{} completion error: {}", self.name, e)))?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| SamtaleError::Generation("No response generated by the model".to_string()))?;

        let content = choice.message.content.unwrap_or_default();
        debug!("Received {} characters from {}", content.len(), self.name);

        Ok(content)
    }

    fn name(&self) -> &str {
        self.name
    }
}
