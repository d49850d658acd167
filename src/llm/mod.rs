//! Chat-completion backends used to write podcast scripts.

mod openai_compatible;

pub use openai_compatible::OpenAiCompatibleBackend;

use crate::config::{LlmProvider, LlmSettings};
use crate::dialogue::DialogueLength;
use crate::error::{Result, SamtaleError};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

/// Trait for chat-completion backends.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Send one system and one user message and return the reply text.
    ///
    /// `length` selects the dialogue schema; backends that support
    /// structured output send it along, others ignore it.
    async fn complete(&self, system_prompt: &str, text: &str, length: DialogueLength) -> Result<String>;

    /// Short backend name for logs.
    fn name(&self) -> &str;
}

/// Build the completion backend selected by configuration.
pub fn create_backend(settings: &LlmSettings) -> Result<Arc<dyn CompletionBackend>> {
    match settings.resolved_provider() {
        LlmProvider::Managed => {
            let api_key = settings.api_key().ok_or_else(|| {
                SamtaleError::Config(format!(
                    "{} is not set. The managed LLM provider requires an API key.",
                    settings.api_key_env
                ))
            })?;
            info!("Using managed LLM ({})", settings.managed.model);
            Ok(Arc::new(OpenAiCompatibleBackend::managed(settings, &api_key)?))
        }
        _ => {
            info!(
                "Using local LLM ({} at {})",
                settings.local.model, settings.local.base_url
            );
            Ok(Arc::new(OpenAiCompatibleBackend::local(settings)?))
        }
    }
}
