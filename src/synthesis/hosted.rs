//! Hosted neural TTS through a Gradio app.

use super::gradio::GradioClient;
use super::{clip_file_name, SpeechBackend, SynthesisRequest};
use crate::config::HostedTtsSettings;
use crate::dialogue::Speaker;
use crate::error::{Result, SamtaleError};
use crate::retry::{retry, RetryPolicy};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Accent and speed for a speaker in a hosted language code.
///
/// English gets distinct accents per speaker; other languages use the
/// language code as the accent. The guest always speaks a little slower.
pub fn hosted_voice_params(speaker: Speaker, language_code: &str) -> (String, f64) {
    let english = language_code == "EN";
    match speaker {
        Speaker::Guest if english => ("EN-US".to_string(), 0.9),
        Speaker::Guest => (language_code.to_string(), 0.9),
        Speaker::Host if english => ("EN-Default".to_string(), 1.0),
        Speaker::Host => (language_code.to_string(), 1.1),
    }
}

pub struct HostedTts {
    client: GradioClient,
    api_name: String,
    policy: RetryPolicy,
}

impl HostedTts {
    pub fn new(settings: &HostedTtsSettings) -> Result<Self> {
        let client = GradioClient::new(
            &settings.base_url,
            settings.token(),
            Duration::from_secs(settings.timeout_seconds),
        )?;

        Ok(Self::with_client(client, &settings.api_name, settings.retry_policy()))
    }

    pub fn with_client(client: GradioClient, api_name: &str, policy: RetryPolicy) -> Self {
        Self {
            client,
            api_name: api_name.to_string(),
            policy,
        }
    }

    async fn render(&self, data: &[Value]) -> Result<(Vec<u8>, Option<String>)> {
        let output = self.client.predict(&self.api_name, data.to_vec()).await?;
        self.client.download(&output).await
    }
}

#[async_trait]
impl SpeechBackend for HostedTts {
    #[instrument(skip(self, request, work_dir), fields(speaker = %request.speaker, language = %request.language))]
    async fn synthesize(&self, request: &SynthesisRequest, work_dir: &Path) -> Result<PathBuf> {
        let code = request.language.hosted_code().ok_or_else(|| {
            SamtaleError::InvalidInput(format!(
                "{} is not supported by the hosted TTS service. Use advanced audio instead.",
                request.language
            ))
        })?;

        let (accent, speed) = hosted_voice_params(request.speaker, code);
        let data = vec![json!(request.text), json!(code), json!(accent), json!(speed)];

        let (bytes, ext) = retry(&self.policy, "hosted TTS", |_| self.render(&data))
            .await
            .map_err(|exhausted| {
                warn!("Hosted TTS gave up after {} attempts", exhausted.attempts);
                match exhausted.error {
                    error @ SamtaleError::Synthesis(_) => error,
                    other => SamtaleError::Synthesis(other.to_string()),
                }
            })?;

        // Written once, after the remote call succeeded; a write failure is not retried.
        let path = work_dir.join(clip_file_name(code, request.speaker, ext.as_deref().unwrap_or("wav")));
        tokio::fs::write(&path, &bytes).await?;

        info!("Hosted clip: {} ({} bytes)", path.display(), bytes.len());
        Ok(path)
    }

    fn name(&self) -> &str {
        "hosted"
    }
}
