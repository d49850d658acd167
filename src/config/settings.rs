//! Configuration settings for Samtale.

use crate::retry::RetryPolicy;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub llm: LlmSettings,
    pub reader: ReaderSettings,
    pub hosted_tts: HostedTtsSettings,
    pub generative_tts: GenerativeTtsSettings,
    pub podcast: PodcastSettings,
    pub prompts: PromptSettings,
}


/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory where each run gets its own output folder.
    pub output_dir: String,
    /// Directory for intermediate audio files.
    pub temp_dir: String,
    /// Log level when no -v flag is given (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            output_dir: "~/.samtale/podcasts".to_string(),
            temp_dir: "/tmp/samtale".to_string(),
            log_level: "warn".to_string(),
        }
    }
}

/// Which completion backend to use.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// Managed API when its key is set, local endpoint otherwise.
    #[default]
    Auto,
    /// Managed inference API (API key required, structured output).
    Managed,
    /// Local OpenAI-compatible endpoint (no key).
    Local,
}

impl std::str::FromStr for LlmProvider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(LlmProvider::Auto),
            "managed" | "fireworks" => Ok(LlmProvider::Managed),
            "local" | "ollama" => Ok(LlmProvider::Local),
            _ => Err(format!("Unknown LLM provider: {}", s)),
        }
    }
}

impl std::fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LlmProvider::Auto => write!(f, "auto"),
            LlmProvider::Managed => write!(f, "managed"),
            LlmProvider::Local => write!(f, "local"),
        }
    }
}

/// Connection settings for one OpenAI-compatible endpoint.
///
/// Each endpoint has its own defaults; a partial `[llm.managed]` or
/// `[llm.local]` table only overrides the keys it names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointSettings {
    /// API base URL (up to and including `/v1`).
    pub base_url: String,
    /// Model identifier.
    pub model: String,
    /// Maximum tokens in the reply.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
}

impl EndpointSettings {
    pub fn managed() -> Self {
        Self {
            base_url: "https://api.fireworks.ai/inference/v1".to_string(),
            model: "accounts/fireworks/models/llama-v3p3-70b-instruct".to_string(),
            max_tokens: 16_384,
            temperature: 0.1,
        }
    }

    pub fn local() -> Self {
        Self {
            base_url: "http://localhost:11434/v1".to_string(),
            model: "llama3.1:8b".to_string(),
            max_tokens: 16_384,
            temperature: 0.1,
        }
    }
}

/// Keys present in an endpoint table.
#[derive(Deserialize, Default)]
#[serde(default)]
struct EndpointOverrides {
    base_url: Option<String>,
    model: Option<String>,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
}

impl EndpointOverrides {
    fn apply(self, base: EndpointSettings) -> EndpointSettings {
        EndpointSettings {
            base_url: self.base_url.unwrap_or(base.base_url),
            model: self.model.unwrap_or(base.model),
            max_tokens: self.max_tokens.unwrap_or(base.max_tokens),
            temperature: self.temperature.unwrap_or(base.temperature),
        }
    }
}

fn managed_endpoint<'de, D: Deserializer<'de>>(d: D) -> Result<EndpointSettings, D::Error> {
    Ok(EndpointOverrides::deserialize(d)?.apply(EndpointSettings::managed()))
}

fn local_endpoint<'de, D: Deserializer<'de>>(d: D) -> Result<EndpointSettings, D::Error> {
    Ok(EndpointOverrides::deserialize(d)?.apply(EndpointSettings::local()))
}

/// Completion backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Backend selection (auto, managed, local).
    pub provider: LlmProvider,
    /// Environment variable holding the managed API key.
    pub api_key_env: String,
    /// Managed inference API.
    #[serde(deserialize_with = "managed_endpoint")]
    pub managed: EndpointSettings,
    /// Local OpenAI-compatible endpoint.
    #[serde(deserialize_with = "local_endpoint")]
    pub local: EndpointSettings,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: LlmProvider::Auto,
            api_key_env: "FIREWORKS_API_KEY".to_string(),
            managed: EndpointSettings::managed(),
            local: EndpointSettings::local(),
            timeout_seconds: 300,
        }
    }
}

impl LlmSettings {
    /// Read the managed API key from the environment, if set and non-empty.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
    }

    /// Resolve `auto` against the presence of the API key.
    pub fn resolved_provider(&self) -> LlmProvider {
        match self.provider {
            LlmProvider::Auto if self.api_key().is_some() => LlmProvider::Managed,
            LlmProvider::Auto => LlmProvider::Local,
            other => other,
        }
    }
}

/// Reader proxy settings (URL to text extraction).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderSettings {
    /// Proxy base; the target URL is appended verbatim.
    pub base_url: String,
    pub retry_attempts: u32,
    pub retry_delay_seconds: u64,
    pub timeout_seconds: u64,
}

impl Default for ReaderSettings {
    fn default() -> Self {
        Self {
            base_url: "https://r.jina.ai/".to_string(),
            retry_attempts: 3,
            retry_delay_seconds: 5,
            timeout_seconds: 60,
        }
    }
}

impl ReaderSettings {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::from_secs(self.retry_attempts, self.retry_delay_seconds)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Hosted neural TTS settings (a Gradio app).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HostedTtsSettings {
    /// Base URL of the Gradio app.
    pub base_url: String,
    /// Endpoint name, e.g. `/synthesize`.
    pub api_name: String,
    /// Environment variable holding an optional access token.
    pub token_env: String,
    pub retry_attempts: u32,
    pub retry_delay_seconds: u64,
    pub timeout_seconds: u64,
}

impl Default for HostedTtsSettings {
    fn default() -> Self {
        Self {
            base_url: "https://mrfakename-melotts.hf.space".to_string(),
            api_name: "/synthesize".to_string(),
            token_env: "HF_TOKEN".to_string(),
            retry_attempts: 3,
            retry_delay_seconds: 5,
            timeout_seconds: 120,
        }
    }
}

impl HostedTtsSettings {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::from_secs(self.retry_attempts, self.retry_delay_seconds)
    }

    /// Access token from the environment, if any.
    pub fn token(&self) -> Option<String> {
        std::env::var(&self.token_env)
            .ok()
            .filter(|t| !t.trim().is_empty())
    }
}

/// Local generative audio model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerativeTtsSettings {
    /// Command that prints raw f32le samples for `--text` and `--history-prompt`.
    pub command: String,
    /// Extra arguments placed before the generated ones.
    pub args: Vec<String>,
    /// Sample rate of the model output.
    pub sample_rate: u32,
}

impl Default for GenerativeTtsSettings {
    fn default() -> Self {
        Self {
            command: "bark-generate".to_string(),
            args: Vec::new(),
            sample_rate: 24_000,
        }
    }
}

/// Podcast pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PodcastSettings {
    /// Maximum combined characters of all sources.
    pub character_limit: usize,
    /// Concatenate line clips into a single podcast file with ffmpeg.
    pub combine_audio: bool,
    /// Highest voice seed; the guest uses seed + 1.
    pub max_voice_seed: u32,
}

impl Default for PodcastSettings {
    fn default() -> Self {
        Self {
            character_limit: 100_000,
            combine_audio: true,
            max_voice_seed: 8,
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}


impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::SamtaleError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("samtale")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded output directory path.
    pub fn output_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.output_dir)
    }

    /// Get the expanded temp directory path.
    pub fn temp_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.temp_dir)
    }
}
