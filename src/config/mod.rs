//! Configuration module for Samtale.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{PodcastPrompts, Prompts};
pub use settings::{
    EndpointSettings, GeneralSettings, GenerativeTtsSettings, HostedTtsSettings, LlmProvider,
    LlmSettings, PodcastSettings, PromptSettings, ReaderSettings, Settings,
};
