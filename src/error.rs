//! Error types for Samtale.

use thiserror::Error;

/// Library-level error type for Samtale operations.
#[derive(Error, Debug)]
pub enum SamtaleError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to fetch URL after {attempts} attempts: {message}")]
    Fetch { attempts: u32, message: String },

    #[error("Script generation failed: {0}")]
    Generation(String),

    #[error("Speech synthesis failed: {0}")]
    Synthesis(String),

    #[error("Document error: {0}")]
    Document(String),

    #[error("Audio processing failed: {0}")]
    Audio(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("WAV encoding error: {0}")]
    Wav(#[from] hound::Error),

    #[error("Completion API error: {0}")]
    OpenAI(String),

    #[error("External tool not found: {0}. Please install it and ensure it's in your PATH.")]
    ToolNotFound(String),

    #[error("External tool failed: {0}")]
    ToolFailed(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for Samtale operations.
pub type Result<T> = std::result::Result<T, SamtaleError>;
