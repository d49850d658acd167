//! Data models for podcast scripts.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// One of the two fixed podcast roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Speaker {
    #[serde(rename = "Host (Jane)", alias = "Host")]
    Host,
    #[serde(rename = "Guest")]
    Guest,
}

impl Speaker {
    /// Name as it appears in model output.
    pub fn wire_name(&self) -> &'static str {
        match self {
            Speaker::Host => "Host (Jane)",
            Speaker::Guest => "Guest",
        }
    }

    /// Lowercase name used in file names.
    pub fn slug(&self) -> &'static str {
        match self {
            Speaker::Host => "host",
            Speaker::Guest => "guest",
        }
    }
}

impl std::fmt::Display for Speaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Speaker::Host => write!(f, "Host"),
            Speaker::Guest => write!(f, "Guest"),
        }
    }
}

/// A single spoken line of the script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueLine {
    pub speaker: Speaker,
    pub text: String,
}

impl DialogueLine {
    pub fn new(speaker: Speaker, text: impl Into<String>) -> Self {
        Self {
            speaker,
            text: text.into(),
        }
    }
}

/// A complete two-speaker podcast script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dialogue {
    /// The model's planning notes. Never spoken.
    pub scratchpad: String,
    /// Display name of the guest.
    pub name_of_guest: String,
    /// Lines in speaking order.
    #[serde(rename = "dialogue")]
    pub lines: Vec<DialogueLine>,
}

/// Requested podcast length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialogueLength {
    /// Roughly 1-2 minutes.
    Short,
    /// Roughly 3-5 minutes.
    Medium,
}

impl DialogueLength {
    /// Expected number of lines, passed to the model as a hint only.
    pub fn line_range(&self) -> (usize, usize) {
        match self {
            DialogueLength::Short => (11, 17),
            DialogueLength::Medium => (19, 29),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DialogueLength::Short => "Short (1-2 min)",
            DialogueLength::Medium => "Medium (3-5 min)",
        }
    }

    /// JSON schema for a dialogue of this length, sent to backends that support structured output.
    pub fn schema(&self) -> Value {
        let (min, max) = self.line_range();
        json!({
            "type": "object",
            "properties": {
                "scratchpad": { "type": "string" },
                "name_of_guest": { "type": "string" },
                "dialogue": {
                    "type": "array",
                    "description": format!("A list of dialogue items, typically between {} to {} items", min, max),
                    "items": {
                        "type": "object",
                        "properties": {
                            "speaker": { "type": "string", "enum": ["Host (Jane)", "Guest"] },
                            "text": { "type": "string" }
                        },
                        "required": ["speaker", "text"]
                    }
                }
            },
            "required": ["scratchpad", "name_of_guest", "dialogue"]
        })
    }

    /// Schema name for structured-output requests.
    pub fn schema_name(&self) -> &'static str {
        match self {
            DialogueLength::Short => "ShortDialogue",
            DialogueLength::Medium => "MediumDialogue",
        }
    }
}

impl std::str::FromStr for DialogueLength {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        if lower.starts_with("short") {
            Ok(DialogueLength::Short)
        } else if lower.starts_with("medium") {
            Ok(DialogueLength::Medium)
        } else {
            Err(format!("Unknown length: {}. Use short or medium.", s))
        }
    }
}

/// Conversational tone of the podcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tone {
    Fun,
    Formal,
}

impl std::str::FromStr for Tone {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fun" => Ok(Tone::Fun),
            "formal" => Ok(Tone::Formal),
            _ => Err(format!("Unknown tone: {}. Use fun or formal.", s)),
        }
    }
}

impl std::fmt::Display for Tone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tone::Fun => write!(f, "Fun"),
            Tone::Formal => write!(f, "Formal"),
        }
    }
}
