//! Podcast output languages and their per-backend codes.

use serde::{Deserialize, Serialize};

/// A language the podcast can be generated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    English,
    Chinese,
    French,
    German,
    Hindi,
    Italian,
    Japanese,
    Korean,
    Polish,
    Portuguese,
    Russian,
    Spanish,
    Turkish,
}

impl Language {
    pub const ALL: [Language; 13] = [
        Language::English,
        Language::Chinese,
        Language::French,
        Language::German,
        Language::Hindi,
        Language::Italian,
        Language::Japanese,
        Language::Korean,
        Language::Polish,
        Language::Portuguese,
        Language::Russian,
        Language::Spanish,
        Language::Turkish,
    ];

    /// English name, as used in prompts.
    pub fn name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Chinese => "Chinese",
            Language::French => "French",
            Language::German => "German",
            Language::Hindi => "Hindi",
            Language::Italian => "Italian",
            Language::Japanese => "Japanese",
            Language::Korean => "Korean",
            Language::Polish => "Polish",
            Language::Portuguese => "Portuguese",
            Language::Russian => "Russian",
            Language::Spanish => "Spanish",
            Language::Turkish => "Turkish",
        }
    }

    /// Two-letter code used by the generative audio model's voice prompts.
    pub fn generative_code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Chinese => "zh",
            Language::French => "fr",
            Language::German => "de",
            Language::Hindi => "hi",
            Language::Italian => "it",
            Language::Japanese => "ja",
            Language::Korean => "ko",
            Language::Polish => "pl",
            Language::Portuguese => "pt",
            Language::Russian => "ru",
            Language::Spanish => "es",
            Language::Turkish => "tr",
        }
    }

    /// Code used by the hosted TTS service, or `None` if it has no voice for this language.
    pub fn hosted_code(&self) -> Option<&'static str> {
        match self {
            Language::English => Some("EN"),
            Language::Spanish => Some("ES"),
            Language::French => Some("FR"),
            Language::Chinese => Some("ZJ"),
            Language::Japanese => Some("JP"),
            Language::Korean => Some("KR"),
            _ => None,
        }
    }

    /// Whether the hosted TTS service can speak this language.
    pub fn supports_hosted(&self) -> bool {
        self.hosted_code().is_some()
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Language::ALL
            .iter()
            .copied()
            .find(|l| l.name().to_lowercase() == needle || l.generative_code() == needle)
            .ok_or_else(|| format!("Unknown language: {}", s))
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
