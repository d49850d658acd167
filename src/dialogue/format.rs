//! Transcript output formatting (Markdown, JSON).

use super::{Dialogue, Speaker};

/// Supported transcript formats.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TranscriptFormat {
    Markdown,
    Json,
}

impl std::str::FromStr for TranscriptFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "md" | "markdown" => Ok(TranscriptFormat::Markdown),
            "json" => Ok(TranscriptFormat::Json),
            _ => Err(format!("Unknown format: {}. Use markdown or json.", s)),
        }
    }
}

/// Format a dialogue for output.
pub fn format_dialogue(dialogue: &Dialogue, format: TranscriptFormat) -> String {
    match format {
        TranscriptFormat::Markdown => format_markdown(dialogue),
        TranscriptFormat::Json => {
            serde_json::to_string_pretty(dialogue).unwrap_or_else(|_| "{}".to_string())
        }
    }
}

/// Markdown transcript: one bold speaker label per line, blank line between lines.
pub fn format_markdown(dialogue: &Dialogue) -> String {
    dialogue
        .lines
        .iter()
        .map(|line| {
            let name = match line.speaker {
                Speaker::Host => "Host",
                Speaker::Guest => dialogue.name_of_guest.as_str(),
            };
            format!("**{}**: {}", name, line.text)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogue::DialogueLine;

    fn sample() -> Dialogue {
        Dialogue {
            scratchpad: "notes".to_string(),
            name_of_guest: "Dr. Ada".to_string(),
            lines: vec![
                DialogueLine::new(Speaker::Host, "Welcome!"),
                DialogueLine::new(Speaker::Guest, "Happy to be here."),
            ],
        }
    }

    #[test]
    fn test_markdown_uses_guest_name() {
        assert_eq!(
            format_markdown(&sample()),
            "**Host**: Welcome!\n\n**Dr. Ada**: Happy to be here."
        );
    }

    #[test]
    fn test_json_keeps_scratchpad() {
        let json = format_dialogue(&sample(), TranscriptFormat::Json);
        assert!(json.contains("\"scratchpad\": \"notes\""));
    }
}
