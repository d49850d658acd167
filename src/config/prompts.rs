//! Prompt templates for Samtale.
//!
//! Prompts can be customized by placing a `podcast.toml` file in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub podcast: PodcastPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: std::collections::HashMap<String, String>,
}


/// Prompts for podcast script generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PodcastPrompts {
    /// Base system prompt for the script writer.
    pub system: String,
    /// Prefix for the listener's question, followed by the question itself.
    pub question_modifier: String,
    /// Prefix for the tone, followed by the tone name.
    pub tone_modifier: String,
    /// Prefix for the output language, followed by the language name.
    pub language_modifier: String,
    /// Instruction appended for short podcasts.
    pub length_short: String,
    /// Instruction appended for medium podcasts.
    pub length_medium: String,
    /// User message for the second (refinement) pass.
    pub refine: String,
}

impl Default for PodcastPrompts {
    fn default() -> Self {
        Self {
            system: r#"You are a world-class podcast producer. You turn source material (papers, articles, reports, web pages) into an engaging, informative podcast conversation between two people.

The source text may be messy or unstructured because it was extracted from PDFs or web pages. Ignore formatting artifacts, navigation text and anything that is not relevant content.

Steps:
1. Read the source carefully and pick out the key topics, surprising facts and the points a curious listener would care about.
2. Use the "scratchpad" field to brainstorm: plan the structure, analogies and examples. The scratchpad is never read aloud.
3. Write the dialogue between the host (Jane) and one guest who is an expert on the topic. Put the guest's name in "name_of_guest".

Dialogue rules:
- The host opens the show with a warm, catchy introduction and closes it naturally.
- The guest explains; the host asks questions, summarizes and keeps the pace.
- Keep the conversation grounded in the source. Do not invent facts.
- Write for the ear: short sentences, no bullet lists, no markdown, no stage directions.
- Every line is spoken by either "Host (Jane)" or "Guest".

Reply with a single JSON object with the fields "scratchpad", "name_of_guest" and "dialogue", where "dialogue" is an array of objects with "speaker" and "text"."#
                .to_string(),

            question_modifier: "PLEASE ANSWER THE FOLLOWING QUESTION:".to_string(),
            tone_modifier: "TONE: The tone of the podcast should be".to_string(),
            language_modifier: "OUTPUT LANGUAGE <IMPORTANT>: The podcast should be in".to_string(),
            length_short: "LENGTH: Keep the podcast brief, around 1-2 minutes long.".to_string(),
            length_medium: "LENGTH: Aim for a moderate length, about 3-5 minutes.".to_string(),

            refine: "Please improve the dialogue. Make it more natural and engaging. If there is a 'dialogue' element in the JSON already, extract it and use it as the text to improve. Always answer in the requested language!"
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&std::collections::HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let podcast_path = custom_path.join("podcast.toml");
            if podcast_path.exists() {
                let content = std::fs::read_to_string(&podcast_path)?;
                prompts.podcast = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &std::collections::HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }

    /// Render a template with the custom config variables only.
    pub fn render_custom(&self, template: &str) -> String {
        Self::render(template, &self.variables)
    }
}
