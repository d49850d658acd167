//! Podcast script generation: draft, refine, repair.

use crate::config::Prompts;
use crate::dialogue::{repair, Dialogue, DialogueLength, RepairKind, Repaired, Tone};
use crate::error::Result;
use crate::language::Language;
use crate::llm::CompletionBackend;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Style choices that shape the system prompt.
#[derive(Debug, Clone)]
pub struct PodcastStyle {
    /// Optional question the podcast should answer.
    pub question: Option<String>,
    pub tone: Tone,
    pub length: DialogueLength,
    pub language: Language,
}

/// Build the system prompt from the base template and the style modifiers.
pub fn build_system_prompt(prompts: &Prompts, style: &PodcastStyle) -> String {
    let podcast = &prompts.podcast;
    let mut sections = vec![prompts.render_custom(&podcast.system)];

    if let Some(question) = style.question.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        sections.push(format!("{} {}", podcast.question_modifier, question));
    }

    sections.push(format!("{} {}.", podcast.tone_modifier, style.tone));
    sections.push(match style.length {
        DialogueLength::Short => podcast.length_short.clone(),
        DialogueLength::Medium => podcast.length_medium.clone(),
    });
    sections.push(format!("{} {}.", podcast.language_modifier, style.language));

    sections.join("\n\n")
}

/// Final script plus how each of the two replies was repaired.
#[derive(Debug, Clone)]
pub struct ScriptOutcome {
    pub dialogue: Dialogue,
    pub draft: RepairKind,
    pub refined: RepairKind,
}

impl ScriptOutcome {
    /// True when either reply had to fall back to raw text.
    pub fn is_degraded(&self) -> bool {
        self.draft.is_degraded() || self.refined.is_degraded()
    }
}

/// Writes podcast scripts with a completion backend.
pub struct ScriptGenerator {
    backend: Arc<dyn CompletionBackend>,
    refine_instruction: String,
}

impl ScriptGenerator {
    /// Create a generator; `refine_instruction` is the user message of the second pass.
    pub fn new(backend: Arc<dyn CompletionBackend>, refine_instruction: &str) -> Self {
        Self {
            backend,
            refine_instruction: refine_instruction.to_string(),
        }
    }

    /// Draft a dialogue from `source_text`, then ask the model to improve it.
    ///
    /// Fails only if a backend call fails; malformed replies are repaired.
    #[instrument(skip(self, system_prompt, source_text), fields(backend = self.backend.name(), chars = source_text.len()))]
    pub async fn generate(
        &self,
        system_prompt: &str,
        source_text: &str,
        length: DialogueLength,
    ) -> Result<ScriptOutcome> {
        info!("Drafting dialogue");
        let draft = self.call(system_prompt, source_text, length).await?;
        debug!("Draft has {} lines ({:?})", draft.dialogue.lines.len(), draft.kind);

        let draft_json = serde_json::to_string(&draft.dialogue)?;
        let refine_prompt = format!(
            "{}\n\nHere is the first draft of the dialogue you provided:\n\n{}.",
            system_prompt, draft_json
        );

        info!("Refining dialogue");
        let refined = self.call(&refine_prompt, &self.refine_instruction, length).await?;
        info!("Final dialogue has {} lines", refined.dialogue.lines.len());

        Ok(ScriptOutcome {
            dialogue: refined.dialogue,
            draft: draft.kind,
            refined: refined.kind,
        })
    }

    async fn call(&self, system_prompt: &str, text: &str, length: DialogueLength) -> Result<Repaired> {
        let raw = self.backend.complete(system_prompt, text, length).await?;
        let repaired = repair(&raw);

        match repaired.kind {
            RepairKind::Parsed => {}
            RepairKind::Extracted => warn!("Model reply contained extra text around the JSON; extracted it"),
            RepairKind::Fallback => warn!(
                "Model reply was not valid JSON; using it as a single host line ({} chars)",
                raw.len()
            ),
        }

        Ok(repaired)
    }
}
