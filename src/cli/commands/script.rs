//! Script command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::{Output, PodcastArgs};
use crate::config::Settings;
use crate::dialogue::{format_dialogue, TranscriptFormat};
use crate::orchestrator::Orchestrator;
use anyhow::Result;
use std::path::PathBuf;

/// Run the script command.
pub async fn run_script(
    podcast: &PodcastArgs,
    output: Option<PathBuf>,
    format: TranscriptFormat,
    mut settings: Settings,
) -> Result<()> {
    if let Some(provider) = podcast.provider {
        settings.llm.provider = provider;
    }

    if let Err(e) = preflight::check(Operation::Script, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'samtale doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let orchestrator = Orchestrator::new(settings)?;
    let outcome = orchestrator.script_only(&podcast.to_request(false)).await?;

    if outcome.is_degraded() {
        Output::warning("The model did not return valid JSON; the script was recovered from raw text.");
    }

    let formatted = format_dialogue(&outcome.dialogue, format);

    match output {
        Some(path) => {
            std::fs::write(&path, &formatted)?;
            Output::success(&format!(
                "Wrote {} line(s) to {}",
                outcome.dialogue.lines.len(),
                path.display()
            ));
        }
        None => println!("{}", formatted),
    }

    Ok(())
}
