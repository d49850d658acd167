//! Generate command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::{Output, PodcastArgs};
use crate::config::Settings;
use crate::dialogue::Speaker;
use crate::orchestrator::Orchestrator;
use anyhow::Result;

/// Run the generate command.
pub async fn run_generate(
    podcast: &PodcastArgs,
    advanced_audio: bool,
    no_combine: bool,
    mut settings: Settings,
) -> Result<()> {
    if let Some(provider) = podcast.provider {
        settings.llm.provider = provider;
    }
    if no_combine {
        settings.podcast.combine_audio = false;
    }

    let operation = Operation::Generate {
        advanced_audio,
        combine: settings.podcast.combine_audio,
    };
    if let Err(e) = preflight::check(operation, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'samtale doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let request = podcast.to_request(advanced_audio);
    Output::info(&format!(
        "Generating a {} {} podcast in {} from {} source(s)",
        request.length.label(),
        request.tone,
        request.language,
        request.sources.len()
    ));

    let orchestrator = Orchestrator::new(settings)?;

    let result = match orchestrator.run(&request).await {
        Ok(result) => result,
        Err(e) => {
            Output::error(&format!("Failed to generate podcast: {}", e));
            return Err(e.into());
        }
    };

    if result.degraded {
        Output::warning("The model did not return valid JSON; the script was recovered from raw text.");
    }

    Output::success(&format!(
        "Podcast with {} line(s) featuring {}",
        result.dialogue.lines.len(),
        result.dialogue.name_of_guest
    ));
    Output::kv("Output", &result.run_dir.display().to_string());
    Output::kv("Voice seed", &result.voice_seed.to_string());
    if let Some(podcast_file) = &result.podcast {
        Output::kv("Podcast", &podcast_file.display().to_string());
    }
    Output::kv("Clips", &result.clips.len().to_string());

    Output::header("Transcript");
    for line in &result.dialogue.lines {
        let label = match line.speaker {
            Speaker::Host => "Host",
            Speaker::Guest => result.dialogue.name_of_guest.as_str(),
        };
        Output::dialogue_line(label, &line.text);
    }

    Ok(())
}
