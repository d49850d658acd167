//! Pipeline orchestrator for Samtale.
//!
//! Coordinates the whole run from source loading to the final audio.

use crate::audio::concat_clips;
use crate::config::{Prompts, Settings};
use crate::dialogue::{format_markdown, Dialogue, DialogueLength, Tone};
use crate::document::{load_sources, Source};
use crate::error::{Result, SamtaleError};
use crate::fetcher::ContentFetcher;
use crate::language::Language;
use crate::llm::{create_backend, CompletionBackend};
use crate::script::{build_system_prompt, PodcastStyle, ScriptGenerator, ScriptOutcome};
use crate::synthesis::{AudioSynthesizer, MAX_VOICE_SEED};
use rand::Rng;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Everything needed to produce one podcast.
#[derive(Debug, Clone)]
pub struct PodcastRequest {
    pub sources: Vec<Source>,
    pub question: Option<String>,
    pub tone: Tone,
    pub length: DialogueLength,
    pub language: Language,
    /// Render with the local generative model instead of the hosted service.
    pub advanced_audio: bool,
}

impl PodcastRequest {
    fn style(&self) -> PodcastStyle {
        PodcastStyle {
            question: self.question.clone(),
            tone: self.tone,
            length: self.length,
            language: self.language,
        }
    }
}

/// Result of a full run.
#[derive(Debug)]
pub struct PodcastResult {
    /// Directory holding every file of this run.
    pub run_dir: PathBuf,
    pub dialogue: Dialogue,
    /// Markdown transcript.
    pub transcript: String,
    /// One clip per dialogue line, in order.
    pub clips: Vec<PathBuf>,
    /// Concatenated podcast, if combining is enabled.
    pub podcast: Option<PathBuf>,
    /// Voice seed used for this run.
    pub voice_seed: u32,
    /// Whether a model reply had to fall back to raw text.
    pub degraded: bool,
}

/// The main orchestrator for the Samtale pipeline.
pub struct Orchestrator {
    settings: Settings,
    prompts: Prompts,
    generator: ScriptGenerator,
    fetcher: ContentFetcher,
    synthesizer: AudioSynthesizer,
}

impl Orchestrator {
    /// Create an orchestrator with backends built from settings.
    pub fn new(settings: Settings) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let backend = create_backend(&settings.llm)?;
        info!("Using {} completion backend", backend.name());

        let synthesizer = AudioSynthesizer::from_settings(&settings)?;

        Self::with_components(settings, prompts, backend, synthesizer)
    }

    /// Create an orchestrator with custom components.
    pub fn with_components(
        settings: Settings,
        prompts: Prompts,
        backend: Arc<dyn CompletionBackend>,
        synthesizer: AudioSynthesizer,
    ) -> Result<Self> {
        if settings.podcast.max_voice_seed > MAX_VOICE_SEED {
            return Err(SamtaleError::Config(format!(
                "podcast.max_voice_seed must be at most {}, got {}",
                MAX_VOICE_SEED, settings.podcast.max_voice_seed
            )));
        }

        let generator = ScriptGenerator::new(backend, &prompts.podcast.refine);
        let fetcher = ContentFetcher::new(&settings.reader)?;

        Ok(Self {
            settings,
            prompts,
            generator,
            fetcher,
            synthesizer,
        })
    }

    fn validate(&self, request: &PodcastRequest) -> Result<()> {
        if request.sources.is_empty() {
            return Err(SamtaleError::InvalidInput(
                "Please provide at least one PDF file or a URL.".to_string(),
            ));
        }

        if !request.advanced_audio && !request.language.supports_hosted() {
            return Err(SamtaleError::InvalidInput(format!(
                "The selected language {} is not supported without advanced audio generation. Please enable advanced audio generation or choose a supported language.",
                request.language
            )));
        }

        Ok(())
    }

    /// Load the sources and write the script, without any audio.
    #[instrument(skip(self, request), fields(sources = request.sources.len(), language = %request.language))]
    pub async fn script_only(&self, request: &PodcastRequest) -> Result<ScriptOutcome> {
        if request.sources.is_empty() {
            return Err(SamtaleError::InvalidInput(
                "Please provide at least one PDF file or a URL.".to_string(),
            ));
        }
        self.write_script(request).await
    }

    async fn write_script(&self, request: &PodcastRequest) -> Result<ScriptOutcome> {
        eprintln!("  Loading sources...");
        let text = load_sources(
            &request.sources,
            &self.fetcher,
            self.settings.podcast.character_limit,
        )
        .await?;
        eprintln!("  Loaded {} characters", text.chars().count());

        let system_prompt = build_system_prompt(&self.prompts, &request.style());

        eprintln!("  Writing script...");
        let outcome = self
            .generator
            .generate(&system_prompt, &text, request.length)
            .await?;
        eprintln!("  Script has {} lines", outcome.dialogue.lines.len());

        if outcome.is_degraded() {
            warn!("Script fell back to raw model text; the podcast may be a single host monologue");
        }

        Ok(outcome)
    }

    /// Run the full pipeline: sources, script, one clip per line, transcript.
    #[instrument(skip(self, request), fields(sources = request.sources.len(), language = %request.language))]
    pub async fn run(&self, request: &PodcastRequest) -> Result<PodcastResult> {
        self.validate(request)?;

        let outcome = self.write_script(request).await?;
        let dialogue = outcome.dialogue.clone();

        let voice_seed = rand::rng().random_range(0..=self.settings.podcast.max_voice_seed);
        info!("Voice seed {}", voice_seed);

        let run_dir = self.create_run_dir()?;
        info!("Writing run to {}", run_dir.display());

        let code = request.language.generative_code();
        let total = dialogue.lines.len();
        let mut clips = Vec::with_capacity(total);

        for (index, line) in dialogue.lines.iter().enumerate() {
            eprintln!("  Synthesizing line {}/{} ({})", index + 1, total, line.speaker);
            let clip = self
                .synthesizer
                .synthesize(
                    &line.text,
                    line.speaker,
                    request.language,
                    request.advanced_audio,
                    voice_seed,
                )
                .await?;

            let ext = clip
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("wav")
                .to_string();
            let dest = run_dir.join(format!(
                "line_{:03}_{}_{}.{}",
                index,
                code,
                line.speaker.slug(),
                ext
            ));
            move_file(&clip, &dest).await?;
            clips.push(dest);
        }

        let transcript = format_markdown(&dialogue);
        tokio::fs::write(run_dir.join("transcript.md"), &transcript).await?;
        tokio::fs::write(
            run_dir.join("dialogue.json"),
            serde_json::to_string_pretty(&dialogue)?,
        )
        .await?;

        let podcast = if self.settings.podcast.combine_audio && !clips.is_empty() {
            eprintln!("  Combining {} clips...", clips.len());
            let dest = run_dir.join("podcast.mp3");
            concat_clips(&clips, &dest).await?;
            Some(dest)
        } else {
            None
        };

        Ok(PodcastResult {
            run_dir,
            dialogue,
            transcript,
            clips,
            podcast,
            voice_seed,
            degraded: outcome.is_degraded(),
        })
    }

    fn create_run_dir(&self) -> Result<PathBuf> {
        let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
        let id = uuid::Uuid::new_v4().simple().to_string();
        let dir = self
            .settings
            .output_dir()
            .join(format!("{}-{}", stamp, &id[..8]));
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}

/// Move a file, falling back to copy and delete across filesystems.
async fn move_file(from: &Path, to: &Path) -> Result<()> {
    if tokio::fs::rename(from, to).await.is_ok() {
        return Ok(());
    }
    tokio::fs::copy(from, to).await?;
    if let Err(e) = tokio::fs::remove_file(from).await {
        warn!("Failed to remove {}: {}", from.display(), e);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogue::Speaker;
    use crate::script::tests::ScriptedBackend;
    use crate::synthesis::tests::RecordingBackend;

    const SCRIPT: &str = r#"{"scratchpad": "outline", "name_of_guest": "Dr. Lee", "dialogue": [
        {"speaker": "Host (Jane)", "text": "Welcome to the show."},
        {"speaker": "Guest", "text": "Thanks for having me."},
        {"speaker": "Host (Jane)", "text": "Let's dive in."}
    ]}"#;

    struct Fixture {
        _dir: tempfile::TempDir,
        orchestrator: Orchestrator,
        llm: Arc<ScriptedBackend>,
        hosted: Arc<RecordingBackend>,
        generative: Arc<RecordingBackend>,
    }

    fn test_settings(dir: &Path) -> Settings {
        let mut settings = Settings::default();
        settings.general.output_dir = dir.join("out").to_string_lossy().to_string();
        settings.general.temp_dir = dir.join("work").to_string_lossy().to_string();
        settings.podcast.combine_audio = false;
        settings
    }

    fn fixture(replies: &[&str]) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let settings = test_settings(dir.path());

        let llm = Arc::new(ScriptedBackend::replying(replies));
        let hosted = Arc::new(RecordingBackend::new("hosted"));
        let generative = Arc::new(RecordingBackend::new("generative"));
        let synthesizer = AudioSynthesizer::new(hosted.clone(), generative.clone(), settings.temp_dir());

        let orchestrator =
            Orchestrator::with_components(settings, Prompts::default(), llm.clone(), synthesizer).unwrap();

        Fixture {
            _dir: dir,
            orchestrator,
            llm,
            hosted,
            generative,
        }
    }

    fn request(language: Language, advanced_audio: bool) -> PodcastRequest {
        PodcastRequest {
            sources: vec![Source::Text("A paper about tidal energy.".to_string())],
            question: None,
            tone: Tone::Fun,
            length: DialogueLength::Short,
            language,
            advanced_audio,
        }
    }

    #[tokio::test]
    async fn test_run_produces_one_clip_per_line() {
        let f = fixture(&[SCRIPT, SCRIPT]);

        let result = f.orchestrator.run(&request(Language::English, false)).await.unwrap();

        assert_eq!(result.dialogue.lines.len(), 3);
        assert!(!result.degraded);
        assert!(result.podcast.is_none());
        assert!(result.voice_seed <= 8);

        let names: Vec<String> = result
            .clips
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(
            names,
            vec!["line_000_en_host.wav", "line_001_en_guest.wav", "line_002_en_host.wav"]
        );
        let mut listing: Vec<String> = std::fs::read_dir(&result.run_dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        listing.sort();
        assert_eq!(
            listing,
            vec![
                "dialogue.json",
                "line_000_en_host.wav",
                "line_001_en_guest.wav",
                "line_002_en_host.wav",
                "transcript.md",
            ]
        );
        assert_eq!(
            std::fs::read_to_string(&result.clips[1]).unwrap(),
            "Thanks for having me."
        );

        let calls = f.hosted.calls.lock().unwrap();
        assert_eq!(calls.len(), 3);
        assert!(calls.iter().all(|c| c.voice_seed == result.voice_seed));
        assert_eq!(calls[1].speaker, Speaker::Guest);
        assert!(f.generative.calls.lock().unwrap().is_empty());

        let transcript = std::fs::read_to_string(result.run_dir.join("transcript.md")).unwrap();
        assert_eq!(
            transcript,
            "**Host**: Welcome to the show.\n\n**Dr. Lee**: Thanks for having me.\n\n**Host**: Let's dive in."
        );
        assert!(result.run_dir.join("dialogue.json").exists());

        let llm_calls = f.llm.calls.lock().unwrap();
        assert_eq!(llm_calls.len(), 2);
        assert!(llm_calls[0].0.contains("should be Fun."));
        assert_eq!(llm_calls[0].1, "A paper about tidal energy.");
    }

    #[test]
    fn test_voice_seed_above_preset_range_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = test_settings(dir.path());
        settings.podcast.max_voice_seed = MAX_VOICE_SEED + 1;

        let synthesizer = AudioSynthesizer::new(
            Arc::new(RecordingBackend::new("hosted")),
            Arc::new(RecordingBackend::new("generative")),
            settings.temp_dir(),
        );
        let result = Orchestrator::with_components(
            settings,
            Prompts::default(),
            Arc::new(ScriptedBackend::replying(&[])),
            synthesizer,
        );

        assert!(matches!(result, Err(SamtaleError::Config(ref m)) if m.contains("max_voice_seed")));
    }

    #[tokio::test]
    async fn test_advanced_audio_uses_generative_backend() {
        let f = fixture(&[SCRIPT, SCRIPT]);

        let result = f.orchestrator.run(&request(Language::German, true)).await.unwrap();

        assert_eq!(f.generative.calls.lock().unwrap().len(), 3);
        assert!(f.hosted.calls.lock().unwrap().is_empty());
        assert!(result.clips[0].ends_with("line_000_de_host.wav"));
    }

    #[tokio::test]
    async fn test_unsupported_hosted_language_fails_before_any_work() {
        let f = fixture(&[SCRIPT, SCRIPT]);

        let err = f.orchestrator.run(&request(Language::German, false)).await.unwrap_err();

        assert!(matches!(err, SamtaleError::InvalidInput(_)));
        assert!(f.llm.calls.lock().unwrap().is_empty());
        assert!(f.hosted.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_no_sources_is_rejected() {
        let f = fixture(&[]);
        let mut req = request(Language::English, false);
        req.sources.clear();

        let err = f.orchestrator.run(&req).await.unwrap_err();
        assert!(err.to_string().contains("at least one PDF file or a URL"));
    }

    #[tokio::test]
    async fn test_degraded_script_still_renders() {
        let f = fixture(&["Sorry, I cannot do JSON.", "Still no JSON."]);

        let result = f.orchestrator.run(&request(Language::English, false)).await.unwrap();

        assert!(result.degraded);
        assert_eq!(result.dialogue.lines.len(), 1);
        assert_eq!(result.clips.len(), 1);
        assert!(result.clips[0].ends_with("line_000_en_host.wav"));
    }

    #[tokio::test]
    async fn test_script_only_skips_audio() {
        let f = fixture(&[SCRIPT, SCRIPT]);

        let outcome = f.orchestrator.script_only(&request(Language::German, false)).await.unwrap();

        assert_eq!(outcome.dialogue.name_of_guest, "Dr. Lee");
        assert!(f.hosted.calls.lock().unwrap().is_empty());
    }
}
