//! Text-to-speech for dialogue lines.
//!
//! Two interchangeable backends sit behind [`SpeechBackend`]: a hosted
//! neural TTS app reached over HTTP, and a local generative model. The
//! [`AudioSynthesizer`] picks one per call.

mod generative;
mod gradio;
mod hosted;

pub use generative::{
    history_prompt, voice_number, CommandWaveformModel, GenerativeTts, WaveformModel, MAX_VOICE_SEED,
};
pub use gradio::GradioClient;
pub use hosted::{hosted_voice_params, HostedTts};

use crate::config::Settings;
use crate::dialogue::Speaker;
use crate::error::Result;
use crate::language::Language;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::instrument;

/// Which backend renders a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendChoice {
    Hosted,
    Generative,
}

impl BackendChoice {
    pub fn from_advanced(use_advanced: bool) -> Self {
        if use_advanced {
            BackendChoice::Generative
        } else {
            BackendChoice::Hosted
        }
    }
}

/// One line to render.
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    pub text: String,
    pub speaker: Speaker,
    pub language: Language,
    pub backend: BackendChoice,
    pub voice_seed: u32,
}

/// A speech engine that renders one line into an audio file.
#[async_trait]
pub trait SpeechBackend: Send + Sync {
    /// Render `request` into a file under `work_dir` and return its path.
    ///
    /// The file is named by language and speaker, so a later call for the
    /// same pair overwrites it.
    async fn synthesize(&self, request: &SynthesisRequest, work_dir: &Path) -> Result<PathBuf>;

    fn name(&self) -> &str;
}

/// `audio_{code}_{speaker}.{ext}`
pub(crate) fn clip_file_name(code: &str, speaker: Speaker, ext: &str) -> String {
    format!("audio_{}_{}.{}", code, speaker.slug(), ext)
}

/// Routes each line to the hosted or generative backend.
pub struct AudioSynthesizer {
    hosted: Arc<dyn SpeechBackend>,
    generative: Arc<dyn SpeechBackend>,
    work_dir: PathBuf,
}

impl AudioSynthesizer {
    pub fn new(
        hosted: Arc<dyn SpeechBackend>,
        generative: Arc<dyn SpeechBackend>,
        work_dir: PathBuf,
    ) -> Self {
        Self {
            hosted,
            generative,
            work_dir,
        }
    }

    /// Build both backends from settings, working in the configured temp dir.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let hosted = HostedTts::new(&settings.hosted_tts)?;
        let generative = GenerativeTts::new(CommandWaveformModel::new(&settings.generative_tts));

        Ok(Self::new(
            Arc::new(hosted),
            Arc::new(generative),
            settings.temp_dir(),
        ))
    }

    pub fn backend(&self, choice: BackendChoice) -> &Arc<dyn SpeechBackend> {
        match choice {
            BackendChoice::Hosted => &self.hosted,
            BackendChoice::Generative => &self.generative,
        }
    }

    /// Render one line and return the path of the audio file.
    #[instrument(skip(self, text), fields(chars = text.len()))]
    pub async fn synthesize(
        &self,
        text: &str,
        speaker: Speaker,
        language: Language,
        use_advanced: bool,
        voice_seed: u32,
    ) -> Result<PathBuf> {
        let request = SynthesisRequest {
            text: text.to_string(),
            speaker,
            language,
            backend: BackendChoice::from_advanced(use_advanced),
            voice_seed,
        };

        self.synthesize_request(&request).await
    }

    pub async fn synthesize_request(&self, request: &SynthesisRequest) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.work_dir).await?;
        self.backend(request.backend)
            .synthesize(request, &self.work_dir)
            .await
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Writes a small text file per call and records what it was asked for.
    pub(crate) struct RecordingBackend {
        name: &'static str,
        pub(crate) calls: Mutex<Vec<SynthesisRequest>>,
    }

    impl RecordingBackend {
        pub(crate) fn new(name: &'static str) -> Self {
            Self {
                name,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl SpeechBackend for RecordingBackend {
        async fn synthesize(&self, request: &SynthesisRequest, work_dir: &Path) -> Result<PathBuf> {
            self.calls.lock().unwrap().push(request.clone());
            let path = work_dir.join(clip_file_name(
                request.language.generative_code(),
                request.speaker,
                "wav",
            ));
            std::fs::write(&path, request.text.as_bytes())?;
            Ok(path)
        }

        fn name(&self) -> &str {
            self.name
        }
    }

    #[tokio::test]
    async fn test_dispatch_on_advanced_flag() {
        let dir = tempfile::tempdir().unwrap();
        let hosted = Arc::new(RecordingBackend::new("hosted"));
        let generative = Arc::new(RecordingBackend::new("generative"));
        let synth = AudioSynthesizer::new(hosted.clone(), generative.clone(), dir.path().join("work"));

        let path = synth
            .synthesize("Hello", Speaker::Host, Language::English, false, 3)
            .await
            .unwrap();
        assert_eq!(path.file_name().unwrap(), "audio_en_host.wav");
        assert_eq!(hosted.calls.lock().unwrap().len(), 1);
        assert!(generative.calls.lock().unwrap().is_empty());

        synth
            .synthesize("Bonjour", Speaker::Guest, Language::French, true, 3)
            .await
            .unwrap();
        let calls = generative.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].backend, BackendChoice::Generative);
        assert_eq!(calls[0].voice_seed, 3);
    }

    #[test]
    fn test_clip_file_name() {
        assert_eq!(clip_file_name("EN", Speaker::Guest, "mp3"), "audio_EN_guest.mp3");
    }
}
