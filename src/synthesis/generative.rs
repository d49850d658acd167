//! Local generative speech: a waveform model driven by a voice-identity prompt.

use super::{clip_file_name, SpeechBackend, SynthesisRequest};
use crate::audio::{read_f32le, write_wav};
use crate::config::GenerativeTtsSettings;
use crate::dialogue::Speaker;
use crate::error::{Result, SamtaleError};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use tokio::process::Command;
use tracing::{debug, info, instrument};

/// A model that turns text into mono samples in the voice named by `history_prompt`.
#[async_trait]
pub trait WaveformModel: Send + Sync {
    async fn generate(&self, text: &str, history_prompt: &str) -> Result<Vec<f32>>;

    fn sample_rate(&self) -> u32;
}

/// Highest voice seed. The guest speaks with seed + 1, and the preset
/// voices go up to `speaker_9`.
pub const MAX_VOICE_SEED: u32 = 8;

/// Voice number for a speaker: the host takes the seed, the guest the next voice.
pub fn voice_number(speaker: Speaker, seed: u32) -> u32 {
    match speaker {
        Speaker::Host => seed,
        Speaker::Guest => seed.saturating_add(1),
    }
}

/// `v2/{code}_speaker_{n}`
pub fn history_prompt(language_code: &str, voice: u32) -> String {
    format!("v2/{}_speaker_{}", language_code, voice)
}

/// Runs an external generator that prints little-endian f32 samples to stdout.
pub struct CommandWaveformModel {
    command: String,
    args: Vec<String>,
    sample_rate: u32,
}

impl CommandWaveformModel {
    pub fn new(settings: &GenerativeTtsSettings) -> Self {
        Self {
            command: settings.command.clone(),
            args: settings.args.clone(),
            sample_rate: settings.sample_rate,
        }
    }
}

#[async_trait]
impl WaveformModel for CommandWaveformModel {
    async fn generate(&self, text: &str, history_prompt: &str) -> Result<Vec<f32>> {
        debug!("Running {} with {}", self.command, history_prompt);

        let result = Command::new(&self.command)
            .args(&self.args)
            .arg("--text")
            .arg(text)
            .arg("--history-prompt")
            .arg(history_prompt)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await;

        let output = match result {
            Ok(out) => out,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SamtaleError::ToolNotFound(self.command.clone()))
            }
            Err(e) => return Err(SamtaleError::Io(e)),
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SamtaleError::ToolFailed(format!(
                "{} exited with {}: {}",
                self.command,
                output.status,
                stderr.trim()
            )));
        }

        read_f32le(&output.stdout)
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

pub struct GenerativeTts {
    model: Arc<dyn WaveformModel>,
}

impl GenerativeTts {
    pub fn new(model: impl WaveformModel + 'static) -> Self {
        Self {
            model: Arc::new(model),
        }
    }
}

#[async_trait]
impl SpeechBackend for GenerativeTts {
    #[instrument(skip(self, request, work_dir), fields(speaker = %request.speaker, language = %request.language))]
    async fn synthesize(&self, request: &SynthesisRequest, work_dir: &Path) -> Result<PathBuf> {
        let code = request.language.generative_code();
        let prompt = history_prompt(code, voice_number(request.speaker, request.voice_seed));

        let samples = self.model.generate(&request.text, &prompt).await?;
        if samples.is_empty() {
            return Err(SamtaleError::Synthesis(format!(
                "Model produced no audio for {}",
                prompt
            )));
        }

        let path = work_dir.join(clip_file_name(code, request.speaker, "wav"));
        write_wav(&path, &samples, self.model.sample_rate())?;

        info!("Generated clip: {} ({} samples)", path.display(), samples.len());
        Ok(path)
    }

    fn name(&self) -> &str {
        "generative"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Language;
    use crate::synthesis::BackendChoice;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct FakeModel {
        prompts: Mutex<Vec<String>>,
        samples: Vec<f32>,
    }

    #[async_trait]
    impl WaveformModel for Arc<FakeModel> {
        async fn generate(&self, _text: &str, history_prompt: &str) -> Result<Vec<f32>> {
            self.prompts.lock().unwrap().push(history_prompt.to_string());
            Ok(self.samples.clone())
        }

        fn sample_rate(&self) -> u32 {
            24_000
        }
    }

    struct FailingModel {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl WaveformModel for Arc<FailingModel> {
        async fn generate(&self, _text: &str, _history_prompt: &str) -> Result<Vec<f32>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(SamtaleError::ToolFailed("bark-generate exited with 1".to_string()))
        }

        fn sample_rate(&self) -> u32 {
            24_000
        }
    }

    fn request(speaker: Speaker, seed: u32) -> SynthesisRequest {
        SynthesisRequest {
            text: "Hola".to_string(),
            speaker,
            language: Language::Spanish,
            backend: BackendChoice::Generative,
            voice_seed: seed,
        }
    }

    #[test]
    fn test_voice_selection() {
        assert_eq!(voice_number(Speaker::Host, 4), 4);
        assert_eq!(voice_number(Speaker::Guest, 4), 5);
        assert_eq!(history_prompt("en", 9), "v2/en_speaker_9");
        assert_eq!(voice_number(Speaker::Guest, MAX_VOICE_SEED), 9);
        assert_eq!(voice_number(Speaker::Guest, u32::MAX), u32::MAX);
    }

    #[tokio::test]
    async fn test_writes_wav_per_language_and_speaker() {
        let model = Arc::new(FakeModel {
            prompts: Mutex::new(Vec::new()),
            samples: vec![0.1; 240],
        });
        let tts = GenerativeTts::new(model.clone());
        let dir = tempfile::tempdir().unwrap();

        let host = tts.synthesize(&request(Speaker::Host, 2), dir.path()).await.unwrap();
        let guest = tts.synthesize(&request(Speaker::Guest, 2), dir.path()).await.unwrap();
        let again = tts.synthesize(&request(Speaker::Host, 2), dir.path()).await.unwrap();

        assert_eq!(host, dir.path().join("audio_es_host.wav"));
        assert_eq!(guest, dir.path().join("audio_es_guest.wav"));
        assert_eq!(again, host);
        assert_eq!(
            *model.prompts.lock().unwrap(),
            vec!["v2/es_speaker_2", "v2/es_speaker_3", "v2/es_speaker_2"]
        );

        let reader = hound::WavReader::open(&host).unwrap();
        assert_eq!(reader.spec().sample_rate, 24_000);
        assert_eq!(reader.len(), 240);
    }

    #[tokio::test]
    async fn test_empty_waveform_is_an_error() {
        let model = Arc::new(FakeModel {
            prompts: Mutex::new(Vec::new()),
            samples: Vec::new(),
        });
        let dir = tempfile::tempdir().unwrap();
        let err = GenerativeTts::new(model)
            .synthesize(&request(Speaker::Host, 0), dir.path())
            .await
            .unwrap_err();
        assert!(matches!(err, SamtaleError::Synthesis(_)));
    }

    #[tokio::test]
    async fn test_model_failure_is_not_retried() {
        let model = Arc::new(FailingModel {
            calls: AtomicUsize::new(0),
        });
        let dir = tempfile::tempdir().unwrap();
        let err = GenerativeTts::new(model.clone())
            .synthesize(&request(Speaker::Guest, 1), dir.path())
            .await
            .unwrap_err();

        assert!(matches!(err, SamtaleError::ToolFailed(_)));
        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
        assert!(!dir.path().join("audio_es_guest.wav").exists());
    }

    #[tokio::test]
    async fn test_missing_command() {
        let model = CommandWaveformModel::new(&GenerativeTtsSettings {
            command: "samtale-no-such-generator".to_string(),
            ..Default::default()
        });
        let err = model.generate("hi", "v2/en_speaker_0").await.unwrap_err();
        assert!(matches!(err, SamtaleError::ToolNotFound(_)));
    }
}
