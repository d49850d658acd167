//! CLI module for Samtale.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use crate::config::LlmProvider;
use crate::dialogue::{DialogueLength, Tone, TranscriptFormat};
use crate::document::Source;
use crate::language::Language;
use crate::orchestrator::PodcastRequest;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Samtale - turn documents and web pages into a two-person podcast
///
/// Reads PDFs, text files or a web page, has a language model write a
/// conversation between a host and a guest, and voices every line.
/// The name "Samtale" is Norwegian for "conversation."
#[derive(Parser, Debug)]
#[command(name = "samtale")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a podcast: script, one audio clip per line, transcript
    Generate {
        #[command(flatten)]
        podcast: PodcastArgs,

        /// Render audio with the local generative model (any language)
        #[arg(short, long)]
        advanced_audio: bool,

        /// Keep the per-line clips only, do not combine them with ffmpeg
        #[arg(long)]
        no_combine: bool,
    },

    /// Write the podcast script without generating audio
    Script {
        #[command(flatten)]
        podcast: PodcastArgs,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format (json, markdown)
        #[arg(long, default_value = "json")]
        format: TranscriptFormat,
    },

    /// Print the text the reader proxy extracts from a web page
    Fetch {
        /// Page URL
        url: String,
    },

    /// Check system requirements and configuration
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Source and style options shared by `generate` and `script`.
#[derive(Args, Debug, Clone)]
pub struct PodcastArgs {
    /// PDF or text files to build the podcast from
    pub files: Vec<PathBuf>,

    /// Web page to include (read through the reader proxy)
    #[arg(short, long)]
    pub url: Option<String>,

    /// Question or topic the podcast should focus on
    #[arg(short, long)]
    pub question: Option<String>,

    /// Tone (fun, formal)
    #[arg(short, long, default_value = "fun")]
    pub tone: Tone,

    /// Length (short: 1-2 min, medium: 3-5 min)
    #[arg(short, long, default_value = "medium")]
    pub length: DialogueLength,

    /// Output language
    #[arg(long, default_value = "English")]
    pub language: Language,

    /// LLM provider override (auto, managed, local)
    #[arg(long)]
    pub provider: Option<LlmProvider>,
}

impl PodcastArgs {
    pub fn sources(&self) -> Vec<Source> {
        let mut sources: Vec<Source> = self.files.iter().cloned().map(Source::from_path).collect();
        if let Some(url) = &self.url {
            sources.push(Source::Url(url.clone()));
        }
        sources
    }

    pub fn to_request(&self, advanced_audio: bool) -> PodcastRequest {
        PodcastRequest {
            sources: self.sources(),
            question: self.question.clone(),
            tone: self.tone,
            length: self.length,
            language: self.language,
            advanced_audio,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}
