//! Samtale - turn documents into a two-person podcast
//!
//! Reads PDFs, text files or a web page, has a language model write a
//! conversation between a host and a guest, and voices every line.
//!
//! The name "Samtale" is Norwegian for "conversation."
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration and prompt templates
//! - `document` - Source loading (PDF, text, web)
//! - `fetcher` - Web page text through a reader proxy, with retries
//! - `llm` - Completion backends (managed API, local server)
//! - `dialogue` - Script data model, reply repair, transcript formatting
//! - `script` - Draft and refine a script
//! - `synthesis` - Text-to-speech backends (hosted, generative)
//! - `audio` - WAV encoding and clip concatenation
//! - `orchestrator` - Pipeline coordination
//!
//! # Example
//!
//! ```rust,no_run
//! use samtale::config::Settings;
//! use samtale::dialogue::{DialogueLength, Tone};
//! use samtale::document::Source;
//! use samtale::language::Language;
//! use samtale::orchestrator::{Orchestrator, PodcastRequest};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let orchestrator = Orchestrator::new(settings)?;
//!
//!     let request = PodcastRequest {
//!         sources: vec![Source::from_path("paper.pdf")],
//!         question: None,
//!         tone: Tone::Fun,
//!         length: DialogueLength::Short,
//!         language: Language::English,
//!         advanced_audio: false,
//!     };
//!
//!     let result = orchestrator.run(&request).await?;
//!     println!("Wrote {} clips to {}", result.clips.len(), result.run_dir.display());
//!
//!     Ok(())
//! }
//! ```

pub mod audio;
pub mod cli;
pub mod config;
pub mod dialogue;
pub mod document;
pub mod error;
pub mod fetcher;
pub mod language;
pub mod llm;
pub mod openai;
pub mod orchestrator;
pub mod retry;
pub mod script;
pub mod synthesis;

pub use error::{Result, SamtaleError};
