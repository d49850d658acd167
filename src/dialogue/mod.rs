//! Podcast script data model, reply repair and transcript formatting.

mod format;
mod models;
pub mod repair;

pub use format::{format_dialogue, format_markdown, TranscriptFormat};
pub use models::{Dialogue, DialogueLength, DialogueLine, Speaker, Tone};
pub use repair::{repair, RepairKind, Repaired};
