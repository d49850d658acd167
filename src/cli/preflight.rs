//! Pre-flight checks before expensive operations.
//!
//! Validates that required tools and configuration are available
//! before starting operations that would otherwise fail midway.

use crate::config::{LlmProvider, Settings};
use crate::error::{Result, SamtaleError};
use std::process::Command;

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Script only: needs the completion backend.
    Script,
    /// Full podcast: the completion backend plus whatever the audio path uses.
    Generate { advanced_audio: bool, combine: bool },
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    check_api_key(settings)?;

    if let Operation::Generate { advanced_audio, combine } = operation {
        if advanced_audio {
            check_tool(&settings.generative_tts.command)?;
        }
        if combine {
            check_tool("ffmpeg")?;
        }
    }
    Ok(())
}

/// An explicitly managed provider needs its key; `auto` falls back to local.
fn check_api_key(settings: &Settings) -> Result<()> {
    if settings.llm.provider != LlmProvider::Managed || settings.llm.api_key().is_some() {
        return Ok(());
    }

    let var = &settings.llm.api_key_env;
    Err(SamtaleError::Config(format!(
        "{} not set. Set it with: export {}='...' (or use --provider local)",
        var, var
    )))
}

/// Check if an external tool is available.
fn check_tool(name: &str) -> Result<()> {
    // ffmpeg uses -version (single dash), others use --help
    let probe_arg = match name {
        "ffmpeg" => "-version",
        _ => "--help",
    };
    match Command::new(name).arg(probe_arg).output() {
        Ok(output) if output.status.success() => Ok(()),
        Ok(_) => Err(SamtaleError::ToolNotFound(format!(
            "{} is installed but not working correctly",
            name
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(SamtaleError::ToolNotFound(name.to_string()))
        }
        Err(e) => Err(SamtaleError::ToolNotFound(format!("{}: {}", name, e))),
    }
}
