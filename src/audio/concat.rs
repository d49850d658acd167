//! Clip concatenation with ffmpeg.

use crate::error::{Result, SamtaleError};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{info, instrument};

/// Concatenate audio clips in order into a single MP3 at `dest`.
///
/// Clips may differ in format and sample rate; everything is re-encoded.
#[instrument(skip(clips), fields(clips = clips.len(), dest = %dest.display()))]
pub async fn concat_clips(clips: &[PathBuf], dest: &Path) -> Result<()> {
    if clips.is_empty() {
        return Err(SamtaleError::Audio("No clips to concatenate".into()));
    }

    let list_dir = tempfile::tempdir()?;
    let list_path = list_dir.path().join("clips.txt");
    std::fs::write(&list_path, concat_list(clips)?)?;

    info!("Concatenating {} clips", clips.len());

    let result = Command::new("ffmpeg")
        .arg("-f").arg("concat")
        .arg("-safe").arg("0")
        .arg("-i").arg(&list_path)
        .arg("-vn")
        .arg("-codec:a").arg("libmp3lame")
        .arg("-qscale:a").arg("2")
        .arg("-y")
        .arg("-loglevel").arg("error")
        .arg(dest)
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .await;

    match result {
        Ok(out) if out.status.success() => Ok(()),
        Ok(out) => {
            let err = String::from_utf8_lossy(&out.stderr);
            Err(SamtaleError::Audio(format!("ffmpeg concatenation failed: {err}")))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(SamtaleError::ToolNotFound("ffmpeg".into()))
        }
        Err(e) => Err(SamtaleError::Audio(format!("ffmpeg error: {e}"))),
    }
}

/// Build an ffmpeg concat demuxer list with absolute, quoted paths.
fn concat_list(clips: &[PathBuf]) -> Result<String> {
    let mut list = String::new();
    for clip in clips {
        let path = std::path::absolute(clip)?;
        let escaped = path.to_string_lossy().replace('\'', "'\\''");
        list.push_str(&format!("file '{}'\n", escaped));
    }
    Ok(list)
}
