//! Audio file utilities.
//!
//! WAV encoding for raw model waveforms and ffmpeg-based concatenation of
//! per-line clips into the final podcast.

mod concat;
mod wav;

pub use concat::concat_clips;
pub use wav::{read_f32le, write_wav};
