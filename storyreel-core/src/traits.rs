//! Seams for the external collaborators around the caption engine.
//!
//! The core never performs I/O itself. Drivers hand it a finished audio
//! duration and transcript, then pass the resulting cues to a compositor.

use crate::types::{RenderCue, TimedWord};
use eyre::Result;
use std::path::{Path, PathBuf};

/// Text-to-speech backend.
pub trait SpeechSynthesizer {
    /// Synthesize `text` into `output`, returning the audio duration in seconds.
    ///
    /// The duration must be positive for the pacing planner to accept it.
    fn synthesize(&mut self, text: &str, output: &Path) -> Result<f32>;
}

/// Speech-to-text backend producing word timestamps.
pub trait Transcriber {
    /// Word timestamps for `audio` in spoken order.
    ///
    /// An empty result is not an error: callers fall back to uniform pacing.
    fn transcribe(&mut self, audio: &Path) -> Result<Vec<TimedWord>>;
}

/// Inputs and output of one composited video.
#[derive(Clone, Debug)]
pub struct RenderJob {
    /// Background footage to cut and crop
    pub base_video: PathBuf,
    /// Narration track
    pub audio: PathBuf,
    /// Narration length in seconds
    pub duration: f32,
    /// Optional background music
    pub music: Option<PathBuf>,
    pub output: PathBuf,
}

/// Video backend that burns a cue track into footage.
pub trait Compositor {
    fn render(&mut self, cues: &[RenderCue], job: &RenderJob) -> Result<()>;
}

/// Transcriber for pipelines without speech-to-text.
///
/// Always yields no words, so every unit is paced uniformly.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoTranscript;

impl Transcriber for NoTranscript {
    fn transcribe(&mut self, _audio: &Path) -> Result<Vec<TimedWord>> {
        Ok(Vec::new())
    }
}
