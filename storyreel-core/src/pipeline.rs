//! Story-to-video pipeline over pluggable collaborators.

use crate::layout::Layout;
use crate::pacing::Pacing;
use crate::segment::Segmenter;
use crate::traits::{Compositor, RenderJob, SpeechSynthesizer, Transcriber};
use crate::types::{NarrationUnit, RenderCue, TimedWord};
use eyre::{Result, WrapErr};
use std::path::{Path, PathBuf};

/// Caption engine settings shared by every unit of a batch.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CaptionSettings {
    pub pacing: Pacing,
    pub segmenter: Segmenter,
    pub layout: Layout,
}

impl CaptionSettings {
    /// Validate all three stages up front so a bad flag fails the batch once.
    pub fn validate(&self) -> crate::error::Result<()> {
        self.pacing.validate()?;
        self.segmenter.validate()?;
        self.layout.validate()
    }

    /// Plan, segment and lay out one narration.
    pub fn cues(
        &self,
        duration: f32,
        text: &str,
        transcript: Vec<TimedWord>,
    ) -> crate::error::Result<Vec<RenderCue>> {
        let timeline = self.pacing.plan(duration, text, transcript)?;
        self.layout.cues(&timeline, &self.segmenter)
    }
}

/// Footage shared by every video of a batch.
#[derive(Clone, Debug)]
pub struct Footage {
    pub background: PathBuf,
    pub music: Option<PathBuf>,
}

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Rendered videos, by 1-based story number
    pub rendered: Vec<(usize, PathBuf)>,
    /// Failed stories, by 1-based story number
    pub failed: Vec<(usize, eyre::Report)>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.rendered.len() + self.failed.len()
    }
}

/// Generic narration pipeline.
///
/// Each unit goes through synthesis, transcription, caption layout and
/// compositing. Units are independent: a failure is recorded and the batch
/// moves on.
pub struct StoryPipeline<S, T, C> {
    synthesizer: S,
    transcriber: T,
    compositor: C,
    settings: CaptionSettings,
    footage: Footage,
}

impl<S, T, C> StoryPipeline<S, T, C>
where
    S: SpeechSynthesizer,
    T: Transcriber,
    C: Compositor,
{
    pub fn new(
        synthesizer: S,
        transcriber: T,
        compositor: C,
        settings: CaptionSettings,
        footage: Footage,
    ) -> Self {
        Self {
            synthesizer,
            transcriber,
            compositor,
            settings,
            footage,
        }
    }

    /// Process every unit, writing `story_<n>.mp4` and `audio/story_<n>.mp3`
    /// under `output_dir`.
    pub fn run_batch(&mut self, units: &[NarrationUnit], output_dir: &Path) -> BatchReport {
        let mut report = BatchReport::default();

        for (unit, number) in units.iter().zip(1..) {
            let audio = output_dir.join("audio").join(format!("story_{number}.mp3"));
            let output = output_dir.join(format!("story_{number}.mp4"));

            tracing::info!(story = number, total = units.len(), "processing story");

            match self.run_unit(unit, &audio, &output) {
                Ok(()) => {
                    tracing::info!(story = number, path = %output.display(), "video rendered");
                    report.rendered.push((number, output));
                }
                Err(e) => {
                    tracing::error!(story = number, error = %format!("{e:#}"), "story failed");
                    report.failed.push((number, e));
                }
            }
        }

        report
    }

    /// Render one narration unit to `output`, synthesizing speech into `audio`.
    pub fn run_unit(&mut self, unit: &NarrationUnit, audio: &Path, output: &Path) -> Result<()> {
        let duration = self
            .synthesizer
            .synthesize(&unit.text, audio)
            .wrap_err("speech synthesis failed")?;

        tracing::info!(duration = %format_secs(duration), "speech synthesized");

        let transcript = self.transcriber.transcribe(audio).unwrap_or_else(|e| {
            tracing::warn!(error = %format!("{e:#}"), "transcription failed, using uniform pacing");
            Vec::new()
        });

        let cues = self
            .settings
            .cues(duration, &unit.text, transcript)
            .wrap_err("caption layout failed")?;

        tracing::debug!(cues = cues.len(), "caption track ready");

        let job = RenderJob {
            base_video: self.footage.background.clone(),
            audio: audio.to_path_buf(),
            duration,
            music: self.footage.music.clone(),
            output: output.to_path_buf(),
        };

        self.compositor
            .render(&cues, &job)
            .wrap_err("video compositing failed")
    }
}

/// Format seconds as a string with two decimal places.
pub fn format_secs(secs: f32) -> String {
    format!("{:.2}s", secs)
}
