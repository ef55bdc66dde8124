//! Speech synthesis with the `edge-tts` command line tool.

use crate::ffmpeg::remove_temp;
use crate::tool::run_with_timeout;
use eyre::{Result, WrapErr, ensure};
use std::ffi::OsString;
use std::path::Path;
use std::time::Duration;
use storyreel_core::traits::SpeechSynthesizer;

pub const DEFAULT_VOICE: &str = "en-US-ChristopherNeural";
pub const DEFAULT_SPEED: f32 = 1.1;

/// Voice flags.
#[derive(clap::Args, Clone, Debug, PartialEq)]
pub struct VoiceArgs {
    /// edge-tts voice name (see `edge-tts --list-voices`)
    #[arg(long, default_value = DEFAULT_VOICE)]
    pub voice: String,

    /// Playback speed applied after synthesis
    #[arg(long, default_value_t = DEFAULT_SPEED)]
    pub speed: f32,
}

impl Default for VoiceArgs {
    fn default() -> Self {
        Self {
            voice: DEFAULT_VOICE.to_string(),
            speed: DEFAULT_SPEED,
        }
    }
}

/// Synthesizer backed by `edge-tts`, with an optional ffmpeg `atempo` pass.
#[derive(Clone, Debug)]
pub struct EdgeTts {
    voice: String,
    speed: f32,
    timeout: Duration,
}

impl EdgeTts {
    /// `speed` must lie in `0.5..=2.0`, the range a single `atempo` accepts.
    pub fn new(voice: impl Into<String>, speed: f32, timeout: Duration) -> Result<Self> {
        let voice = voice.into();
        ensure!(!voice.trim().is_empty(), "voice name must not be empty");
        ensure!(
            (0.5..=2.0).contains(&speed),
            "speed must be in 0.5..=2.0, got {speed}"
        );

        Ok(Self {
            voice,
            speed,
            timeout,
        })
    }

    fn needs_tempo(&self) -> bool {
        (self.speed - 1.0).abs() > f32::EPSILON
    }
}

impl TryFrom<(VoiceArgs, Duration)> for EdgeTts {
    type Error = eyre::Error;

    fn try_from((args, timeout): (VoiceArgs, Duration)) -> Result<Self> {
        Self::new(args.voice, args.speed, timeout)
    }
}

impl SpeechSynthesizer for EdgeTts {
    fn synthesize(&mut self, text: &str, output: &Path) -> Result<f32> {
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .wrap_err_with(|| format!("failed to create {:?}", parent.display()))?;
        }

        let raw = if self.needs_tempo() {
            output.with_extension("raw.mp3")
        } else {
            output.to_path_buf()
        };

        tracing::info!(
            voice = %self.voice,
            words = text.split_whitespace().count(),
            "synthesizing speech"
        );

        run_with_timeout(
            "edge-tts",
            &edge_tts_args(&self.voice, text, &raw),
            self.timeout,
        )?;

        if self.needs_tempo() {
            let result = run_with_timeout(
                "ffmpeg",
                &atempo_args(&raw, output, self.speed),
                self.timeout,
            )
            .wrap_err("failed to change speech tempo");
            remove_temp(&raw);
            result?;
        }

        let duration = crate::audio::probe_duration(output)?;
        ensure!(
            duration > 0.0,
            "synthesized audio is empty: {:?}",
            output.display()
        );

        Ok(duration)
    }
}

fn edge_tts_args(voice: &str, text: &str, output: &Path) -> Vec<OsString> {
    vec![
        "--voice".into(),
        voice.into(),
        "--text".into(),
        text.into(),
        "--write-media".into(),
        output.into(),
    ]
}

fn atempo_args(input: &Path, output: &Path, speed: f32) -> Vec<OsString> {
    vec![
        "-y".into(),
        "-i".into(),
        input.into(),
        "-filter:a".into(),
        format!("atempo={speed}").into(),
        output.into(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timeout() -> Duration {
        Duration::from_secs(60)
    }

    #[test]
    fn rejects_out_of_range_speed() {
        assert!(EdgeTts::new(DEFAULT_VOICE, 3.0, timeout()).is_err());
        assert!(EdgeTts::new(DEFAULT_VOICE, 0.0, timeout()).is_err());
        assert!(EdgeTts::new("  ", 1.0, timeout()).is_err());
    }

    #[test]
    fn tempo_pass_only_when_speed_changes() {
        assert!(EdgeTts::new(DEFAULT_VOICE, 1.1, timeout()).unwrap().needs_tempo());
        assert!(!EdgeTts::new(DEFAULT_VOICE, 1.0, timeout()).unwrap().needs_tempo());
    }

    #[test]
    fn builds_edge_tts_args() {
        let args = edge_tts_args("en-GB-RyanNeural", "Hi there", Path::new("a.mp3"));
        let args: Vec<_> = args.iter().map(|a| a.to_string_lossy()).collect();

        assert_eq!(
            args,
            ["--voice", "en-GB-RyanNeural", "--text", "Hi there", "--write-media", "a.mp3"]
        );
    }

    #[test]
    fn builds_atempo_filter() {
        let args = atempo_args(Path::new("raw.mp3"), Path::new("out.mp3"), 1.1);
        assert!(args.contains(&OsString::from("atempo=1.1")));
    }

    #[test]
    fn default_voice_args() {
        let args = VoiceArgs::default();
        let tts = EdgeTts::try_from((args, timeout())).unwrap();
        assert_eq!(tts.voice, DEFAULT_VOICE);
    }
}
