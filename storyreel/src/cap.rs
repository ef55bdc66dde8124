//! Cap subcommand - caption track for one narration.

use crate::ass::{AssStyle, generate_ass_file};
use crate::cli::CaptionArgs;
use crate::config::CaptionConfig;
use crate::ffmpeg::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::srt;
use crate::transcript::SidecarTranscript;
use eyre::{Result, WrapErr};
use std::path::{Path, PathBuf};
use storyreel_core::pipeline::format_secs;
use storyreel_core::traits::Transcriber;
use storyreel_core::types::RenderCue;

/// Caption file format.
#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Format {
    #[default]
    Srt,
    Ass,
    Json,
}

impl Format {
    pub fn extension(self) -> &'static str {
        match self {
            Format::Srt => "srt",
            Format::Ass => "ass",
            Format::Json => "json",
        }
    }

    /// Format implied by a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "srt" => Some(Format::Srt),
            "ass" => Some(Format::Ass),
            "json" => Some(Format::Json),
            _ => None,
        }
    }
}

/// CLI arguments for caption generation.
#[derive(clap::Args, Debug)]
pub struct Args {
    /// Narration text file
    pub text: PathBuf,

    /// Narration audio (WAV read directly, anything else via ffprobe)
    #[arg(long)]
    pub audio: PathBuf,

    /// Word timestamps JSON (default: <audio>.words.json when present)
    #[arg(long)]
    pub words: Option<PathBuf>,

    /// Output path (default: text file with the format's extension)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format (default: from output extension, else srt)
    #[arg(long, value_enum)]
    pub format: Option<Format>,

    /// Print a preview of the first and last captions
    #[arg(long)]
    pub preview: bool,

    #[command(flatten)]
    pub captions: CaptionArgs,
}

/// Resolved configuration for caption generation.
#[derive(Debug)]
pub struct Config {
    pub text: PathBuf,
    pub audio: PathBuf,
    pub words: Option<PathBuf>,
    pub output: PathBuf,
    pub format: Format,
    pub preview: bool,
    pub captions: CaptionConfig,
}

impl TryFrom<Args> for Config {
    type Error = eyre::Error;

    fn try_from(args: Args) -> Result<Self> {
        let format = args
            .format
            .or_else(|| args.output.as_deref().and_then(Format::from_path))
            .unwrap_or_default();

        let output = args
            .output
            .unwrap_or_else(|| args.text.with_extension(format.extension()));

        Ok(Self {
            text: args.text,
            audio: args.audio,
            words: args.words,
            output,
            format,
            preview: args.preview,
            captions: args.captions.try_into()?,
        })
    }
}

pub fn execute(config: Config) -> Result<()> {
    tracing::info!(
        text = ?config.text.display(),
        audio = ?config.audio.display(),
        output = ?config.output.display(),
        "generating captions"
    );

    let text = std::fs::read_to_string(&config.text)
        .wrap_err_with(|| format!("failed to read narration: {:?}", config.text.display()))?;

    let duration = crate::audio::probe_duration(&config.audio)?;
    tracing::info!(duration = %format_secs(duration), "narration length");

    let mut transcriber = match config.words {
        Some(path) => SidecarTranscript::from_file(path),
        None => SidecarTranscript::new(),
    };
    let transcript = transcriber.transcribe(&config.audio)?;

    let cues = config
        .captions
        .settings
        .cues(duration, &text, transcript)
        .wrap_err("caption layout failed")?;

    tracing::info!(cues = cues.len(), path = ?config.output.display(), "write caption file");

    let content = render_cues(config.format, &cues, &config.captions.style)?;
    std::fs::write(&config.output, content)
        .wrap_err_with(|| format!("failed to write captions: {:?}", config.output.display()))?;

    if config.preview {
        print!("{}", srt::preview_subtitles(&srt::to_subtitles(&cues), 3, 3));
    }

    Ok(())
}

/// Serialize a cue track in `format`.
pub fn render_cues(format: Format, cues: &[RenderCue], style: &AssStyle) -> Result<String> {
    Ok(match format {
        Format::Srt => srt::display_subtitles(&srt::to_subtitles(cues)),
        Format::Ass => generate_ass_file(cues, style, (DEFAULT_WIDTH, DEFAULT_HEIGHT)),
        Format::Json => serde_json::to_string_pretty(cues).wrap_err("failed to serialize cues")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ass::StyleArgs;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use storyreel_core::types::CaptionSegment;

    fn parse(args: &[&str]) -> Config {
        let cli = Cli::parse_from(["reel", "cap"].iter().chain(args));
        match cli.command {
            Commands::Cap(args) => args.try_into().unwrap(),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn output_defaults_to_text_with_srt() {
        let config = parse(&["story.txt", "--audio", "story.mp3"]);

        assert_eq!(config.format, Format::Srt);
        assert_eq!(config.output, Path::new("story.srt"));
        assert!(config.words.is_none());
    }

    #[test]
    fn format_follows_output_extension() {
        let config = parse(&["story.txt", "--audio", "a.wav", "-o", "track.ASS"]);
        assert_eq!(config.format, Format::Ass);
    }

    #[test]
    fn explicit_format_names_default_output() {
        let config = parse(&["story.txt", "--audio", "a.wav", "--format", "json"]);

        assert_eq!(config.format, Format::Json);
        assert_eq!(config.output, Path::new("story.json"));
    }

    #[test]
    fn renders_every_format() {
        let cues = vec![RenderCue {
            segment: CaptionSegment::new(vec!["hi".into(), "there".into()], 0.0, 0.8),
            highlight_index: Some(0),
        }];
        let style = AssStyle::try_from(StyleArgs::default()).unwrap();

        let srt = render_cues(Format::Srt, &cues, &style).unwrap();
        assert!(srt.contains("<b>hi</b> there"));

        let ass = render_cues(Format::Ass, &cues, &style).unwrap();
        assert_eq!(ass.matches("Dialogue:").count(), 1);

        let json = render_cues(Format::Json, &cues, &style).unwrap();
        let back: Vec<RenderCue> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cues);
    }

    #[test]
    fn captions_a_wav_narration() {
        let dir = std::env::temp_dir().join("storyreel_cap_test");
        std::fs::create_dir_all(&dir).unwrap();
        let text = dir.join("story.txt");
        let audio = dir.join("story.wav");
        std::fs::write(&text, "one two three four five six").unwrap();

        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&audio, spec).unwrap();
        for _ in 0..8000 * 3 {
            writer.write_sample(0i16).unwrap();
        }
        writer.finalize().unwrap();

        let config = parse(&[
            text.to_str().unwrap(),
            "--audio",
            audio.to_str().unwrap(),
            "--mode",
            "segments",
        ]);
        let output = config.output.clone();
        execute(config).unwrap();

        let srt = std::fs::read_to_string(&output).unwrap();
        assert!(srt.contains("one two three"));
        assert!(srt.contains("four five six"));
        assert!(srt.contains("00:00:01,500 --> 00:00:03,000"));

        std::fs::remove_dir_all(dir).ok();
    }
}
