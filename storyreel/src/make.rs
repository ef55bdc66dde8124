//! Make subcommand - render one captioned video per story.

use crate::cli::CaptionArgs;
use crate::config::CaptionConfig;
use crate::ffmpeg::{EncodeSettings, FfmpegCompositor};
use crate::transcript::SidecarTranscript;
use crate::tts::{EdgeTts, VoiceArgs};
use color_eyre::Section;
use eyre::{Result, WrapErr, eyre};
use std::path::PathBuf;
use storyreel_core::pipeline::{Footage, StoryPipeline};
use storyreel_core::story::parse_stories;

/// CLI arguments for the batch pipeline.
#[derive(clap::Args, Debug)]
pub struct Args {
    /// Stories file, one `STORY` heading per story
    pub stories: PathBuf,

    /// Background video to cut from
    #[arg(long)]
    pub video: PathBuf,

    /// Background music, looped under the narration
    #[arg(long)]
    pub music: Option<PathBuf>,

    /// Output directory (default: system video directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(flatten, next_help_heading = "Voice")]
    pub voice: VoiceArgs,

    #[command(flatten)]
    pub captions: CaptionArgs,

    #[command(flatten, next_help_heading = "Encoding")]
    pub encode: EncodeSettings,
}

/// Resolved configuration for the batch pipeline.
#[derive(Debug)]
pub struct Config {
    pub stories: PathBuf,
    pub footage: Footage,
    pub output_dir: PathBuf,
    pub tts: EdgeTts,
    pub captions: CaptionConfig,
    pub encode: EncodeSettings,
}

impl TryFrom<Args> for Config {
    type Error = eyre::Error;

    fn try_from(args: Args) -> Result<Self> {
        if !args.video.is_file() {
            return Err(
                eyre!("background video not found: {:?}", args.video.display())
                    .suggestion("pass an existing video file with --video"),
            );
        }
        if let Some(music) = args.music.as_deref().filter(|m| !m.is_file()) {
            return Err(eyre!("music not found: {:?}", music.display()));
        }

        args.encode.validate().wrap_err("invalid encoding settings")?;

        let output_dir = args.output.unwrap_or_else(default_output_dir);

        Ok(Self {
            stories: args.stories,
            footage: Footage {
                background: args.video,
                music: args.music,
            },
            output_dir,
            tts: EdgeTts::try_from((args.voice, args.encode.timeout()))?,
            captions: args.captions.try_into()?,
            encode: args.encode,
        })
    }
}

/// `<system video dir>/storyreel`, or `./output` without one.
fn default_output_dir() -> PathBuf {
    dirs::video_dir()
        .map(|dir| dir.join("storyreel"))
        .unwrap_or_else(|| PathBuf::from("output"))
}

pub fn execute(config: Config) -> Result<()> {
    let source = std::fs::read_to_string(&config.stories)
        .wrap_err_with(|| format!("failed to read stories: {:?}", config.stories.display()))?;

    let units = parse_stories(&source)
        .with_suggestion(|| "start each story with a line beginning with `STORY`")?;

    tracing::info!(
        stories = units.len(),
        output = ?config.output_dir.display(),
        "starting batch"
    );

    let audio_dir = config.output_dir.join("audio");
    std::fs::create_dir_all(&audio_dir)
        .wrap_err_with(|| format!("failed to create {:?}", audio_dir.display()))?;

    let compositor = FfmpegCompositor::new(config.encode, config.captions.style);

    let report = StoryPipeline::new(
        config.tts,
        SidecarTranscript::new(),
        compositor,
        config.captions.settings,
        config.footage,
    )
    .run_batch(&units, &config.output_dir);

    tracing::info!(
        rendered = report.rendered.len(),
        failed = report.failed.len(),
        total = report.total(),
        "batch finished"
    );

    for (_, path) in &report.rendered {
        println!("{}", path.display());
    }

    match report.failed.into_iter().next() {
        Some((number, e)) if report.rendered.is_empty() => Err(e
            .wrap_err(format!("all {} stories failed", units.len()))
            .with_note(|| format!("first failure was story {number}"))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;

    fn args(extra: &[&str]) -> Args {
        let cli = Cli::parse_from(["reel", "make", "stories.txt"].iter().chain(extra));
        match cli.command {
            Commands::Make(args) => args,
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_voice_and_encoding_flags() {
        let args = args(&[
            "--video",
            "bg.mp4",
            "--voice",
            "en-GB-RyanNeural",
            "--speed",
            "1.25",
            "--crf",
            "20",
            "--music-volume",
            "0.3",
        ]);

        assert_eq!(args.voice.voice, "en-GB-RyanNeural");
        assert!((args.voice.speed - 1.25).abs() < 1e-6);
        assert_eq!(args.encode.crf, 20);
        assert!((args.encode.music_volume - 0.3).abs() < 1e-6);
        assert_eq!(args.encode.width, 1080);
    }

    #[test]
    fn missing_background_is_rejected() {
        let args = args(&["--video", "storyreel-missing-background.mp4"]);
        assert!(Config::try_from(args).is_err());
    }

    #[test]
    fn resolves_output_and_footage() {
        let video = std::env::temp_dir().join("storyreel_make_bg.mp4");
        std::fs::write(&video, b"").unwrap();

        let args = args(&["--video", video.to_str().unwrap(), "-o", "renders"]);
        let config = Config::try_from(args).unwrap();

        assert_eq!(config.output_dir, PathBuf::from("renders"));
        assert_eq!(config.footage.background, video);
        assert!(config.footage.music.is_none());

        std::fs::remove_file(video).ok();
    }

    #[test]
    fn default_output_is_named_after_the_tool() {
        let dir = default_output_dir();
        assert!(dir.ends_with("storyreel") || dir == PathBuf::from("output"));
    }
}
