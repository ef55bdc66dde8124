//! Background cutting, caption burn-in and audio muxing with ffmpeg.

use crate::ass::{AssStyle, generate_ass_file};
use crate::tool::{read_stdout, run_with_timeout};
use eyre::{Result, WrapErr, bail, ensure};
use std::ffi::OsString;
use std::path::Path;
use std::time::Duration;
use storyreel_core::pipeline::format_secs;
use storyreel_core::traits::{Compositor, RenderJob};
use storyreel_core::types::RenderCue;

pub const DEFAULT_WIDTH: u32 = 1080;
pub const DEFAULT_HEIGHT: u32 = 1920;

/// Video encoding flags.
#[derive(clap::Args, Clone, Debug, PartialEq)]
pub struct EncodeSettings {
    /// Output width in pixels
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    pub width: u32,

    /// Output height in pixels
    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    pub height: u32,

    /// Output frame rate
    #[arg(long, default_value_t = 30)]
    pub fps: u32,

    /// x264 constant rate factor (lower is better quality)
    #[arg(long, default_value_t = 25)]
    pub crf: u8,

    /// x264 encoding preset
    #[arg(long, default_value = "slow")]
    pub preset: String,

    /// Seconds skipped at the start of the background video
    #[arg(long, default_value_t = 1.0)]
    pub start_offset: f32,

    /// Seconds before a single ffmpeg run is killed
    #[arg(long = "timeout", default_value_t = 600)]
    pub timeout_secs: u64,

    /// Background music volume relative to the narration
    #[arg(long, default_value_t = 0.15)]
    pub music_volume: f32,

    /// AAC audio bitrate
    #[arg(long, default_value = "128k")]
    pub audio_bitrate: String,
}

impl Default for EncodeSettings {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            fps: 30,
            crf: 25,
            preset: "slow".to_string(),
            start_offset: 1.0,
            timeout_secs: 600,
            music_volume: 0.15,
            audio_bitrate: "128k".to_string(),
        }
    }
}

impl EncodeSettings {
    pub fn validate(&self) -> Result<()> {
        // libx264 with yuv420p needs even dimensions
        ensure!(
            self.width > 0 && self.height > 0 && self.width % 2 == 0 && self.height % 2 == 0,
            "output size must be even and non-zero, got {}x{}",
            self.width,
            self.height
        );
        ensure!(self.fps > 0, "fps must be positive");
        ensure!(self.crf <= 51, "crf must be in 0..=51, got {}", self.crf);
        ensure!(
            self.start_offset >= 0.0,
            "start offset must not be negative, got {}",
            self.start_offset
        );
        ensure!(self.timeout_secs > 0, "timeout must be positive");
        ensure!(
            self.music_volume >= 0.0,
            "music volume must not be negative, got {}",
            self.music_volume
        );
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn play_res(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Container duration in seconds as reported by ffprobe.
pub fn probe_duration(path: &Path) -> Result<f32> {
    let args: Vec<OsString> = vec![
        "-v".into(),
        "error".into(),
        "-show_entries".into(),
        "format=duration".into(),
        "-of".into(),
        "default=noprint_wrappers=1:nokey=1".into(),
        path.into(),
    ];

    let stdout = read_stdout("ffprobe", &args)
        .wrap_err_with(|| format!("failed to probe duration: {:?}", path.display()))?;

    stdout
        .parse::<f32>()
        .wrap_err_with(|| format!("ffprobe returned unparseable duration {stdout:?}"))
}

/// Start of the background cut.
///
/// Skips `offset` seconds when the source is long enough, otherwise starts
/// as late as still fits `duration`.
pub fn cut_start(offset: f32, duration: f32, total: f32) -> Result<f32> {
    if duration > total {
        bail!(
            "narration ({}) is longer than the background video ({})",
            format_secs(duration),
            format_secs(total)
        );
    }
    Ok(offset.min(total - duration).max(0.0))
}

/// Scale to cover the frame, then center-crop to exactly `width`x`height`.
pub fn scale_crop_filter(width: u32, height: u32) -> String {
    format!("scale={width}:{height}:force_original_aspect_ratio=increase,crop={width}:{height}")
}

/// Escape a path for use as a filter option value.
pub fn escape_filter_path(path: &Path) -> String {
    let mut escaped = String::new();
    for c in path.to_string_lossy().chars() {
        match c {
            '\\' => escaped.push('/'),
            ':' | '\'' | ',' | ';' | '[' | ']' => {
                escaped.push('\\');
                escaped.push(c);
            }
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Arguments cutting `duration` seconds of `source` from `start`, cropping
/// it to the output frame and burning in `subtitles`. The clip has no audio.
fn cut_args(
    settings: &EncodeSettings,
    source: &Path,
    subtitles: &Path,
    start: f32,
    duration: f32,
    output: &Path,
) -> Vec<OsString> {
    let filter = format!(
        "{},ass={}",
        scale_crop_filter(settings.width, settings.height),
        escape_filter_path(subtitles)
    );

    // Input seeking resets timestamps, so captions start at zero
    let mut args: Vec<OsString> = vec![
        "-y".into(),
        "-ss".into(),
        format!("{start:.2}").into(),
        "-t".into(),
        format!("{duration:.2}").into(),
        "-i".into(),
        source.into(),
        "-vf".into(),
        filter.into(),
    ];
    let crf = settings.crf.to_string();
    let fps = settings.fps.to_string();
    args.extend(
        [
            "-c:v",
            "libx264",
            "-preset",
            settings.preset.as_str(),
            "-crf",
            crf.as_str(),
            "-r",
            fps.as_str(),
            "-pix_fmt",
            "yuv420p",
            "-profile:v",
            "high",
            "-an",
        ]
        .map(OsString::from),
    );
    args.push(output.into());
    args
}

/// Arguments muxing the narration (and music, when given) into `clip`.
fn mux_args(
    settings: &EncodeSettings,
    clip: &Path,
    narration: &Path,
    music: Option<&Path>,
    output: &Path,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "-y".into(),
        "-i".into(),
        clip.into(),
        "-i".into(),
        narration.into(),
    ];

    match music {
        Some(music) => {
            let graph = format!(
                "[2:a]volume={}[m];[1:a][m]amix=inputs=2:duration=first:normalize=0[a]",
                settings.music_volume
            );
            let mix: [OsString; 10] = [
                "-stream_loop".into(),
                "-1".into(),
                "-i".into(),
                music.into(),
                "-filter_complex".into(),
                graph.into(),
                "-map".into(),
                "0:v".into(),
                "-map".into(),
                "[a]".into(),
            ];
            args.extend(mix);
        }
        None => {
            args.extend(["-map", "0:v", "-map", "1:a"].map(OsString::from));
        }
    }

    args.extend(
        [
            "-c:v",
            "copy",
            "-c:a",
            "aac",
            "-b:a",
            settings.audio_bitrate.as_str(),
            "-shortest",
        ]
        .map(OsString::from),
    );
    args.push(output.into());
    args
}

/// Compositor that renders one video per job with ffmpeg.
///
/// Intermediate files (`<output>.ass`, `<output>.clip.mp4`) are written next
/// to the output and removed afterwards.
#[derive(Clone, Debug)]
pub struct FfmpegCompositor {
    settings: EncodeSettings,
    style: AssStyle,
}

impl FfmpegCompositor {
    pub fn new(settings: EncodeSettings, style: AssStyle) -> Self {
        Self { settings, style }
    }

    fn compose(
        &self,
        cues: &[RenderCue],
        job: &RenderJob,
        subtitles: &Path,
        clip: &Path,
    ) -> Result<()> {
        ensure!(
            job.base_video.is_file(),
            "background video not found: {:?}",
            job.base_video.display()
        );
        ensure!(
            job.audio.is_file(),
            "narration not found: {:?}",
            job.audio.display()
        );

        let total = probe_duration(&job.base_video)?;
        let start = cut_start(self.settings.start_offset, job.duration, total)?;

        std::fs::write(
            subtitles,
            generate_ass_file(cues, &self.style, self.settings.play_res()),
        )
        .wrap_err_with(|| format!("failed to write captions: {:?}", subtitles.display()))?;

        tracing::info!(
            start = %format_secs(start),
            duration = %format_secs(job.duration),
            "cutting background"
        );

        run_with_timeout(
            "ffmpeg",
            &cut_args(&self.settings, &job.base_video, subtitles, start, job.duration, clip),
            self.settings.timeout(),
        )
        .wrap_err("failed to cut background video")?;

        tracing::info!(music = job.music.is_some(), "muxing audio");

        run_with_timeout(
            "ffmpeg",
            &mux_args(&self.settings, clip, &job.audio, job.music.as_deref(), &job.output),
            self.settings.timeout(),
        )
        .wrap_err("failed to mux audio")
    }
}

impl Compositor for FfmpegCompositor {
    fn render(&mut self, cues: &[RenderCue], job: &RenderJob) -> Result<()> {
        let subtitles = job.output.with_extension("ass");
        let clip = job.output.with_extension("clip.mp4");

        let result = self.compose(cues, job, &subtitles, &clip);

        for temp in [&subtitles, &clip] {
            remove_temp(temp);
        }

        result
    }
}

/// Remove an intermediate file, warning when it exists but cannot be deleted.
pub fn remove_temp(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => tracing::debug!(path = ?path.display(), "removed temporary file"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            tracing::warn!(path = ?path.display(), error = %e, "failed to remove temporary file")
        }
    }
}
