//! Audio duration probing.

use eyre::{Result, WrapErr, ensure};
use hound::WavReader;
use std::path::Path;

/// Duration of an audio file in seconds.
///
/// WAV files are read directly; every other container goes through ffprobe.
pub fn probe_duration(path: &Path) -> Result<f32> {
    let is_wav = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("wav"));

    let duration = if is_wav {
        wav_duration(path)?
    } else {
        crate::ffmpeg::probe_duration(path)?
    };

    tracing::debug!(path = ?path.display(), duration, "probed audio");
    Ok(duration)
}

fn wav_duration(path: &Path) -> Result<f32> {
    let reader = WavReader::open(path)
        .wrap_err_with(|| format!("failed to load audio: {:?}", path.display()))?;
    let spec = reader.spec();

    ensure!(spec.sample_rate > 0, "invalid sample rate in {:?}", path.display());

    // Frames per channel
    Ok(reader.duration() as f32 / spec.sample_rate as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::{SampleFormat, WavSpec, WavWriter};

    fn create_silent_wav(path: &Path, sample_rate: u32, channels: u16, frames: u32) {
        let spec = WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(path, spec).unwrap();
        for _ in 0..frames * u32::from(channels) {
            writer.write_sample(0i16).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn reads_wav_duration() {
        let path = std::env::temp_dir().join("storyreel_probe_mono.wav");
        create_silent_wav(&path, 16000, 1, 24000);

        let duration = probe_duration(&path).unwrap();

        assert!((duration - 1.5).abs() < 1e-6);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn stereo_duration_counts_frames() {
        let path = std::env::temp_dir().join("storyreel_probe_stereo.WAV");
        create_silent_wav(&path, 8000, 2, 8000);

        let duration = probe_duration(&path).unwrap();

        assert!((duration - 1.0).abs() < 1e-6);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn missing_wav_is_an_error() {
        assert!(probe_duration(Path::new("storyreel-missing.wav")).is_err());
    }
}
