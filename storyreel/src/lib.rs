//! storyreel: turns text stories into captioned vertical videos.
//!
//! The caption engine lives in [`storyreel_core`]. This crate wires it to
//! external tools:
//!
//! - [`tts`]: speech synthesis with `edge-tts`
//! - [`transcript`]: word timestamps from JSON sidecar files
//! - [`ffmpeg`]: background cutting, subtitle burn-in and audio mixing
//! - [`srt`], [`ass`]: caption track writers
//! - [`audio`]: narration length from WAV headers or ffprobe

pub mod ass;
pub mod audio;
pub mod cap;
pub mod cli;
pub mod config;
pub mod ffmpeg;
pub mod make;
pub mod srt;
pub mod stories;
pub mod tool;
pub mod transcript;
pub mod tts;
