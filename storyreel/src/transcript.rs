//! Word timestamps from JSON sidecar files.
//!
//! Accepts either a bare array of words or an object with a `words` array,
//! which covers the output of most Whisper front ends:
//!
//! ```json
//! [{"word": "Hello", "start": 0.0, "end": 0.42}]
//! {"words": [{"text": "Hello", "start": 0.0, "end": 0.42}]}
//! ```

use eyre::{Result, WrapErr};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use storyreel_core::traits::Transcriber;
use storyreel_core::types::TimedWord;

#[derive(Debug, Deserialize)]
struct WordEntry {
    #[serde(alias = "word")]
    text: String,
    start: f32,
    end: f32,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WordsFile {
    List(Vec<WordEntry>),
    Wrapped { words: Vec<WordEntry> },
}

/// Sidecar path for `audio`: `story_1.mp3` -> `story_1.words.json`.
pub fn sidecar_path(audio: &Path) -> PathBuf {
    audio.with_extension("words.json")
}

/// Parse word timestamps, dropping entries with blank text.
pub fn parse_words(json: &str) -> Result<Vec<TimedWord>> {
    let file: WordsFile = serde_json::from_str(json).wrap_err("invalid word timestamp JSON")?;

    let entries = match file {
        WordsFile::List(words) | WordsFile::Wrapped { words } => words,
    };

    Ok(entries
        .into_iter()
        .filter(|w| !w.text.trim().is_empty())
        .map(|w| TimedWord::new(w.text.trim(), w.start, w.end))
        .collect())
}

/// Read word timestamps from `path`.
pub fn read_words(path: &Path) -> Result<Vec<TimedWord>> {
    let json = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read word timestamps: {:?}", path.display()))?;

    parse_words(&json).wrap_err_with(|| format!("in {:?}", path.display()))
}

/// Transcriber reading timestamps produced ahead of time.
///
/// Without an explicit file, looks for the sidecar next to each audio file
/// and yields no words when there is none. An explicit file must exist.
#[derive(Clone, Debug, Default)]
pub struct SidecarTranscript {
    file: Option<PathBuf>,
}

impl SidecarTranscript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self {
            file: Some(path.into()),
        }
    }
}

impl Transcriber for SidecarTranscript {
    fn transcribe(&mut self, audio: &Path) -> Result<Vec<TimedWord>> {
        if let Some(file) = &self.file {
            return read_words(file);
        }

        let sidecar = sidecar_path(audio);
        if !sidecar.is_file() {
            tracing::debug!(path = ?sidecar.display(), "no word timestamps");
            return Ok(Vec::new());
        }

        let words = read_words(&sidecar)?;
        tracing::info!(path = ?sidecar.display(), words = words.len(), "loaded word timestamps");
        Ok(words)
    }
}
