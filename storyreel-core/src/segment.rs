//! Groups timed words into caption segments using a greedy single pass

use crate::error::{ConfigError, Error, Result};
use crate::types::{CaptionSegment, TimedWord};

/// Default maximum words per caption
const DEFAULT_WORDS_PER_CAPTION: usize = 3;

/// Default silence in seconds that forces a new caption
const DEFAULT_GAP_THRESHOLD: f32 = 0.6;

/// Default character count at which a word closes its caption
const DEFAULT_LONG_WORD_LENGTH: usize = 10;

/// Reason the buffered words were emitted as a segment
#[derive(Clone, Copy, Debug, PartialEq)]
enum Break {
    /// Buffer reached `words_per_caption`
    Full,
    /// Last word of the input
    End,
    /// Silence longer than `gap_threshold` follows
    Pause,
    /// Current word is at least `long_word_length` characters
    LongWord,
}

/// Caption segmentation configuration
#[derive(clap::Args, Clone, Copy, Debug, PartialEq)]
pub struct Segmenter {
    /// Maximum words per caption (default: 3)
    #[arg(long, default_value_t = DEFAULT_WORDS_PER_CAPTION)]
    pub words_per_caption: usize,

    /// Silence in seconds after a word that starts a new caption (default: 0.6)
    #[arg(long = "gap", default_value_t = DEFAULT_GAP_THRESHOLD)]
    pub gap_threshold: f32,

    /// Characters at which a word always ends its caption (default: 10)
    #[arg(long = "long-word", default_value_t = DEFAULT_LONG_WORD_LENGTH)]
    pub long_word_length: usize,
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::SHORTS
    }
}

impl Segmenter {
    /// Preset for fast-paced vertical video
    ///
    /// Short bursts of up to three words keep the eye near the center of the
    /// frame. Long words get their own caption so they are never squeezed.
    pub const SHORTS: Self = Self {
        words_per_caption: DEFAULT_WORDS_PER_CAPTION,
        gap_threshold: DEFAULT_GAP_THRESHOLD,
        long_word_length: DEFAULT_LONG_WORD_LENGTH,
    };

    #[cfg(test)]
    const TEST: Self = Self {
        words_per_caption: 4,
        gap_threshold: 1.0,
        long_word_length: 7,
    };

    pub fn validate(&self) -> Result<()> {
        if self.words_per_caption == 0 {
            return Err(ConfigError::InvalidSegmenter("words per caption must be at least 1").into());
        }
        if !self.gap_threshold.is_finite() || self.gap_threshold < 0.0 {
            return Err(ConfigError::InvalidSegmenter("gap threshold must be non-negative").into());
        }
        if self.long_word_length == 0 {
            return Err(ConfigError::InvalidSegmenter("long word length must be at least 1").into());
        }
        Ok(())
    }

    /// Group words into ordered, non-overlapping caption segments
    ///
    /// Every word lands in exactly one segment, in input order. Overlapping
    /// timestamps are tolerated: negative gaps count as zero and a segment
    /// never starts before the previous one ends.
    pub fn segment(&self, words: &[TimedWord]) -> Result<Vec<CaptionSegment>> {
        self.validate()?;

        if words.is_empty() {
            return Err(Error::EmptyWordList);
        }

        let mut segments: Vec<CaptionSegment> = Vec::new();
        let mut buffer: Vec<String> = Vec::with_capacity(self.words_per_caption);
        let mut buffer_start = None;

        for (i, word) in words.iter().enumerate() {
            let start = *buffer_start.get_or_insert(word.start);
            buffer.push(word.text.trim().to_string());

            let Some(reason) = self.break_after(word, words.get(i + 1), buffer.len()) else {
                continue;
            };

            // repair transcriber overlap against the previous segment
            let start = segments.last().map_or(start, |prev| start.max(prev.end));
            let end = word.end.max(start);

            tracing::trace!(?reason, start, end, words = buffer.len(), "close segment");

            segments.push(CaptionSegment::new(std::mem::take(&mut buffer), start, end));
            buffer_start = None;
        }

        tracing::debug!(
            words = words.len(),
            segments = segments.len(),
            "segmented captions"
        );

        Ok(segments)
    }

    /// Decide whether the buffer closes at `word`
    fn break_after(&self, word: &TimedWord, next: Option<&TimedWord>, len: usize) -> Option<Break> {
        let Some(next) = next else {
            return Some(Break::End);
        };

        if len >= self.words_per_caption {
            Some(Break::Full)
        } else if word.gap_to(next) > self.gap_threshold {
            Some(Break::Pause)
        } else if word.char_len() >= self.long_word_length {
            Some(Break::LongWord)
        } else {
            None
        }
    }
}
