//! Core types for storyreel-core

use serde::{Deserialize, Serialize};

/// One story's narration text.
///
/// Non-empty, trimmed lines joined by `\n`, heading markers stripped.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrationUnit {
    pub text: String,
}

impl NarrationUnit {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Whitespace-separated words across all lines.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.text.split_whitespace()
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.lines()
    }

    pub fn word_count(&self) -> usize {
        self.words().count()
    }
}

/// Word with timestamps.
///
/// Produced by a transcriber or synthesized by the pacing planner.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimedWord {
    /// Word text
    pub text: String,
    /// Start time in seconds
    pub start: f32,
    /// End time in seconds
    pub end: f32,
}

impl TimedWord {
    pub fn new(text: impl Into<String>, start: f32, end: f32) -> Self {
        Self {
            text: text.into(),
            start,
            end,
        }
    }

    /// Length in characters, not bytes.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Silence between this word and `next`, clamped to zero on overlap.
    pub fn gap_to(&self, next: &TimedWord) -> f32 {
        (next.start - self.end).max(0.0)
    }
}

/// Time-bounded caption covering one or more consecutive words.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CaptionSegment {
    /// Start time in seconds
    pub start: f32,
    /// End time in seconds
    pub end: f32,
    /// Words joined by a single space
    pub text: String,
    /// Words in original order
    pub words: Vec<String>,
}

impl CaptionSegment {
    pub fn new(words: Vec<String>, start: f32, end: f32) -> Self {
        Self {
            start,
            end,
            text: words.join(" "),
            words,
        }
    }

    pub fn duration(&self) -> f32 {
        self.end - self.start
    }
}

/// One instant of caption rendering state handed to the compositor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RenderCue {
    pub segment: CaptionSegment,
    /// Index into `segment.words` of the highlighted word, if any
    pub highlight_index: Option<usize>,
}

impl RenderCue {
    pub fn start(&self) -> f32 {
        self.segment.start
    }

    pub fn end(&self) -> f32 {
        self.segment.end
    }

    pub fn duration(&self) -> f32 {
        self.segment.duration()
    }

    pub fn highlighted_word(&self) -> Option<&str> {
        self.highlight_index
            .and_then(|i| self.segment.words.get(i))
            .map(String::as_str)
    }
}

/// Timed words for one narration unit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    pub words: Vec<TimedWord>,
    /// Uniform per-word duration when timing was synthesized, `None` when
    /// real timestamps were used
    pub per_word: Option<f32>,
}

impl Timeline {
    pub fn is_synthetic(&self) -> bool {
        self.per_word.is_some()
    }

    /// End of the last word, or zero for an empty timeline.
    pub fn total_duration(&self) -> f32 {
        self.words.last().map_or(0.0, |w| w.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narration_unit_words_span_lines() {
        let unit = NarrationUnit::new("Hello world\nSecond  line");
        assert_eq!(
            unit.words().collect::<Vec<_>>(),
            ["Hello", "world", "Second", "line"]
        );
        assert_eq!(unit.lines().count(), 2);
        assert_eq!(unit.word_count(), 4);
    }

    #[test]
    fn gap_clamps_overlap_to_zero() {
        let a = TimedWord::new("a", 0.0, 1.0);
        let b = TimedWord::new("b", 0.8, 1.2);
        let c = TimedWord::new("c", 1.7, 2.0);
        assert_eq!(a.gap_to(&b), 0.0);
        assert!((b.gap_to(&c) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn char_len_counts_unicode_scalars() {
        assert_eq!(TimedWord::new("café", 0.0, 1.0).char_len(), 4);
    }

    #[test]
    fn caption_segment_joins_words() {
        let segment = CaptionSegment::new(vec!["a".into(), "bb".into()], 0.5, 1.5);
        assert_eq!(segment.text, "a bb");
        assert_eq!(segment.duration(), 1.0);
    }

    #[test]
    fn render_cue_resolves_highlight() {
        let segment = CaptionSegment::new(vec!["one".into(), "two".into()], 0.0, 1.0);
        let cue = RenderCue {
            segment: segment.clone(),
            highlight_index: Some(1),
        };
        assert_eq!(cue.highlighted_word(), Some("two"));

        let plain = RenderCue {
            segment,
            highlight_index: None,
        };
        assert_eq!(plain.highlighted_word(), None);
    }

    #[test]
    fn empty_timeline_has_zero_duration() {
        let timeline = Timeline {
            words: Vec::new(),
            per_word: None,
        };
        assert_eq!(timeline.total_duration(), 0.0);
        assert!(!timeline.is_synthetic());
    }
}
