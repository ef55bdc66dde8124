//! Layout and highlight assignment - turns timing into render cues.

use crate::error::{ConfigError, Error, Result};
use crate::segment::Segmenter;
use crate::types::{CaptionSegment, RenderCue, TimedWord, Timeline};

/// Default words per highlighted line
pub const DEFAULT_LINE_LENGTH: usize = 5;

/// How captions are drawn on screen.
#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LayoutMode {
    /// Whole line visible, current word highlighted
    #[default]
    Highlight,
    /// One plain caption per segment
    Segments,
}

/// Cue layout configuration.
#[derive(clap::Args, Clone, Copy, Debug, PartialEq)]
pub struct Layout {
    /// Caption style
    #[arg(long, value_enum, default_value_t = LayoutMode::Highlight)]
    pub mode: LayoutMode,

    /// Words per line in highlight mode
    #[arg(long, default_value_t = DEFAULT_LINE_LENGTH)]
    pub line_length: usize,
}

impl Default for Layout {
    fn default() -> Self {
        Self::new(LayoutMode::default(), DEFAULT_LINE_LENGTH)
    }
}

impl Layout {
    pub fn new(mode: LayoutMode, line_length: usize) -> Self {
        Self { mode, line_length }
    }

    pub fn validate(&self) -> Result<()> {
        if self.line_length == 0 {
            return Err(ConfigError::InvalidLineLength(self.line_length).into());
        }
        Ok(())
    }

    /// Build the cue track for a planned timeline.
    ///
    /// `segmenter` is only consulted in [`LayoutMode::Segments`].
    pub fn cues(&self, timeline: &Timeline, segmenter: &Segmenter) -> Result<Vec<RenderCue>> {
        match self.mode {
            LayoutMode::Highlight => word_highlight_cues(&timeline.words, self.line_length),
            LayoutMode::Segments => segmenter
                .segment(&timeline.words)
                .map(|segments| segment_cues(&segments)),
        }
    }
}

/// One cue per word, each showing its whole line with that word highlighted.
///
/// Words are grouped into lines of `line_length`. Cues tile the timeline:
/// each starts where the previous one ended and runs until the next word
/// starts, so a highlight holds through pauses. With uniform pacing cue `i`
/// spans exactly `[i * p, (i + 1) * p]`.
///
/// # Errors
///
/// - [`Error::EmptyWordList`] if `words` is empty
/// - [`ConfigError::InvalidLineLength`] if `line_length` is zero
pub fn word_highlight_cues(words: &[TimedWord], line_length: usize) -> Result<Vec<RenderCue>> {
    if line_length == 0 {
        return Err(ConfigError::InvalidLineLength(line_length).into());
    }
    if words.is_empty() {
        return Err(Error::EmptyWordList);
    }

    let mut cues = Vec::with_capacity(words.len());
    let mut cursor = words[0].start;

    for (line_index, line) in words.chunks(line_length).enumerate() {
        let texts: Vec<String> = line.iter().map(|w| w.text.trim().to_string()).collect();

        for (i, word) in line.iter().enumerate() {
            let next_start = words.get(line_index * line_length + i + 1).map(|w| w.start);

            let start = cursor;
            let end = next_start.unwrap_or(word.end).max(start);
            cursor = end;

            cues.push(RenderCue {
                segment: CaptionSegment::new(texts.clone(), start, end),
                highlight_index: Some(i),
            });
        }
    }

    tracing::debug!(cues = cues.len(), line_length, "assigned word highlights");

    Ok(cues)
}

/// One plain cue per caption segment with the segment's own timing.
pub fn segment_cues(segments: &[CaptionSegment]) -> Vec<RenderCue> {
    segments
        .iter()
        .map(|segment| RenderCue {
            segment: segment.clone(),
            highlight_index: None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pacing::Pacing;

    fn uniform(texts: &[&str], per_word: f32) -> Vec<TimedWord> {
        let duration = per_word * texts.len() as f32;
        Pacing::new(per_word, per_word)
            .plan_uniform(duration, texts)
            .unwrap()
            .words
    }

    #[test]
    fn highlights_each_word_within_its_line() {
        let words = uniform(&["a", "b", "c", "d", "e", "f", "g"], 0.5);

        let cues = word_highlight_cues(&words, 3).unwrap();

        assert_eq!(cues.len(), 7);
        assert_eq!(cues[0].segment.text, "a b c");
        assert_eq!(cues[0].highlight_index, Some(0));
        assert_eq!(cues[4].segment.text, "d e f");
        assert_eq!(cues[4].highlighted_word(), Some("e"));
        assert_eq!(cues[6].segment.words, ["g"]);
        assert_eq!(cues[6].highlight_index, Some(0));
    }

    #[test]
    fn uniform_cues_tile_exactly() {
        let words = uniform(&["one", "two", "three", "four", "five", "six"], 0.4);

        let cues = word_highlight_cues(&words, DEFAULT_LINE_LENGTH).unwrap();

        assert_eq!(cues[0].start(), 0.0);
        for pair in cues.windows(2) {
            assert_eq!(pair[0].end(), pair[1].start());
        }
        for cue in &cues {
            assert!((cue.duration() - 0.4).abs() < 1e-5);
        }
        assert!((cues[5].end() - 2.4).abs() < 1e-5);
    }

    #[test]
    fn highlight_holds_through_pause() {
        let words = vec![
            TimedWord::new("wait", 0.2, 0.5),
            TimedWord::new("for", 1.5, 1.8),
            TimedWord::new("it", 1.8, 2.0),
        ];

        let cues = word_highlight_cues(&words, 5).unwrap();

        let spans: Vec<_> = cues.iter().map(|c| (c.start(), c.end())).collect();
        assert_eq!(spans, [(0.2, 1.5), (1.5, 1.8), (1.8, 2.0)]);
    }

    #[test]
    fn overlapping_words_never_produce_negative_cues() {
        let words = vec![
            TimedWord::new("a", 0.0, 1.0),
            TimedWord::new("b", 0.5, 0.6),
            TimedWord::new("c", 0.4, 0.9),
        ];

        let cues = word_highlight_cues(&words, 5).unwrap();

        for cue in &cues {
            assert!(cue.start() <= cue.end(), "{cue:?}");
        }
        for pair in cues.windows(2) {
            assert!(pair[0].end() <= pair[1].start());
        }
    }

    #[test]
    fn segment_cues_mirror_segments() {
        let segments = vec![
            CaptionSegment::new(vec!["hello".into(), "there".into()], 0.0, 0.8),
            CaptionSegment::new(vec!["friend".into()], 1.2, 1.6),
        ];

        let cues = segment_cues(&segments);

        assert_eq!(cues.len(), 2);
        for (cue, segment) in cues.iter().zip(&segments) {
            assert_eq!(&cue.segment, segment);
            assert_eq!(cue.highlight_index, None);
        }
    }

    #[test]
    fn rejects_empty_words_and_zero_line_length() {
        assert_eq!(word_highlight_cues(&[], 5), Err(Error::EmptyWordList));

        let words = uniform(&["a"], 0.5);
        assert_eq!(
            word_highlight_cues(&words, 0),
            Err(Error::InvalidConfig(ConfigError::InvalidLineLength(0)))
        );
    }

    #[test]
    fn layout_dispatches_on_mode() {
        let timeline = Pacing::default()
            .plan(2.0, "one two three four", Vec::new())
            .unwrap();
        let segmenter = Segmenter {
            words_per_caption: 2,
            ..Segmenter::default()
        };

        let highlight = Layout::new(LayoutMode::Highlight, 5)
            .cues(&timeline, &segmenter)
            .unwrap();
        assert_eq!(highlight.len(), 4);
        assert!(highlight.iter().all(|c| c.highlight_index.is_some()));

        let plain = Layout::new(LayoutMode::Segments, 5)
            .cues(&timeline, &segmenter)
            .unwrap();
        let texts: Vec<_> = plain.iter().map(|c| c.segment.text.as_str()).collect();
        assert_eq!(texts, ["one two", "three four"]);
        assert!(plain.iter().all(|c| c.highlight_index.is_none()));
    }
}
