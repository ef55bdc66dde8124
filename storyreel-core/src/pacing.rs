//! Duration planning for narration without word timestamps.

use crate::error::{ConfigError, Result};
use crate::types::{TimedWord, Timeline};

/// Default minimum on-screen time per word in seconds
const DEFAULT_MIN_WORD_DURATION: f32 = 0.25;

/// Default maximum on-screen time per word in seconds
const DEFAULT_MAX_WORD_DURATION: f32 = 1.5;

/// Per-word pacing bounds.
///
/// Uniform pacing spreads the narration duration evenly over the words and
/// clamps the result to `[min_word_duration, max_word_duration]`. The clamp
/// is a hard limit: the synthetic timeline may over- or under-run the audio.
#[derive(clap::Args, Clone, Copy, Debug, PartialEq)]
pub struct Pacing {
    /// Minimum seconds a word stays on screen without timestamps
    #[arg(long = "min-word", default_value_t = DEFAULT_MIN_WORD_DURATION)]
    pub min_word_duration: f32,

    /// Maximum seconds a word stays on screen without timestamps
    #[arg(long = "max-word", default_value_t = DEFAULT_MAX_WORD_DURATION)]
    pub max_word_duration: f32,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            min_word_duration: DEFAULT_MIN_WORD_DURATION,
            max_word_duration: DEFAULT_MAX_WORD_DURATION,
        }
    }
}

impl Pacing {
    pub fn new(min_word_duration: f32, max_word_duration: f32) -> Self {
        Self {
            min_word_duration,
            max_word_duration,
        }
    }

    /// Check that both bounds are positive, finite and ordered.
    pub fn validate(&self) -> Result<()> {
        let Self {
            min_word_duration: min,
            max_word_duration: max,
        } = *self;

        let positive = |v: f32| v.is_finite() && v > 0.0;

        if positive(min) && positive(max) && min <= max {
            Ok(())
        } else {
            Err(ConfigError::InvalidWordDuration { min, max }.into())
        }
    }

    /// Uniform per-word duration for `word_count` words over `duration` seconds.
    pub fn per_word_duration(&self, duration: f32, word_count: usize) -> Result<f32> {
        self.validate()?;
        check_duration(duration)?;

        if word_count == 0 {
            return Err(ConfigError::NoWords.into());
        }

        let raw = duration / word_count as f32;
        let per_word = raw.clamp(self.min_word_duration, self.max_word_duration);

        if per_word != raw {
            tracing::debug!(raw, per_word, "clamped word duration");
        }

        Ok(per_word)
    }

    /// Lay out `words` back to back from zero at a uniform clamped pace.
    pub fn plan_uniform<S: AsRef<str>>(&self, duration: f32, words: &[S]) -> Result<Timeline> {
        let per_word = self.per_word_duration(duration, words.len())?;

        let words = words
            .iter()
            .zip(0u32..)
            .map(|(word, i)| {
                let start = i as f32 * per_word;
                let end = (i + 1) as f32 * per_word;
                TimedWord::new(word.as_ref(), start, end)
            })
            .collect();

        Ok(Timeline {
            words,
            per_word: Some(per_word),
        })
    }

    /// Pass real timestamps through unchanged.
    pub fn plan_timed(&self, duration: f32, words: Vec<TimedWord>) -> Result<Timeline> {
        check_duration(duration)?;

        if words.is_empty() {
            return Err(ConfigError::NoWords.into());
        }

        Ok(Timeline {
            words,
            per_word: None,
        })
    }

    /// Plan a narration unit, preferring `transcript` timestamps when present.
    ///
    /// An empty transcript falls back to uniform pacing over the
    /// whitespace-separated words of `text`.
    pub fn plan(&self, duration: f32, text: &str, transcript: Vec<TimedWord>) -> Result<Timeline> {
        if transcript.is_empty() {
            let words: Vec<&str> = text.split_whitespace().collect();
            tracing::debug!(words = words.len(), duration, "planning uniform pacing");
            self.plan_uniform(duration, &words)
        } else {
            tracing::debug!(words = transcript.len(), duration, "using transcript timing");
            self.plan_timed(duration, transcript)
        }
    }
}

fn check_duration(duration: f32) -> Result<()> {
    if duration.is_finite() && duration > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidDuration(duration).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn words(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("w{i}")).collect()
    }

    #[test]
    fn clamps_to_minimum_and_overruns_duration() {
        let pacing = Pacing::new(1.0, 2.5);
        let timeline = pacing.plan_uniform(10.0, &words(100)).unwrap();

        assert_eq!(timeline.per_word, Some(1.0));
        assert_eq!(timeline.words.len(), 100);
        assert!((timeline.total_duration() - 100.0).abs() < 1e-3);
    }

    #[test]
    fn clamps_to_maximum_and_underruns_duration() {
        let pacing = Pacing::new(0.2, 0.5);
        let timeline = pacing.plan_uniform(60.0, &words(4)).unwrap();

        assert_eq!(timeline.per_word, Some(0.5));
        assert!((timeline.total_duration() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn unclamped_pace_matches_duration() {
        let pacing = Pacing::new(0.1, 1.0);
        let timeline = pacing.plan_uniform(3.0, &words(6)).unwrap();

        assert_eq!(timeline.per_word, Some(0.5));
        assert_eq!(timeline.words[0], TimedWord::new("w0", 0.0, 0.5));
        assert_eq!(timeline.words[5], TimedWord::new("w5", 2.5, 3.0));
    }

    #[test]
    fn uniform_words_are_back_to_back() {
        let timeline = Pacing::default().plan_uniform(7.3, &words(17)).unwrap();

        for pair in timeline.words.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
    }

    #[test]
    fn rejects_invalid_bounds() {
        for (min, max) in [(2.0, 1.0), (0.0, 1.0), (-1.0, 1.0), (0.5, f32::INFINITY)] {
            let err = Pacing::new(min, max).plan_uniform(5.0, &words(3));
            assert!(
                matches!(
                    err,
                    Err(Error::InvalidConfig(ConfigError::InvalidWordDuration { .. }))
                ),
                "min {min}, max {max}: {err:?}"
            );
        }
    }

    #[test]
    fn rejects_zero_words() {
        let empty: [&str; 0] = [];
        assert_eq!(
            Pacing::default().plan_uniform(5.0, &empty),
            Err(Error::InvalidConfig(ConfigError::NoWords))
        );
    }

    #[test]
    fn rejects_non_positive_duration() {
        assert_eq!(
            Pacing::default().plan_uniform(0.0, &words(3)),
            Err(Error::InvalidConfig(ConfigError::InvalidDuration(0.0)))
        );
        assert!(Pacing::default().plan_uniform(f32::NAN, &words(3)).is_err());
    }

    #[test]
    fn timestamps_pass_through_unchanged() {
        let transcript = vec![
            TimedWord::new("real", 0.3, 0.9),
            TimedWord::new("timing", 1.4, 2.0),
        ];

        let timeline = Pacing::default()
            .plan(2.5, "ignored text", transcript.clone())
            .unwrap();

        assert_eq!(timeline.words, transcript);
        assert_eq!(timeline.per_word, None);
    }

    #[test]
    fn empty_transcript_falls_back_to_text() {
        let timeline = Pacing::default()
            .plan(2.0, "four words\nover lines", Vec::new())
            .unwrap();

        let texts: Vec<_> = timeline.words.iter().map(|w| w.text.as_str()).collect();
        assert_eq!(texts, ["four", "words", "over", "lines"]);
        assert_eq!(timeline.per_word, Some(0.5));
    }

    #[test]
    fn blank_text_without_transcript_fails() {
        assert_eq!(
            Pacing::default().plan(2.0, "  \n ", Vec::new()),
            Err(Error::InvalidConfig(ConfigError::NoWords))
        );
    }
}
