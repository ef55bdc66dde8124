//! Error types for storyreel-core organized by failure scope.

use thiserror::Error;

/// Caption engine error variants.
///
/// [`Error::EmptyInput`] is fatal for a whole batch; the other variants are
/// fatal only for the narration unit being processed.
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    /// Source text contained no narration units
    #[error("no narration units found in source text")]
    EmptyInput,

    /// Pacing, segmentation or layout configuration rejected
    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),

    /// Caption segmentation invoked without words
    #[error("caption segmentation requires at least one word")]
    EmptyWordList,
}

/// Configuration errors (pacing bounds, segmenter and layout limits).
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// Word duration bounds are non-positive or inverted
    #[error("invalid word duration bounds: min {min}s, max {max}s")]
    InvalidWordDuration { min: f32, max: f32 },

    /// Narration duration is not a positive number
    #[error("invalid narration duration: {0}s")]
    InvalidDuration(f32),

    /// Nothing to pace
    #[error("cannot plan pacing for zero words")]
    NoWords,

    /// Segmenter limits out of range
    #[error("invalid segmenter config: {0}")]
    InvalidSegmenter(&'static str),

    /// Highlight line length must hold at least one word
    #[error("invalid line length: {0} (minimum 1)")]
    InvalidLineLength(usize),
}

/// Result type alias for storyreel-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_convert_into_invalid_config() {
        let err: Error = ConfigError::NoWords.into();
        assert_eq!(err, Error::InvalidConfig(ConfigError::NoWords));
    }

    #[test]
    fn invalid_config_displays_inner_message() {
        let err = Error::from(ConfigError::InvalidWordDuration { min: 2.0, max: 1.0 });
        assert_eq!(
            err.to_string(),
            "invalid word duration bounds: min 2s, max 1s"
        );
    }
}
