//! Errors caused by caller input rather than by the environment.
//!
//! Functions in this crate return `anyhow::Result`; the failures a caller
//! can fix by changing its request are raised as [`InputError`] so callers
//! can tell them apart with `downcast_ref`.

use crate::caption::CaptionFormat;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error("{field} must be a positive number of seconds, got {value}")]
    NonPositiveDuration { field: &'static str, value: f64 },

    #[error("segment durations must satisfy min <= preferred <= max (got {min} / {preferred} / {max})")]
    DurationOrder { min: f64, preferred: f64, max: f64 },

    #[error("uniform segment width must be positive, got {0}")]
    UniformWidth(f64),

    #[error("{duration}s at {width}s per window needs {count} uniform segments (limit {limit})")]
    TooManySegments {
        duration: f64,
        width: f64,
        count: f64,
        limit: usize,
    },

    #[error("no cues found in {0} captions")]
    NoCues(CaptionFormat),

    #[error("no segmentation source for video {0}: provide captions, chapters with a duration, or a duration")]
    NoSegmentationSource(String),
}

/// True when `err` or anything it wraps is an [`InputError`].
pub fn is_input_error(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| cause.is::<InputError>())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_input_error_survives_context() {
        let err = Err::<(), _>(InputError::UniformWidth(0.0))
            .context("while segmenting lecture")
            .unwrap_err();
        assert!(is_input_error(&err));
        assert_eq!(
            err.downcast_ref::<InputError>(),
            Some(&InputError::UniformWidth(0.0))
        );
    }

    #[test]
    fn test_other_errors_are_not_input_errors() {
        let err = anyhow::anyhow!("disk full");
        assert!(!is_input_error(&err));
    }

    #[test]
    fn test_no_cues_message_names_format() {
        assert_eq!(
            InputError::NoCues(CaptionFormat::Vtt).to_string(),
            "no cues found in vtt captions"
        );
    }
}
