//! Transcript segmenter.
//!
//! Groups ordered cues into [`Segment`]s that aim for a preferred duration,
//! never run past a maximum, and prefer to end on a sentence boundary once
//! a minimum duration has been reached.
//!
//! # Algorithm
//!
//! A greedy forward scan over the cues:
//!
//! 1. Open a segment at the first cue's start.
//! 2. Before adding a cue, if the segment would run past `max` (measured on
//!    the rounded bounds), close the segment without it.
//! 3. Add the cue's text and extend the segment end.
//! 4. Close the segment when any holds:
//!    - duration ≥ `preferred`
//!    - duration ≥ `min` and the cue ends a sentence (`[.!?]\s*$`)
//!    - duration ≥ `max`
//!    - the cue is the last one
//! 5. Store bounds as `floor(start)` and `ceil(end)` so sub-second drift
//!    never reaches the player.
//!
//! A single cue longer than `max` cannot be subdivided and becomes one
//! segment on its own.
//!
//! When a video has no transcript, [`segment_by_chapters`] and
//! [`segment_uniform`] produce the same shape from chapter markers or a
//! fixed window width. Choosing between the three is up to the caller.

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::error::InputError;
use crate::models::{Chapter, Cue, Segment};

pub const DEFAULT_MIN_DURATION_SECS: f64 = 30.0;
pub const DEFAULT_MAX_DURATION_SECS: f64 = 60.0;
pub const DEFAULT_PREFERRED_DURATION_SECS: f64 = 45.0;
pub const DEFAULT_UNIFORM_WIDTH_SECS: f64 = 45.0;
/// Upper bound on windows from [`segment_uniform`].
pub const MAX_UNIFORM_SEGMENTS: usize = 10_000;

static SENTENCE_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]\s*$").expect("valid sentence-end regex"));

/// Duration targets for [`segment_cues`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentOptions {
    pub min_duration_secs: f64,
    pub max_duration_secs: f64,
    pub preferred_duration_secs: f64,
}

impl Default for SegmentOptions {
    fn default() -> Self {
        Self {
            min_duration_secs: DEFAULT_MIN_DURATION_SECS,
            max_duration_secs: DEFAULT_MAX_DURATION_SECS,
            preferred_duration_secs: DEFAULT_PREFERRED_DURATION_SECS,
        }
    }
}

impl SegmentOptions {
    /// Rejects non-positive durations and targets out of `min ≤ preferred ≤ max` order.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("min_duration_secs", self.min_duration_secs),
            ("max_duration_secs", self.max_duration_secs),
            ("preferred_duration_secs", self.preferred_duration_secs),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(InputError::NonPositiveDuration { field: name, value }.into());
            }
        }
        if self.min_duration_secs > self.preferred_duration_secs
            || self.preferred_duration_secs > self.max_duration_secs
        {
            return Err(InputError::DurationOrder {
                min: self.min_duration_secs,
                preferred: self.preferred_duration_secs,
                max: self.max_duration_secs,
            }
            .into());
        }
        Ok(())
    }
}

/// Running state of the segment being built.
struct Accumulator {
    start: f64,
    end: f64,
    texts: Vec<String>,
}

impl Accumulator {
    fn open(cue: &Cue) -> Self {
        Self {
            start: cue.start_sec,
            end: cue.end_sec,
            texts: Vec::new(),
        }
    }

    fn push(&mut self, cue: &Cue) {
        let text = cue.text.trim();
        if !text.is_empty() {
            self.texts.push(text.to_string());
        }
        self.end = self.end.max(cue.end_sec);
    }

    fn rounded_span_with(&self, cue: &Cue) -> f64 {
        self.end.max(cue.end_sec).ceil() - self.start.floor()
    }
}

/// Splits cues into segments. See the module docs for the rules.
///
/// Returns an empty list for empty input. Segment indices are contiguous
/// from 0 and start times are non-decreasing for time-ordered input.
pub fn segment_cues(cues: &[Cue], options: &SegmentOptions, language: &str) -> Result<Vec<Segment>> {
    options.validate()?;

    let mut segments = Vec::new();
    let mut acc: Option<Accumulator> = None;

    for (i, cue) in cues.iter().enumerate() {
        let is_last = i + 1 == cues.len();

        let overflows = acc
            .as_ref()
            .is_some_and(|open| open.rounded_span_with(cue) > options.max_duration_secs);
        if overflows {
            if let Some(done) = acc.take() {
                segments.push(close(done, segments.len(), language));
            }
        }

        let current = acc.get_or_insert_with(|| Accumulator::open(cue));
        current.push(cue);

        let duration = current.end - current.start;
        let at_boundary = SENTENCE_END.is_match(&cue.text);
        let should_close = duration >= options.preferred_duration_secs
            || (duration >= options.min_duration_secs && at_boundary)
            || duration >= options.max_duration_secs
            || is_last;

        if should_close {
            if let Some(done) = acc.take() {
                segments.push(close(done, segments.len(), language));
            }
        }
    }

    Ok(segments)
}

fn close(acc: Accumulator, index: usize, language: &str) -> Segment {
    let start = acc.start.floor().max(0.0);
    let mut end = acc.end.ceil();
    if end <= start {
        end = start + 1.0;
    }
    make_segment(index, start, end, &acc.texts.join(" "), language, None)
}

/// One segment per chapter, each ending where the next chapter starts.
///
/// The last chapter ends at `video_duration_secs`, and no segment runs past
/// it. Chapters that would end at or before their own start are skipped.
/// Text and title are the chapter title.
pub fn segment_by_chapters(chapters: &[Chapter], video_duration_secs: f64, language: &str) -> Vec<Segment> {
    let mut sorted: Vec<&Chapter> = chapters.iter().collect();
    sorted.sort_by(|a, b| a.start_sec.total_cmp(&b.start_sec));

    let mut segments = Vec::new();
    for (i, chapter) in sorted.iter().enumerate() {
        let next_start = sorted
            .get(i + 1)
            .map(|c| c.start_sec)
            .unwrap_or(video_duration_secs);
        let start = chapter.start_sec.max(0.0).floor();
        let end = next_start.min(video_duration_secs).ceil();
        if end <= start {
            continue;
        }
        let title = chapter.title.trim();
        segments.push(make_segment(
            segments.len(),
            start,
            end,
            title,
            language,
            Some(title.to_string()),
        ));
    }
    segments
}

/// Fixed-width windows over `[0, video_duration_secs)`.
///
/// The final window is cut short at `ceil(video_duration_secs)`. A
/// non-positive duration yields no segments; more than
/// [`MAX_UNIFORM_SEGMENTS`] windows is rejected.
pub fn segment_uniform(video_duration_secs: f64, width_secs: f64, language: &str) -> Result<Vec<Segment>> {
    if !width_secs.is_finite() || width_secs <= 0.0 {
        return Err(InputError::UniformWidth(width_secs).into());
    }
    if !video_duration_secs.is_finite() || video_duration_secs <= 0.0 {
        return Ok(Vec::new());
    }

    let count = (video_duration_secs / width_secs).ceil();
    if count > MAX_UNIFORM_SEGMENTS as f64 {
        return Err(InputError::TooManySegments {
            duration: video_duration_secs,
            width: width_secs,
            count,
            limit: MAX_UNIFORM_SEGMENTS,
        }
        .into());
    }

    let total = video_duration_secs.ceil();
    let segments = (0..count as usize)
        .map(|i| {
            let start = i as f64 * width_secs;
            let end = (start + width_secs).min(total).ceil();
            make_segment(i, start.floor(), end, "", language, None)
        })
        .collect();
    Ok(segments)
}

/// Creates a [`Segment`] with a fresh UUID and a SHA-256 text hash.
fn make_segment(
    index: usize,
    start: f64,
    end: f64,
    text: &str,
    language: &str,
    title: Option<String>,
) -> Segment {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let text_hash = format!("{:x}", hasher.finalize());

    Segment {
        segment_id: Uuid::new_v4().to_string(),
        segment_index: index,
        t_start_sec: start,
        t_end_sec: end,
        text: text.to_string(),
        text_hash,
        language: language.to_string(),
        title,
    }
}
