//! Core data models shared by the caption, segment, and MCQ stages.
//!
//! All models are plain value objects. They serialize with camelCase field
//! names because the same shapes are stored as documents and read by the
//! video player.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single timed caption line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cue {
    pub start_sec: f64,
    pub end_sec: f64,
    pub text: String,
}

impl Cue {
    pub fn duration_secs(&self) -> f64 {
        (self.end_sec - self.start_sec).max(0.0)
    }
}

/// A contiguous time range of a video with one text chunk for quiz purposes.
///
/// Boundaries are whole seconds: the segmenter floors the start and ceils
/// the end before storing them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub segment_id: String,
    pub segment_index: usize,
    pub t_start_sec: f64,
    pub t_end_sec: f64,
    pub text: String,
    /// SHA-256 of `text`, hex encoded.
    pub text_hash: String,
    pub language: String,
    /// Chapter title, when the segment came from chapter markers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Segment {
    pub fn duration_secs(&self) -> f64 {
        self.t_end_sec - self.t_start_sec
    }
}

/// An externally supplied chapter marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub start_sec: f64,
    pub title: String,
}

/// A time span anchoring a question to its source segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportLine {
    pub t_start_sec: f64,
    pub t_end_sec: f64,
    pub text: String,
}

/// A multiple-choice question with exactly one correct option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedMcq {
    pub question_id: String,
    pub language: String,
    pub stem: String,
    pub options: [String; 4],
    pub correct_index: usize,
    pub rationale: String,
    pub support: Vec<SupportLine>,
}

impl GeneratedMcq {
    /// The grounded answer, `options[correct_index]`.
    pub fn correct_option(&self) -> &str {
        &self.options[self.correct_index]
    }
}

/// Why a segment did or did not yield a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutcomeReason {
    Ok,
    InsufficientContext,
    Intro,
    OffTopic,
    Music,
    Duplicate,
}

impl OutcomeReason {
    pub const ALL: [OutcomeReason; 6] = [
        OutcomeReason::Ok,
        OutcomeReason::InsufficientContext,
        OutcomeReason::Intro,
        OutcomeReason::OffTopic,
        OutcomeReason::Music,
        OutcomeReason::Duplicate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeReason::Ok => "OK",
            OutcomeReason::InsufficientContext => "INSUFFICIENT_CONTEXT",
            OutcomeReason::Intro => "INTRO",
            OutcomeReason::OffTopic => "OFF_TOPIC",
            OutcomeReason::Music => "MUSIC",
            OutcomeReason::Duplicate => "DUPLICATE",
        }
    }
}

impl fmt::Display for OutcomeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of running the MCQ generator on one segment.
///
/// `mcqs` is empty whenever `reason` is not [`OutcomeReason::Ok`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McqOutcome {
    pub segment_id: String,
    pub title: String,
    pub reason: OutcomeReason,
    pub mcqs: Vec<GeneratedMcq>,
    /// Operator-facing summary of the decision. Free-form.
    pub log: String,
}
