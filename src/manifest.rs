//! Playback manifest assembly.
//!
//! The manifest is the ordered description of a video's segments and
//! checkpoint questions that the player reads. It is the last step of the
//! pipeline and the only place the per-video question cap is applied.

use chrono::Utc;
use ilearn_core::models::{GeneratedMcq, McqOutcome, OutcomeReason, Segment};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::pipeline::{SegmentSource, VideoInput};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub video_id: String,
    pub title: String,
    pub language: String,
    /// RFC 3339 timestamp.
    pub generated_at: String,
    pub source: SegmentSource,
    pub segments: Vec<ManifestSegment>,
    pub question_count: usize,
    /// Number of segments per outcome reason.
    pub reasons: BTreeMap<OutcomeReason, usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestSegment {
    pub segment: Segment,
    pub reason: OutcomeReason,
    pub log: String,
    pub questions: Vec<GeneratedMcq>,
}

/// Pairs segments with their outcomes and applies `max_per_video`.
///
/// The cap keeps the earliest questions in segment order.
pub fn build_manifest(
    input: &VideoInput,
    language: &str,
    source: SegmentSource,
    segments: Vec<Segment>,
    outcomes: Vec<McqOutcome>,
    max_per_video: Option<usize>,
) -> Manifest {
    let mut remaining = max_per_video.unwrap_or(usize::MAX);
    let mut reasons = BTreeMap::new();
    let mut question_count = 0;

    let entries: Vec<ManifestSegment> = segments
        .into_iter()
        .zip(outcomes)
        .map(|(segment, outcome)| {
            *reasons.entry(outcome.reason).or_insert(0) += 1;

            let mut questions = outcome.mcqs;
            let mut log = outcome.log;
            if questions.len() > remaining {
                questions.truncate(remaining);
                log.push_str(" (video question cap reached)");
            }
            remaining -= questions.len();
            question_count += questions.len();

            ManifestSegment {
                segment,
                reason: outcome.reason,
                log,
                questions,
            }
        })
        .collect();

    Manifest {
        video_id: input.video_id.clone(),
        title: input.title.clone(),
        language: language.to_string(),
        generated_at: Utc::now().to_rfc3339(),
        source,
        segments: entries,
        question_count,
        reasons,
    }
}

impl Manifest {
    /// Questions in playback order.
    pub fn questions(&self) -> impl Iterator<Item = &GeneratedMcq> {
        self.segments.iter().flat_map(|s| s.questions.iter())
    }

    pub fn to_json_pretty(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
