//! Video processing pipeline.
//!
//! Wires the pure stages of `ilearn-core` together for one video:
//!
//! ```text
//! VideoInput ──▶ source selection ──▶ segments ──▶ MCQ fold ──▶ Manifest
//!                 │ captions  → parse + segment_cues
//!                 │ chapters  → parse_chapters + segment_by_chapters
//!                 └ duration  → segment_uniform
//! ```
//!
//! Used by the `ilearn generate` command and the `POST /manifest` endpoint.

use anyhow::Result;
use ilearn_core::caption::{detect_format, parse_captions, CaptionFormat};
use ilearn_core::chapters::parse_chapters;
use ilearn_core::error::InputError;
use ilearn_core::mcq::{generate_all, GenerationContext};
use ilearn_core::models::{Cue, Segment};
use ilearn_core::segment::{segment_by_chapters, segment_cues, segment_uniform, SegmentOptions};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::manifest::{build_manifest, Manifest};

/// Raw caption file content plus what is known about its format.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionInput {
    pub content: String,
    /// Declared format; sniffed from `file_name` and content when absent.
    #[serde(default)]
    pub format: Option<CaptionFormat>,
    #[serde(default)]
    pub file_name: Option<String>,
}

/// Everything known about a video when building its manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoInput {
    pub video_id: String,
    pub title: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub captions: Option<CaptionInput>,
    /// Video description text that may contain chapter markers.
    #[serde(default)]
    pub chapters: Option<String>,
    #[serde(default)]
    pub duration_sec: Option<f64>,
}

/// Where a video's segments came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentSource {
    Transcript,
    Chapters,
    Uniform,
}

/// Resolves the format and parses. Zero cues is an error here.
pub fn load_cues(captions: &CaptionInput) -> Result<(CaptionFormat, Vec<Cue>)> {
    let format = captions
        .format
        .unwrap_or_else(|| detect_format(captions.file_name.as_deref(), &captions.content));

    let cues = parse_captions(&captions.content, format);
    tracing::debug!(%format, cues = cues.len(), bytes = captions.content.len(), "parsed captions");

    if cues.is_empty() {
        return Err(InputError::NoCues(format).into());
    }
    Ok((format, cues))
}

/// Picks the segmentation source and produces segments.
///
/// Captions win when present; an unparseable caption file is an error, not
/// a reason to fall back. Otherwise chapter markers are used when the
/// description has any and a duration is known, then uniform windows.
pub fn segment_video(
    input: &VideoInput,
    options: &SegmentOptions,
    config: &Config,
) -> Result<(SegmentSource, Vec<Segment>)> {
    let language = input
        .language
        .as_deref()
        .unwrap_or(&config.segmentation.default_language);

    if let Some(captions) = &input.captions {
        let (_, cues) = load_cues(captions)?;
        let segments = segment_cues(&cues, options, language)?;
        return Ok((SegmentSource::Transcript, segments));
    }

    let duration = input.duration_sec.filter(|d| *d > 0.0);

    if let (Some(description), Some(duration)) = (&input.chapters, duration) {
        let chapters = parse_chapters(description);
        if !chapters.is_empty() {
            tracing::debug!(chapters = chapters.len(), "using chapter markers");
            return Ok((
                SegmentSource::Chapters,
                segment_by_chapters(&chapters, duration, language),
            ));
        }
    }

    if let Some(duration) = duration {
        let segments = segment_uniform(duration, config.segmentation.uniform_width_secs, language)?;
        return Ok((SegmentSource::Uniform, segments));
    }

    Err(InputError::NoSegmentationSource(input.video_id.clone()).into())
}

/// Full pipeline for one video.
pub fn run_pipeline(input: &VideoInput, config: &Config) -> Result<Manifest> {
    let span = tracing::info_span!("pipeline", video_id = input.video_id.as_str());
    let _guard = span.enter();

    let options = config.segmentation.segment_options();
    let (source, segments) = segment_video(input, &options, config)?;
    tracing::info!(?source, segments = segments.len(), "segmented video");

    let language = input
        .language
        .as_deref()
        .unwrap_or(&config.segmentation.default_language);
    let ctx = GenerationContext::new(&input.title, language).with_options(config.mcq.mcq_options());
    let outcomes = generate_all(&segments, &ctx);

    for outcome in &outcomes {
        tracing::debug!(
            segment_id = outcome.segment_id.as_str(),
            reason = %outcome.reason,
            log = outcome.log.as_str(),
            "segment processed"
        );
    }

    let manifest = build_manifest(input, language, source, segments, outcomes, config.mcq.max_per_video);
    tracing::info!(
        questions = manifest.question_count,
        segments = manifest.segments.len(),
        "manifest built"
    );

    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ilearn_core::models::OutcomeReason;

    const SRT: &str = "1\n00:00:01,000 --> 00:00:04,000\nHello world.\n\n\
                       2\n00:00:04,000 --> 00:00:08,000\nThis is a test.";

    fn video(captions: Option<&str>) -> VideoInput {
        VideoInput {
            video_id: "vid1".to_string(),
            title: "Plants 101".to_string(),
            language: None,
            captions: captions.map(|c| CaptionInput {
                content: c.to_string(),
                format: None,
                file_name: None,
            }),
            chapters: None,
            duration_sec: None,
        }
    }

    #[test]
    fn test_load_cues_detects_format() {
        let (format, cues) = load_cues(&CaptionInput {
            content: SRT.to_string(),
            format: None,
            file_name: None,
        })
        .unwrap();
        assert_eq!(format, CaptionFormat::Srt);
        assert_eq!(cues.len(), 2);
    }

    #[test]
    fn test_zero_cues_is_error() {
        let err = load_cues(&CaptionInput {
            content: "nothing useful".to_string(),
            format: Some(CaptionFormat::Vtt),
            file_name: None,
        })
        .unwrap_err();
        assert!(err.to_string().contains("no cues found"));
    }

    #[test]
    fn test_transcript_source() {
        let cfg = Config::default();
        let (source, segments) =
            segment_video(&video(Some(SRT)), &SegmentOptions::default(), &cfg).unwrap();
        assert_eq!(source, SegmentSource::Transcript);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].language, "en");
    }

    #[test]
    fn test_bad_captions_do_not_fall_back() {
        let cfg = Config::default();
        let mut input = video(Some("garbage"));
        input.duration_sec = Some(120.0);
        assert!(segment_video(&input, &SegmentOptions::default(), &cfg).is_err());
    }

    #[test]
    fn test_chapter_then_uniform_fallback() {
        let cfg = Config::default();
        let mut input = video(None);
        input.duration_sec = Some(100.0);
        input.chapters = Some("0:00 Intro\n0:40 Main part\n".to_string());
        let (source, segments) = segment_video(&input, &SegmentOptions::default(), &cfg).unwrap();
        assert_eq!(source, SegmentSource::Chapters);
        assert_eq!(segments.len(), 2);

        input.chapters = Some("no markers here".to_string());
        let (source, segments) = segment_video(&input, &SegmentOptions::default(), &cfg).unwrap();
        assert_eq!(source, SegmentSource::Uniform);
        assert_eq!(segments.len(), 3);
    }

    #[test]
    fn test_no_source_is_error() {
        let cfg = Config::default();
        let err = segment_video(&video(None), &SegmentOptions::default(), &cfg).unwrap_err();
        assert!(err.to_string().contains("no segmentation source"));
        assert!(ilearn_core::error::is_input_error(&err));
    }

    #[test]
    fn test_run_pipeline_end_to_end() {
        let cfg = Config::default();
        let srt = "1\n00:00:00,000 --> 00:00:20,000\n\
                   Photosynthesis is the process plants use to convert light into energy.\n\n\
                   2\n00:00:20,000 --> 00:00:35,000\nIt happens inside the chloroplasts.\n";
        let manifest = run_pipeline(&video(Some(srt)), &cfg).unwrap();
        assert_eq!(manifest.source, SegmentSource::Transcript);
        assert_eq!(manifest.segments.len(), 1);
        assert_eq!(manifest.question_count, 1);
        assert_eq!(manifest.segments[0].reason, OutcomeReason::Ok);
        assert_eq!(manifest.reasons.get(&OutcomeReason::Ok), Some(&1));
    }
}
