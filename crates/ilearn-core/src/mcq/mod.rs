//! Multiple-choice question generation with in-run deduplication.
//!
//! [`generate`] decides, for one segment, whether it supports an
//! assessable, non-duplicate, grounded question, and builds it if so. Every
//! call yields exactly one [`McqOutcome`]; a segment without a question is
//! not an error.
//!
//! # Decision order
//!
//! 1. Trimmed text shorter than `min_context_chars` → `INSUFFICIENT_CONTEXT`.
//! 2. First assessable sentence; none → `INSUFFICIENT_CONTEXT`.
//! 3. Subject/answer split on `" is "`; none → `INSUFFICIENT_CONTEXT`.
//! 4. Stem similarity against the run's accepted stems ≥ threshold →
//!    `DUPLICATE`.
//! 5. Support span; empty → `INSUFFICIENT_CONTEXT`.
//! 6. `OK`, truncated to `max_per_segment` questions.
//!
//! With `classify_content` on, a segment rejected at step 2 or 3 is
//! relabelled `MUSIC`, `OFF_TOPIC` or `INTRO` when its content matches.
//! Classification never turns away a segment that yields a question.
//!
//! # Ordering
//!
//! Deduplication only looks backwards: a question is compared with stems
//! accepted earlier in the same run. [`generate_all`] is the left fold that
//! threads the accepted stems from one segment to the next, so the order of
//! segments decides which of two near-duplicates survives.

pub mod classify;
pub mod distractor;
pub mod sentences;
pub mod similarity;
pub mod support;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{GeneratedMcq, McqOutcome, OutcomeReason, Segment};
use distractor::{DistractorStrategy, TemplateDistractors};
use sentences::{build_stem, first_assessable, split_sentences, synthesize};
use similarity::max_similarity;
use support::derive_support;

/// Generation thresholds, decoupled from application config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct McqOptions {
    /// Minimum trimmed segment length, in characters.
    pub min_context_chars: usize,
    /// Minimum length of an assessable sentence, in characters.
    pub min_sentence_chars: usize,
    /// Stems at or above this cosine similarity are duplicates.
    pub dedup_threshold: f64,
    pub max_per_segment: usize,
    /// Shortest support span, in seconds.
    pub support_min_secs: f64,
    /// Support span as a fraction of the segment duration.
    pub support_fraction: f64,
    /// Relabels rejected segments as `MUSIC`, `INTRO` or `OFF_TOPIC`.
    pub classify_content: bool,
}

impl Default for McqOptions {
    fn default() -> Self {
        Self {
            min_context_chars: 40,
            min_sentence_chars: 40,
            dedup_threshold: 0.9,
            max_per_segment: 1,
            support_min_secs: 2.0,
            support_fraction: 0.1,
            classify_content: false,
        }
    }
}

/// Per-run inputs shared by every segment.
pub struct GenerationContext<'a> {
    /// Used in stems when the segment has no title of its own.
    pub title: &'a str,
    /// Language of the generated questions.
    pub language: &'a str,
    pub options: McqOptions,
    pub distractors: &'a dyn DistractorStrategy,
}

impl<'a> GenerationContext<'a> {
    /// Default options and template distractors.
    pub fn new(title: &'a str, language: &'a str) -> Self {
        Self {
            title,
            language,
            options: McqOptions::default(),
            distractors: &TemplateDistractors,
        }
    }

    pub fn with_options(mut self, options: McqOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_distractors(mut self, distractors: &'a dyn DistractorStrategy) -> Self {
        self.distractors = distractors;
        self
    }
}

/// Runs the generator on one segment against the stems accepted so far.
pub fn generate(segment: &Segment, ctx: &GenerationContext<'_>, existing_stems: &[String]) -> McqOutcome {
    let title = segment.title.as_deref().unwrap_or(ctx.title);
    let opts = &ctx.options;
    let text = segment.text.trim();

    let outcome = |reason: OutcomeReason, mcqs: Vec<GeneratedMcq>, detail: String| McqOutcome {
        segment_id: segment.segment_id.clone(),
        title: title.to_string(),
        reason,
        mcqs,
        log: format!("segment={} reason={} {}", segment.segment_index, reason, detail),
    };

    let text_chars = text.chars().count();
    if text_chars < opts.min_context_chars {
        return outcome(
            OutcomeReason::InsufficientContext,
            Vec::new(),
            format!("text too short ({} < {} chars)", text_chars, opts.min_context_chars),
        );
    }

    let sentences = split_sentences(text);
    let rejected = |detail: String| {
        let classified = opts
            .classify_content
            .then(|| {
                classify::classify_rejected(
                    text,
                    segment.segment_index,
                    &sentences,
                    opts.min_context_chars,
                )
            })
            .flatten();
        match classified {
            Some(reason) => outcome(reason, Vec::new(), format!("{} ({})", detail, reason)),
            None => outcome(OutcomeReason::InsufficientContext, Vec::new(), detail),
        }
    };

    let Some(index) = first_assessable(&sentences, opts.min_sentence_chars) else {
        return rejected(format!("no assessable sentence among {}", sentences.len()));
    };
    let sentence = &sentences[index];

    let Some(synthesis) = synthesize(sentence) else {
        return rejected(format!("sentence {} has no subject/answer split", index + 1));
    };

    let stem = build_stem(title, &synthesis.subject);
    let similarity = max_similarity(&stem, existing_stems);
    if similarity >= opts.dedup_threshold {
        return outcome(
            OutcomeReason::Duplicate,
            Vec::new(),
            format!("similarity {:.3} >= {:.3}", similarity, opts.dedup_threshold),
        );
    }

    let support = derive_support(
        segment,
        sentence,
        index,
        sentences.len(),
        opts.support_min_secs,
        opts.support_fraction,
    );
    let Some(span) = support.first() else {
        return outcome(
            OutcomeReason::InsufficientContext,
            Vec::new(),
            "empty support span".to_string(),
        );
    };
    let detail = format!(
        "sentence {}/{} similarity {:.3} support {:.1}-{:.1}s",
        index + 1,
        sentences.len(),
        similarity,
        span.t_start_sec,
        span.t_end_sec
    );

    let [d1, d2, d3] = ctx
        .distractors
        .distractors(&synthesis.subject, &synthesis.answer, title);

    let mcq = GeneratedMcq {
        question_id: Uuid::new_v4().to_string(),
        language: ctx.language.to_string(),
        stem,
        options: [synthesis.answer, d1, d2, d3],
        correct_index: 0,
        rationale: format!("The segment states: \"{}\"", sentence),
        support,
    };

    let mut mcqs = vec![mcq];
    mcqs.truncate(opts.max_per_segment);
    outcome(OutcomeReason::Ok, mcqs, detail)
}

/// Generates for every segment in order, threading accepted stems.
pub fn generate_all(segments: &[Segment], ctx: &GenerationContext<'_>) -> Vec<McqOutcome> {
    generate_all_with_stems(segments, ctx, Vec::new()).0
}

/// Like [`generate_all`], starting from `stems` and returning the final
/// accumulator alongside the outcomes.
pub fn generate_all_with_stems(
    segments: &[Segment],
    ctx: &GenerationContext<'_>,
    stems: Vec<String>,
) -> (Vec<McqOutcome>, Vec<String>) {
    segments.iter().fold(
        (Vec::with_capacity(segments.len()), stems),
        |(mut outcomes, mut stems), segment| {
            let outcome = generate(segment, ctx, &stems);
            stems.extend(outcome.mcqs.iter().map(|m| m.stem.clone()));
            outcomes.push(outcome);
            (outcomes, stems)
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(index: usize, start: f64, end: f64, text: &str) -> Segment {
        Segment {
            segment_id: format!("seg-{}", index),
            segment_index: index,
            t_start_sec: start,
            t_end_sec: end,
            text: text.to_string(),
            text_hash: String::new(),
            language: "en".to_string(),
            title: None,
        }
    }

    const PHOTO: &str = "Photosynthesis is the process plants use to convert light into energy.";

    #[test]
    fn test_photosynthesis_question() {
        let ctx = GenerationContext::new("Plants 101", "en");
        let out = generate(&segment(0, 0.0, 45.0, PHOTO), &ctx, &[]);
        assert_eq!(out.reason, OutcomeReason::Ok);
        assert_eq!(out.segment_id, "seg-0");
        assert_eq!(out.title, "Plants 101");
        assert_eq!(out.mcqs.len(), 1);

        let q = &out.mcqs[0];
        assert_eq!(q.correct_index, 0);
        assert_eq!(q.correct_option(), "the process plants use to convert light into energy");
        assert_eq!(
            q.stem,
            "According to the video segment \"Plants 101\", what is Photosynthesis?"
        );
        assert_eq!(q.language, "en");
        assert!(q.rationale.contains(PHOTO));
        assert!(!q.support.is_empty());
        for line in &q.support {
            assert!(line.t_start_sec >= 0.0 && line.t_end_sec <= 45.0);
        }
        let unique: std::collections::HashSet<&String> = q.options.iter().collect();
        assert_eq!(unique.len(), 4);
    }

    #[test]
    fn test_short_text_insufficient() {
        let ctx = GenerationContext::new("T", "en");
        let out = generate(&segment(0, 0.0, 10.0, "  Too short to ask about.  "), &ctx, &[]);
        assert_eq!(out.reason, OutcomeReason::InsufficientContext);
        assert!(out.mcqs.is_empty());
    }

    #[test]
    fn test_no_assessable_sentence() {
        let ctx = GenerationContext::new("T", "en");
        let text = "Plants grow toward light in the morning. Leaves open wide to catch it all day.";
        let out = generate(&segment(2, 0.0, 40.0, text), &ctx, &[]);
        assert_eq!(out.reason, OutcomeReason::InsufficientContext);
    }

    #[test]
    fn test_assessable_without_is_split() {
        let ctx = GenerationContext::new("T", "en");
        let text = "Chloroplasts are the organelles where photosynthesis happens in plant cells.";
        let out = generate(&segment(1, 0.0, 40.0, text), &ctx, &[]);
        assert_eq!(out.reason, OutcomeReason::InsufficientContext);
        assert!(out.mcqs.is_empty());
    }

    #[test]
    fn test_first_assessable_sentence_wins() {
        let ctx = GenerationContext::new("Cells", "en");
        let text = "Let us begin now. The nucleus is the control center of the eukaryotic cell. \
                    The ribosome is the site where proteins are assembled from amino acids.";
        let out = generate(&segment(1, 10.0, 50.0, text), &ctx, &[]);
        assert_eq!(out.reason, OutcomeReason::Ok);
        assert_eq!(out.mcqs[0].correct_option(), "the control center of the eukaryotic cell");
        // second of three sentences: anchor at 1/3 of the way in
        let span = &out.mcqs[0].support[0];
        assert!(span.t_start_sec > 10.0 && span.t_end_sec < 50.0);
    }

    #[test]
    fn test_same_stem_twice_is_duplicate() {
        let ctx = GenerationContext::new("Plants 101", "en");
        let first = generate(&segment(0, 0.0, 45.0, PHOTO), &ctx, &[]);
        assert_eq!(first.reason, OutcomeReason::Ok);

        let stems = vec![first.mcqs[0].stem.clone()];
        let second = generate(&segment(1, 45.0, 90.0, PHOTO), &ctx, &stems);
        assert_eq!(second.reason, OutcomeReason::Duplicate);
        assert!(second.mcqs.is_empty());
    }

    #[test]
    fn test_fold_threads_stems_in_order() {
        let ctx = GenerationContext::new("Plants 101", "en");
        let other = "The stomata is a set of tiny pores that let leaves exchange gases with air.";
        let segments = vec![
            segment(0, 0.0, 45.0, PHOTO),
            segment(1, 45.0, 90.0, other),
            segment(2, 90.0, 135.0, PHOTO),
        ];
        let (outcomes, stems) = generate_all_with_stems(&segments, &ctx, Vec::new());
        let reasons: Vec<OutcomeReason> = outcomes.iter().map(|o| o.reason).collect();
        assert_eq!(
            reasons,
            vec![OutcomeReason::Ok, OutcomeReason::Ok, OutcomeReason::Duplicate]
        );
        assert_eq!(stems.len(), 2);
        assert_eq!(generate_all(&segments, &ctx).len(), 3);
    }

    #[test]
    fn test_seeded_stems_apply() {
        let ctx = GenerationContext::new("Plants 101", "en");
        let seed = vec![build_stem("Plants 101", "Photosynthesis")];
        let (outcomes, stems) =
            generate_all_with_stems(&[segment(0, 0.0, 45.0, PHOTO)], &ctx, seed);
        assert_eq!(outcomes[0].reason, OutcomeReason::Duplicate);
        assert_eq!(stems.len(), 1);
    }

    #[test]
    fn test_segment_title_overrides_context_title() {
        let ctx = GenerationContext::new("Video", "en");
        let mut seg = segment(1, 0.0, 30.0, PHOTO);
        seg.title = Some("Chapter 2".to_string());
        let out = generate(&seg, &ctx, &[]);
        assert_eq!(out.title, "Chapter 2");
        assert!(out.mcqs[0].stem.contains("\"Chapter 2\""));
    }

    const MUSIC_ONLY: &str = "[Music] [Applause] [Music] [Applause] [Music]";

    fn classifying() -> McqOptions {
        McqOptions {
            classify_content: true,
            ..McqOptions::default()
        }
    }

    #[test]
    fn test_short_annotated_text_is_insufficient() {
        let text = "[Music] Hi.";
        let ctx = GenerationContext::new("T", "en");
        let out = generate(&segment(0, 0.0, 30.0, text), &ctx, &[]);
        assert_eq!(out.reason, OutcomeReason::InsufficientContext);

        let ctx = GenerationContext::new("T", "en").with_options(classifying());
        let out = generate(&segment(0, 0.0, 30.0, text), &ctx, &[]);
        assert_eq!(out.reason, OutcomeReason::InsufficientContext);
    }

    #[test]
    fn test_greeting_then_fact_first_segment_is_ok() {
        let text = format!("Hello everyone. {}", PHOTO);
        let ctx = GenerationContext::new("Plants 101", "en");
        let out = generate(&segment(0, 0.0, 45.0, &text), &ctx, &[]);
        assert_eq!(out.reason, OutcomeReason::Ok);

        let ctx = GenerationContext::new("Plants 101", "en").with_options(classifying());
        assert_eq!(generate(&segment(0, 0.0, 45.0, &text), &ctx, &[]).reason, OutcomeReason::Ok);
    }

    #[test]
    fn test_promo_tail_keeps_question() {
        let text = format!("{} Subscribe for more.", PHOTO);
        for options in [McqOptions::default(), classifying()] {
            let ctx = GenerationContext::new("Plants 101", "en").with_options(options);
            let out = generate(&segment(3, 0.0, 45.0, &text), &ctx, &[]);
            assert_eq!(out.reason, OutcomeReason::Ok);
        }
    }

    #[test]
    fn test_music_segment_relabelled_when_classifying() {
        let ctx = GenerationContext::new("T", "en").with_options(classifying());
        let out = generate(&segment(3, 0.0, 30.0, MUSIC_ONLY), &ctx, &[]);
        assert_eq!(out.reason, OutcomeReason::Music);
    }

    #[test]
    fn test_music_segment_insufficient_by_default() {
        let ctx = GenerationContext::new("T", "en");
        let out = generate(&segment(3, 0.0, 30.0, MUSIC_ONLY), &ctx, &[]);
        assert_eq!(out.reason, OutcomeReason::InsufficientContext);
    }

    #[test]
    fn test_intro_and_off_topic_relabelled() {
        let ctx = GenerationContext::new("T", "en").with_options(classifying());
        let intro = "Hello everyone and welcome to the channel. In this video we talk about plants.";
        assert_eq!(generate(&segment(0, 0.0, 30.0, intro), &ctx, &[]).reason, OutcomeReason::Intro);

        let promo = "Don't forget to subscribe and hit the bell. Use promo code SEEDS at checkout.";
        assert_eq!(generate(&segment(4, 0.0, 30.0, promo), &ctx, &[]).reason, OutcomeReason::OffTopic);

        let ctx = GenerationContext::new("T", "en");
        assert_eq!(
            generate(&segment(0, 0.0, 30.0, intro), &ctx, &[]).reason,
            OutcomeReason::InsufficientContext
        );
    }

    struct FixedDistractors;

    impl DistractorStrategy for FixedDistractors {
        fn distractors(&self, _subject: &str, _answer: &str, _title: &str) -> [String; 3] {
            ["b".to_string(), "c".to_string(), "d".to_string()]
        }
    }

    #[test]
    fn test_custom_distractor_strategy() {
        let ctx = GenerationContext::new("T", "fr").with_distractors(&FixedDistractors);
        let out = generate(&segment(1, 0.0, 30.0, PHOTO), &ctx, &[]);
        assert_eq!(out.mcqs[0].options[1..], ["b", "c", "d"]);
        assert_eq!(out.mcqs[0].language, "fr");
    }

    #[test]
    fn test_non_ok_outcomes_have_no_questions() {
        let ctx = GenerationContext::new("T", "en");
        let texts = ["", "[Music]", "short", PHOTO];
        let stems = vec![build_stem("T", "Photosynthesis")];
        for (i, t) in texts.iter().enumerate() {
            let out = generate(&segment(i, 0.0, 30.0, t), &ctx, &stems);
            assert_ne!(out.reason, OutcomeReason::Ok);
            assert!(out.mcqs.is_empty());
            assert!(!out.log.is_empty());
        }
    }
}
