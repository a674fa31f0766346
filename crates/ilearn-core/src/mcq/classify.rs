//! Whole-segment content classification.
//!
//! Some segments should never be quizzed: music breaks, channel intros,
//! sponsor reads. When enabled, these checks relabel a segment that already
//! failed sentence selection as [`OutcomeReason::Music`],
//! [`OutcomeReason::Intro`] or [`OutcomeReason::OffTopic`]. Plain
//! instructional text matches none of them.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::OutcomeReason;

/// Bracketed annotations like `[Music]`, `(applause)`, plus note symbols.
static ANNOTATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[[^\]]*\]|\([^)]*\)|[♪♫♬]").expect("valid annotation regex"));

static MUSIC_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)[♪♫♬]|\[[^\]]*music[^\]]*\]|\([^)]*music[^)]*\)|\[applause\]")
        .expect("valid music regex")
});

static PROMO: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(subscribe|sponsor(ed)?|patreon|promo code|discount code|link in the description|merch|hit the bell|notification bell)\b",
    )
    .expect("valid promo regex")
});

static GREETING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(welcome to|welcome back|hi everyone|hello everyone|hey guys|hi guys|in this video|my name is|today we're going to|today we are going to)\b",
    )
    .expect("valid greeting regex")
});

/// True when the text carries music markers and little else.
pub fn is_music(text: &str, min_context_chars: usize) -> bool {
    if !MUSIC_MARKER.is_match(text) {
        return false;
    }
    let remaining = ANNOTATION.replace_all(text, " ");
    remaining.trim().chars().count() < min_context_chars
}

/// True when at least half of the sentences are promotional.
pub fn is_off_topic(sentences: &[String]) -> bool {
    majority(sentences, &PROMO)
}

/// True for a first segment made up mostly of greetings.
pub fn is_intro(segment_index: usize, sentences: &[String]) -> bool {
    segment_index == 0 && majority(sentences, &GREETING)
}

fn majority(sentences: &[String], pattern: &Regex) -> bool {
    if sentences.is_empty() {
        return false;
    }
    let hits = sentences.iter().filter(|s| pattern.is_match(s)).count();
    hits * 2 >= sentences.len()
}

/// Runs the sentence-level checks in order: off-topic, then intro.
pub fn classify_sentences(segment_index: usize, sentences: &[String]) -> Option<OutcomeReason> {
    if is_off_topic(sentences) {
        return Some(OutcomeReason::OffTopic);
    }
    if is_intro(segment_index, sentences) {
        return Some(OutcomeReason::Intro);
    }
    None
}

/// Content label for a segment that produced no question: music first,
/// then off-topic, then intro.
pub fn classify_rejected(
    text: &str,
    segment_index: usize,
    sentences: &[String],
    min_context_chars: usize,
) -> Option<OutcomeReason> {
    if is_music(text, min_context_chars) {
        return Some(OutcomeReason::Music);
    }
    classify_sentences(segment_index, sentences)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcq::sentences::split_sentences;

    #[test]
    fn test_music_only() {
        assert!(is_music("[Music]", 40));
        assert!(is_music("♪ ♪ ♪", 40));
        assert!(is_music("[Music] [Applause] [Music]", 40));
        assert!(is_music("(upbeat music playing) yeah", 40));
    }

    #[test]
    fn test_music_with_real_content_is_not_music() {
        let text = "[Music] Photosynthesis is the process plants use to convert light into energy.";
        assert!(!is_music(text, 40));
    }

    #[test]
    fn test_short_text_without_markers_is_not_music() {
        assert!(!is_music("Too short.", 40));
    }

    #[test]
    fn test_off_topic() {
        let s = split_sentences(
            "This video is sponsored by Acme. Use promo code LEARN for ten percent off. Cells divide.",
        );
        assert!(is_off_topic(&s));
        assert_eq!(classify_sentences(3, &s), Some(OutcomeReason::OffTopic));
    }

    #[test]
    fn test_intro_only_first_segment() {
        let s = split_sentences("Hello everyone and welcome to the channel. In this video we look at cells.");
        assert!(is_intro(0, &s));
        assert!(!is_intro(1, &s));
        assert_eq!(classify_sentences(0, &s), Some(OutcomeReason::Intro));
        assert_eq!(classify_sentences(1, &s), None);
    }

    #[test]
    fn test_instructional_text_unclassified() {
        let s = split_sentences(
            "Photosynthesis is the process plants use to convert light into energy. It happens in chloroplasts.",
        );
        assert_eq!(classify_sentences(0, &s), None);
    }

    #[test]
    fn test_classify_rejected_prefers_music() {
        let text = "[Music] Welcome to the channel.";
        let s = split_sentences(text);
        assert_eq!(classify_rejected(text, 0, &s, 40), Some(OutcomeReason::Music));
        assert_eq!(classify_rejected("Cells divide.", 0, &split_sentences("Cells divide."), 40), None);
    }
}
