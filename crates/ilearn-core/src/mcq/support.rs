//! Support spans: where in the segment a question's answer is heard.
//!
//! Cues are merged into segment text, so the exact time of a sentence is
//! lost. The span is estimated from the sentence's relative position:
//!
//! ```text
//! anchor = t_start + (sentence_index / total_sentences) × duration
//! length = max(min_secs, fraction × duration)
//! ```
//!
//! and then shifted or cut to fit inside `[t_start, t_end]`.

use crate::models::{Segment, SupportLine};

/// Estimates the support span of sentence `sentence_index` out of
/// `total_sentences`. Empty when the segment has no duration or the index
/// is out of range.
pub fn derive_support(
    segment: &Segment,
    sentence: &str,
    sentence_index: usize,
    total_sentences: usize,
    min_secs: f64,
    fraction: f64,
) -> Vec<SupportLine> {
    let duration = segment.duration_secs();
    if duration <= 0.0 || total_sentences == 0 || sentence_index >= total_sentences {
        return Vec::new();
    }

    let offset = sentence_index as f64 / total_sentences as f64;
    let length = (fraction * duration).max(min_secs).min(duration);

    let anchor = segment.t_start_sec + offset * duration;
    let end = (anchor + length).min(segment.t_end_sec);
    let start = (end - length).max(segment.t_start_sec);

    if end <= start {
        return Vec::new();
    }

    vec![SupportLine {
        t_start_sec: start,
        t_end_sec: end,
        text: sentence.to_string(),
    }]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(start: f64, end: f64) -> Segment {
        Segment {
            segment_id: "seg".to_string(),
            segment_index: 0,
            t_start_sec: start,
            t_end_sec: end,
            text: String::new(),
            text_hash: String::new(),
            language: "en".to_string(),
            title: None,
        }
    }

    #[test]
    fn test_first_sentence_anchors_at_start() {
        let s = derive_support(&segment(100.0, 150.0), "x", 0, 4, 2.0, 0.1);
        assert_eq!(s.len(), 1);
        assert_eq!(s[0].t_start_sec, 100.0);
        assert_eq!(s[0].t_end_sec, 105.0);
        assert_eq!(s[0].text, "x");
    }

    #[test]
    fn test_middle_sentence() {
        let s = derive_support(&segment(0.0, 40.0), "x", 2, 4, 2.0, 0.1);
        assert_eq!(s[0].t_start_sec, 20.0);
        assert_eq!(s[0].t_end_sec, 24.0);
    }

    #[test]
    fn test_minimum_length_applies() {
        let s = derive_support(&segment(0.0, 10.0), "x", 0, 1, 2.0, 0.1);
        assert_eq!(s[0].t_end_sec - s[0].t_start_sec, 2.0);
    }

    #[test]
    fn test_shifted_back_inside_segment() {
        // anchor at 58.5 with a 2s span would overrun 60
        let s = derive_support(&segment(50.0, 60.0), "x", 17, 20, 2.0, 0.1);
        assert_eq!(s[0].t_end_sec, 60.0);
        assert_eq!(s[0].t_start_sec, 58.0);
    }

    #[test]
    fn test_span_never_exceeds_short_segment() {
        let s = derive_support(&segment(5.0, 6.0), "x", 0, 1, 2.0, 0.1);
        assert_eq!(s[0].t_start_sec, 5.0);
        assert_eq!(s[0].t_end_sec, 6.0);
    }

    #[test]
    fn test_degenerate_inputs_are_empty() {
        assert!(derive_support(&segment(5.0, 5.0), "x", 0, 1, 2.0, 0.1).is_empty());
        assert!(derive_support(&segment(0.0, 10.0), "x", 0, 0, 2.0, 0.1).is_empty());
        assert!(derive_support(&segment(0.0, 10.0), "x", 3, 3, 2.0, 0.1).is_empty());
    }

    #[test]
    fn test_always_within_bounds() {
        let seg = segment(12.0, 57.0);
        for total in 1..12 {
            for idx in 0..total {
                let s = derive_support(&seg, "x", idx, total, 2.0, 0.1);
                assert_eq!(s.len(), 1);
                assert!(s[0].t_start_sec >= seg.t_start_sec);
                assert!(s[0].t_end_sec <= seg.t_end_sec);
                assert!(s[0].t_start_sec < s[0].t_end_sec);
            }
        }
    }
}
