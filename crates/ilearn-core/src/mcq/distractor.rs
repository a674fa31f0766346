//! Wrong-answer generation.
//!
//! The generator only needs three plausible-looking wrong options. How they
//! are produced is behind [`DistractorStrategy`] so a content-aware strategy
//! can replace the templates without touching the rest of the pipeline.

/// Produces three distractors for a question.
pub trait DistractorStrategy: Send + Sync {
    fn distractors(&self, subject: &str, correct_answer: &str, title: &str) -> [String; 3];
}

/// Fixed templates that reference the segment title.
///
/// The results are structurally plausible but are not checked against the
/// segment content.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateDistractors;

impl DistractorStrategy for TemplateDistractors {
    fn distractors(&self, subject: &str, _correct_answer: &str, title: &str) -> [String; 3] {
        [
            format!("A topic that \"{}\" does not cover", title),
            format!("The opposite of what \"{}\" says about {}", title, subject),
            format!("An unrelated detail mentioned before \"{}\"", title),
        ]
    }
}
