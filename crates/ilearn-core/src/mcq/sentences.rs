//! Sentence splitting, the assessability test, and stem/answer synthesis.

use once_cell::sync::Lazy;
use regex::Regex;

/// Copula and causal markers that suggest a sentence states a fact.
static ASSESSABLE_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(is|are|was|were|means|refers|includes|consists|because|therefore|results)\b")
        .expect("valid marker regex")
});

/// Splits on `.`, `!` or `?` followed by whitespace. The terminator stays
/// with its sentence; empty pieces are dropped.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        current.push(c);
        let terminal = matches!(c, '.' | '!' | '?');
        if terminal && chars.peek().is_some_and(|n| n.is_whitespace()) {
            push_trimmed(&mut sentences, &current);
            current.clear();
        }
    }
    push_trimmed(&mut sentences, &current);

    sentences
}

fn push_trimmed(out: &mut Vec<String>, s: &str) {
    let t = s.trim();
    if !t.is_empty() {
        out.push(t.to_string());
    }
}

/// A sentence is assessable when it is long enough and contains a marker.
pub fn is_assessable(sentence: &str, min_chars: usize) -> bool {
    sentence.chars().count() >= min_chars && ASSESSABLE_MARKER.is_match(sentence)
}

/// Index of the first assessable sentence.
pub fn first_assessable(sentences: &[String], min_chars: usize) -> Option<usize> {
    sentences.iter().position(|s| is_assessable(s, min_chars))
}

/// Subject and grounded answer extracted from one sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Synthesis {
    pub subject: String,
    pub answer: String,
}

/// Splits `sentence` on the first `" is "`.
///
/// The left side is the subject, the right side (one trailing period
/// removed) the answer. `None` when there is no `" is "` or either side is
/// empty.
pub fn synthesize(sentence: &str) -> Option<Synthesis> {
    let (left, right) = sentence.split_once(" is ")?;
    let subject = left.trim();
    let right = right.trim();
    let answer = right.strip_suffix('.').unwrap_or(right).trim();
    if subject.is_empty() || answer.is_empty() {
        return None;
    }
    Some(Synthesis {
        subject: subject.to_string(),
        answer: answer.to_string(),
    })
}

/// The question stem for `subject` in a segment titled `title`.
pub fn build_stem(title: &str, subject: &str) -> String {
    format!(
        "According to the video segment \"{}\", what is {}?",
        title, subject
    )
}
