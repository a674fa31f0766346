//! Bag-of-words cosine similarity used to reject near-duplicate stems.
//!
//! Texts are tokenized into lowercase runs of Unicode alphanumerics and
//! turned into term-frequency (count) vectors. No IDF weighting, no
//! stemming.

use std::collections::HashMap;

/// Lowercase alphanumeric tokens, in order.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect()
}

/// Token counts for `text`.
pub fn term_frequencies(text: &str) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for token in tokenize(text) {
        *counts.entry(token).or_insert(0) += 1;
    }
    counts
}

/// Cosine similarity between two term-frequency vectors.
///
/// Returns a value in `[0.0, 1.0]`; `0.0` when either vector is empty.
pub fn cosine_similarity(a: &HashMap<String, usize>, b: &HashMap<String, usize>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let dot: f64 = small
        .iter()
        .filter_map(|(term, &x)| large.get(term).map(|&y| (x * y) as f64))
        .sum();

    let norm_a = a.values().map(|&x| (x * x) as f64).sum::<f64>().sqrt();
    let norm_b = b.values().map(|&y| (y * y) as f64).sum::<f64>().sqrt();

    let denom = norm_a * norm_b;
    if denom < f64::EPSILON {
        return 0.0;
    }

    dot / denom
}

/// Highest similarity between `candidate` and any of `existing`, or `0.0`.
pub fn max_similarity(candidate: &str, existing: &[String]) -> f64 {
    let cand = term_frequencies(candidate);
    existing
        .iter()
        .map(|s| cosine_similarity(&cand, &term_frequencies(s)))
        .fold(0.0, f64::max)
}
