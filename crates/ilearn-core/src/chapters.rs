//! Chapter markers from a video description.
//!
//! Video descriptions often list chapters one per line:
//!
//! ```text
//! 0:00 Intro
//! 1:30 - Light reactions
//! (1:02:03) Summary
//! ```
//!
//! [`parse_chapters`] reads those lines into [`Chapter`]s that feed
//! [`segment_by_chapters`](crate::segment::segment_by_chapters).

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::Chapter;

/// `[(]H:MM:SS[)]` or `[(]M:SS[)]`, a separator, then the title.
static CHAPTER_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*[\[(]?(?:(\d{1,2}):)?(\d{1,2}):(\d{2})[\])]?\s*(?:[-–—:|]\s*)?(\S.*)$")
        .expect("valid chapter regex")
});

/// Extracts chapter markers, sorted by start time.
///
/// Lines without a leading timestamp are ignored. When two lines share a
/// start time the first one wins.
///
/// ```rust
/// use ilearn_core::chapters::parse_chapters;
///
/// let chapters = parse_chapters("Great video!\n0:00 Intro\n1:30 - Basics\n");
/// assert_eq!(chapters.len(), 2);
/// assert_eq!(chapters[1].start_sec, 90.0);
/// assert_eq!(chapters[1].title, "Basics");
/// ```
pub fn parse_chapters(description: &str) -> Vec<Chapter> {
    let mut chapters: Vec<Chapter> = description.lines().filter_map(parse_line).collect();
    chapters.sort_by(|a, b| a.start_sec.total_cmp(&b.start_sec));
    chapters.dedup_by(|later, earlier| later.start_sec == earlier.start_sec);
    chapters
}

fn parse_line(line: &str) -> Option<Chapter> {
    let caps = CHAPTER_LINE.captures(line)?;
    let hours: u64 = match caps.get(1) {
        Some(h) => h.as_str().parse().ok()?,
        None => 0,
    };
    let minutes: u64 = caps.get(2)?.as_str().parse().ok()?;
    let seconds: u64 = caps.get(3)?.as_str().parse().ok()?;
    if seconds >= 60 || (hours > 0 && minutes >= 60) {
        return None;
    }
    let title = caps.get(4)?.as_str().trim().to_string();
    if title.is_empty() {
        return None;
    }
    Some(Chapter {
        start_sec: ((hours * 60 + minutes) * 60 + seconds) as f64,
        title,
    })
}
