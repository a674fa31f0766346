//! Timing-line patterns shared by the caption parsers.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// `HH:MM:SS,mmm --> HH:MM:SS,mmm`
static SRT_TIMING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(\d{2,}):(\d{2}):(\d{2}),(\d{3})\s*-->\s*(\d{2,}):(\d{2}):(\d{2}),(\d{3})")
        .expect("valid SRT timing regex")
});

/// `[HH:]MM:SS.mmm --> [HH:]MM:SS.mmm`, optionally followed by cue settings.
static VTT_TIMING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(?:(\d{2,}):)?(\d{2}):(\d{2})\.(\d{3})\s*-->\s*(?:(\d{2,}):)?(\d{2}):(\d{2})\.(\d{3})",
    )
    .expect("valid VTT timing regex")
});

/// Parses an SRT timing line into `(start_sec, end_sec)`.
pub(super) fn parse_srt_timing(line: &str) -> Option<(f64, f64)> {
    let caps = SRT_TIMING.captures(line)?;
    let start = seconds_from(&caps, 1, 2, 3, 4)?;
    let end = seconds_from(&caps, 5, 6, 7, 8)?;
    Some((start, end))
}

/// Parses a WebVTT timing line into `(start_sec, end_sec)`.
pub(super) fn parse_vtt_timing(line: &str) -> Option<(f64, f64)> {
    let caps = VTT_TIMING.captures(line)?;
    let start = seconds_from(&caps, 1, 2, 3, 4)?;
    let end = seconds_from(&caps, 5, 6, 7, 8)?;
    Some((start, end))
}

fn seconds_from(caps: &Captures<'_>, h: usize, m: usize, s: usize, ms: usize) -> Option<f64> {
    // A missing hours group means the short VTT form.
    let hours: u64 = match caps.get(h) {
        Some(v) => v.as_str().parse().ok()?,
        None => 0,
    };
    let minutes: u64 = caps.get(m)?.as_str().parse().ok()?;
    let seconds: u64 = caps.get(s)?.as_str().parse().ok()?;
    let millis: u64 = caps.get(ms)?.as_str().parse().ok()?;

    let total_ms = ((hours * 60 + minutes) * 60 + seconds) * 1000 + millis;
    Some(total_ms as f64 / 1000.0)
}
