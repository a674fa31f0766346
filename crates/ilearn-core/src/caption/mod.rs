//! Caption parsing for SubRip (`.srt`) and WebVTT (`.vtt`) files.
//!
//! Each wire format is one implementation of [`CaptionParser`]. Parsers are
//! lenient: a malformed block is dropped and its siblings are kept, so a
//! parser never fails. An empty result is for the caller to report.
//!
//! Choosing a parser is kept apart from parsing itself: the caller either
//! knows the format or asks [`detect_format`] to sniff it from a file name
//! and the content.
//!
//! # Example
//!
//! ```rust
//! use ilearn_core::caption::{detect_format, CaptionFormat};
//!
//! let vtt = "WEBVTT\n\n00:00:01.000 --> 00:00:03.500\nHi there\n";
//! let format = detect_format(None, vtt);
//! assert_eq!(format, CaptionFormat::Vtt);
//!
//! let cues = format.parser().parse(vtt);
//! assert_eq!(cues[0].text, "Hi there");
//! assert_eq!(cues[0].end_sec, 3.5);
//! ```

mod srt;
mod time;
mod vtt;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::models::Cue;

pub use srt::SrtParser;
pub use vtt::VttParser;

/// Converts raw subtitle text into cues, in file order.
pub trait CaptionParser: Send + Sync {
    fn parse(&self, content: &str) -> Vec<Cue>;
}

/// A supported caption wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptionFormat {
    Srt,
    Vtt,
}

impl CaptionFormat {
    pub fn parser(self) -> Box<dyn CaptionParser> {
        match self {
            CaptionFormat::Srt => Box::new(SrtParser),
            CaptionFormat::Vtt => Box::new(VttParser),
        }
    }

    /// Maps a file extension (without the dot, any case) to a format.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "srt" => Some(CaptionFormat::Srt),
            "vtt" | "webvtt" => Some(CaptionFormat::Vtt),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CaptionFormat::Srt => "srt",
            CaptionFormat::Vtt => "vtt",
        }
    }
}

impl fmt::Display for CaptionFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CaptionFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        CaptionFormat::from_extension(s.trim())
            .ok_or_else(|| anyhow::anyhow!("unknown caption format: '{}' (expected srt or vtt)", s))
    }
}

/// Parses `content` with the parser for `format`.
pub fn parse_captions(content: &str, format: CaptionFormat) -> Vec<Cue> {
    format.parser().parse(content)
}

/// Guesses the caption format.
///
/// Order of evidence: a `WEBVTT` header, then the extension of
/// `path_hint`, then the millisecond separator of the first timing line
/// (`,` for SRT, `.` for VTT). Falls back to SRT.
pub fn detect_format(path_hint: Option<&str>, content: &str) -> CaptionFormat {
    let body = strip_bom(content);
    if body.trim_start().starts_with("WEBVTT") {
        return CaptionFormat::Vtt;
    }

    if let Some(format) = path_hint
        .and_then(|p| Path::new(p).extension())
        .and_then(|e| e.to_str())
        .and_then(CaptionFormat::from_extension)
    {
        return format;
    }

    if let Some(line) = body.lines().find(|l| l.contains("-->")) {
        let start = line.split("-->").next().unwrap_or("").trim();
        if start.contains(',') {
            return CaptionFormat::Srt;
        }
        if start.contains('.') {
            return CaptionFormat::Vtt;
        }
    }

    CaptionFormat::Srt
}

/// Drops a leading UTF-8 byte-order mark.
fn strip_bom(content: &str) -> &str {
    content.strip_prefix('\u{feff}').unwrap_or(content)
}

/// Normalizes line endings and drops a BOM.
fn normalize_input(content: &str) -> String {
    strip_bom(content).replace("\r\n", "\n").replace('\r', "\n")
}

/// Builds a cue, rejecting empty text and non-positive durations.
fn make_cue(start_sec: f64, end_sec: f64, text: String) -> Option<Cue> {
    if end_sec <= start_sec || text.is_empty() {
        return None;
    }
    Some(Cue {
        start_sec,
        end_sec,
        text,
    })
}
