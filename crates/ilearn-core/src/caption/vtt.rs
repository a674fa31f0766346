//! WebVTT parser.
//!
//! Everything before the first `-->` line (the `WEBVTT` header, `NOTE`
//! and `STYLE` blocks) is ignored. Each timing line starts a cue whose text
//! runs until a blank line or the next timing line. Cue settings after the
//! end timestamp are ignored, and inline markup (`<c>`, `<i>`, karaoke
//! timestamps like `<00:00:01.500>`) is stripped from the text.

use once_cell::sync::Lazy;
use regex::Regex;

use super::time::parse_vtt_timing;
use super::{make_cue, normalize_input, CaptionParser};
use crate::models::Cue;

static INLINE_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));

#[derive(Debug, Clone, Copy, Default)]
pub struct VttParser;

impl CaptionParser for VttParser {
    fn parse(&self, content: &str) -> Vec<Cue> {
        let content = normalize_input(content);
        let lines: Vec<&str> = content.lines().collect();

        let Some(first) = lines.iter().position(|l| l.contains("-->")) else {
            return Vec::new();
        };

        let mut cues = Vec::new();
        let mut i = first;
        while i < lines.len() {
            let Some((start, end)) = parse_vtt_timing(lines[i]) else {
                i += 1;
                continue;
            };

            let mut text_lines = Vec::new();
            let mut j = i + 1;
            while j < lines.len() && !lines[j].trim().is_empty() && !lines[j].contains("-->") {
                text_lines.push(clean_text(lines[j]));
                j += 1;
            }

            let text = text_lines
                .into_iter()
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join(" ");
            if let Some(cue) = make_cue(start, end, text) {
                cues.push(cue);
            }
            i = j;
        }

        cues
    }
}

/// Removes inline tags, decodes the common entities, collapses whitespace.
fn clean_text(line: &str) -> String {
    let stripped = INLINE_TAG.replace_all(line, "");
    let decoded = stripped
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&");
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}
