//! SubRip parser.
//!
//! A file is a sequence of blank-line-separated blocks:
//!
//! ```text
//! 1
//! 00:00:01,000 --> 00:00:04,000
//! Hello world.
//! ```
//!
//! A block needs an index line, a timing line, and at least one text line.
//! Text lines are joined with a single space. Blocks that do not fit are
//! skipped without affecting their neighbours.

use super::time::parse_srt_timing;
use super::{make_cue, normalize_input, CaptionParser};
use crate::models::Cue;

#[derive(Debug, Clone, Copy, Default)]
pub struct SrtParser;

impl CaptionParser for SrtParser {
    fn parse(&self, content: &str) -> Vec<Cue> {
        let content = normalize_input(content);
        split_blocks(&content)
            .into_iter()
            .filter_map(|block| parse_block(&block))
            .collect()
    }
}

/// Groups lines into blocks separated by one or more blank lines.
fn split_blocks(content: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in content.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }

    blocks
}

fn parse_block(lines: &[&str]) -> Option<Cue> {
    if lines.len() < 3 {
        return None;
    }
    let (start, end) = parse_srt_timing(lines[1])?;
    let text = lines[2..]
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    make_cue(start, end, text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Vec<Cue> {
        SrtParser.parse(s)
    }

    #[test]
    fn test_two_blocks() {
        let cues = parse(
            "1\n00:00:01,000 --> 00:00:04,000\nHello world.\n\n\
             2\n00:00:04,000 --> 00:00:08,000\nThis is a test.",
        );
        assert_eq!(cues.len(), 2);
        assert_eq!(cues[0].start_sec, 1.0);
        assert_eq!(cues[0].end_sec, 4.0);
        assert_eq!(cues[0].text, "Hello world.");
        assert_eq!(cues[1].start_sec, 4.0);
        assert_eq!(cues[1].end_sec, 8.0);
        assert_eq!(cues[1].text, "This is a test.");
    }

    #[test]
    fn test_multiline_text_joined_with_space() {
        let cues = parse("1\n00:00:00,000 --> 00:00:02,000\nfirst line\n  second line  \n");
        assert_eq!(cues[0].text, "first line second line");
    }

    #[test]
    fn test_malformed_blocks_skipped_siblings_kept() {
        let cues = parse(
            "1\n00:00:01,000 --> 00:00:02,000\nkept one\n\n\
             2\nnot a timing line\nlost\n\n\
             3\n00:00:03,000 --> 00:00:04,000\n\n\
             4\n00:00:05,000 --> 00:00:06,000\nkept two\n",
        );
        let texts: Vec<&str> = cues.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["kept one", "kept two"]);
    }

    #[test]
    fn test_crlf_and_bom() {
        let cues = parse("\u{feff}1\r\n00:00:01,000 --> 00:00:02,500\r\nHi\r\n\r\n");
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].end_sec, 2.5);
        assert_eq!(cues[0].text, "Hi");
    }

    #[test]
    fn test_non_positive_duration_dropped() {
        let cues = parse("1\n00:00:05,000 --> 00:00:05,000\nzero\n\n2\n00:00:06,000 --> 00:00:04,000\nneg\n");
        assert!(cues.is_empty());
    }

    #[test]
    fn test_file_order_preserved() {
        let cues = parse(
            "1\n00:00:10,000 --> 00:00:12,000\nlater\n\n\
             2\n00:00:01,000 --> 00:00:02,000\nearlier\n",
        );
        assert_eq!(cues[0].text, "later");
        assert_eq!(cues[1].text, "earlier");
    }

    #[test]
    fn test_every_cue_has_positive_duration() {
        let content = (0..20)
            .map(|i| {
                format!(
                    "{}\n00:00:{:02},000 --> 00:00:{:02},500\nline {}\n",
                    i + 1,
                    i,
                    i,
                    i
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        let cues = parse(&content);
        assert_eq!(cues.len(), 20);
        assert!(cues.iter().all(|c| c.start_sec < c.end_sec));
    }

    #[test]
    fn test_empty_input() {
        assert!(parse("").is_empty());
        assert!(parse("\n\n\n").is_empty());
    }
}
