//! # iLearn Core
//!
//! Pure logic behind iLearn's quiz-driven video player: caption parsing,
//! transcript segmentation, and multiple-choice question generation with
//! in-run deduplication.
//!
//! This crate performs no I/O, keeps no global state, and does no logging.
//! Every function takes its inputs by argument and returns fresh values, so
//! the calling application owns loading, persistence, and telemetry.
//!
//! ```text
//! raw captions ──▶ caption ──▶ Vec<Cue> ──▶ segment ──▶ Vec<Segment>
//!                                                          │
//!                           existing stems ──▶ mcq::generate_all
//!                                                          │
//!                                                          ▼
//!                                                  Vec<McqOutcome>
//! ```
//!
//! # Example
//!
//! ```rust
//! use ilearn_core::caption::{parse_captions, CaptionFormat};
//! use ilearn_core::segment::{segment_cues, SegmentOptions};
//!
//! let srt = "1\n00:00:01,000 --> 00:00:04,000\nHello world.\n\n\
//!            2\n00:00:04,000 --> 00:00:08,000\nThis is a test.";
//! let cues = parse_captions(srt, CaptionFormat::Srt);
//! assert_eq!(cues.len(), 2);
//!
//! let segments = segment_cues(&cues, &SegmentOptions::default(), "en").unwrap();
//! assert_eq!(segments.len(), 1);
//! assert_eq!(segments[0].t_start_sec, 1.0);
//! assert_eq!(segments[0].t_end_sec, 8.0);
//! ```

pub mod caption;
pub mod chapters;
pub mod error;
pub mod mcq;
pub mod models;
pub mod segment;
