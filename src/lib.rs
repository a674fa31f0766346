//! # iLearn
//!
//! Turns a video's captions into checkpoint quizzes for the iLearn player.
//!
//! The pure stages (caption parsing, segmentation, question generation)
//! live in `ilearn-core`. This crate adds configuration, logging, the
//! per-video pipeline, manifest assembly, the `ilearn` CLI, and a JSON
//! HTTP API.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────┐   ┌────────────┐   ┌────────────┐   ┌──────────┐
//! │ SRT / VTT │──▶│  Segmenter │──▶│ MCQ + dedup│──▶│ Manifest │
//! │  parsers  │   │ cue/chap/  │   │   fold     │   │  (JSON)  │
//! └───────────┘   │  uniform   │   └────────────┘   └────┬─────┘
//!                 └────────────┘                         │
//!                                    ┌───────────────────┤
//!                                    ▼                   ▼
//!                               ┌──────────┐       ┌──────────┐
//!                               │   CLI    │       │   HTTP   │
//!                               └──────────┘       └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! ilearn parse lecture.srt
//! ilearn segment lecture.vtt --preferred 50
//! ilearn generate lecture.srt --title "Photosynthesis" --out manifest.json
//! ilearn serve
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`logging`] | `tracing` subscriber setup |
//! | [`pipeline`] | Per-video source selection and stage wiring |
//! | [`manifest`] | Playback manifest assembly |
//! | [`inspect`] | `parse` / `segment` / `chapters` / `uniform` commands |
//! | [`generate`] | `generate` command |
//! | [`server`] | HTTP API |

pub mod config;
pub mod generate;
pub mod inspect;
pub mod logging;
pub mod manifest;
pub mod pipeline;
pub mod server;
