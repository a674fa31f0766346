//! Inspection commands: `parse`, `segment`, `chapters`, `uniform`.
//!
//! Each command runs one stage of the pipeline on local input and prints
//! the result as a human-readable table or, with `--json`, as JSON.

use anyhow::{Context, Result};
use ilearn_core::caption::CaptionFormat;
use ilearn_core::chapters::parse_chapters;
use ilearn_core::models::{Cue, Segment};
use ilearn_core::segment::{segment_by_chapters, segment_cues, segment_uniform, SegmentOptions};
use serde::Serialize;
use std::path::Path;

use crate::config::Config;
use crate::pipeline::{load_cues, CaptionInput};

/// Overrides for segmentation settings taken from the command line.
#[derive(Debug, Default, Clone)]
pub struct SegmentOverrides {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub preferred: Option<f64>,
}

impl SegmentOverrides {
    pub fn apply(&self, mut options: SegmentOptions) -> Result<SegmentOptions> {
        if let Some(min) = self.min {
            options.min_duration_secs = min;
        }
        if let Some(max) = self.max {
            options.max_duration_secs = max;
        }
        if let Some(preferred) = self.preferred {
            options.preferred_duration_secs = preferred;
        }
        options.validate()?;
        Ok(options)
    }
}

/// Reads a caption file from disk into a [`CaptionInput`].
pub fn read_captions(path: &Path, format: Option<CaptionFormat>) -> Result<CaptionInput> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read caption file: {}", path.display()))?;
    Ok(CaptionInput {
        content,
        format,
        file_name: Some(path.display().to_string()),
    })
}

pub fn run_parse(path: &Path, format: Option<CaptionFormat>, json: bool) -> Result<()> {
    let captions = read_captions(path, format)?;
    let (format, cues) = load_cues(&captions)?;

    if json {
        return print_json(&cues);
    }

    println!("{} cues ({})", cues.len(), format);
    for cue in &cues {
        print_cue(cue);
    }
    Ok(())
}

pub fn run_segment(
    config: &Config,
    path: &Path,
    format: Option<CaptionFormat>,
    overrides: &SegmentOverrides,
    language: Option<&str>,
    json: bool,
) -> Result<()> {
    let options = overrides.apply(config.segmentation.segment_options())?;
    let language = language.unwrap_or(&config.segmentation.default_language);

    let captions = read_captions(path, format)?;
    let (_, cues) = load_cues(&captions)?;
    let segments = segment_cues(&cues, &options, language)?;
    tracing::info!(cues = cues.len(), segments = segments.len(), "segmented captions");

    print_segments(&segments, json)
}

pub fn run_chapters(config: &Config, description: &Path, duration: f64, json: bool) -> Result<()> {
    let text = std::fs::read_to_string(description)
        .with_context(|| format!("Failed to read description file: {}", description.display()))?;

    let chapters = parse_chapters(&text);
    if chapters.is_empty() {
        anyhow::bail!("no chapter markers found in {}", description.display());
    }
    let segments =
        segment_by_chapters(&chapters, duration, &config.segmentation.default_language);

    print_segments(&segments, json)
}

pub fn run_uniform(config: &Config, duration: f64, width: Option<f64>, json: bool) -> Result<()> {
    let width = width.unwrap_or(config.segmentation.uniform_width_secs);
    let segments = segment_uniform(duration, width, &config.segmentation.default_language)?;
    print_segments(&segments, json)
}

fn print_cue(cue: &Cue) {
    println!(
        "  [{} → {}] ({:.1}s) {}",
        format_timestamp(cue.start_sec),
        format_timestamp(cue.end_sec),
        cue.duration_secs(),
        cue.text
    );
}

fn print_segments(segments: &[Segment], json: bool) -> Result<()> {
    if json {
        return print_json(segments);
    }

    println!("{} segments", segments.len());
    for seg in segments {
        let label = seg.title.as_deref().unwrap_or("");
        println!(
            "  #{:<3} {} → {} ({:>3.0}s) {}",
            seg.segment_index,
            format_timestamp(seg.t_start_sec),
            format_timestamp(seg.t_end_sec),
            seg.duration_secs(),
            label
        );
        if !seg.text.is_empty() && seg.title.is_none() {
            println!("        {}", preview(&seg.text, 96));
        }
    }
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// `H:MM:SS.mmm`, or `M:SS.mmm` under an hour.
pub fn format_timestamp(secs: f64) -> String {
    let total_ms = (secs.max(0.0) * 1000.0).round() as u64;
    let ms = total_ms % 1000;
    let s = (total_ms / 1000) % 60;
    let m = (total_ms / 60_000) % 60;
    let h = total_ms / 3_600_000;
    if h > 0 {
        format!("{}:{:02}:{:02}.{:03}", h, m, s, ms)
    } else {
        format!("{}:{:02}.{:03}", m, s, ms)
    }
}

fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{}…", cut.trim_end())
}
