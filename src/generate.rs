//! The `ilearn generate` command.
//!
//! Runs the full pipeline on a caption file and writes the manifest.

use anyhow::{bail, Context, Result};
use ilearn_core::caption::CaptionFormat;
use ilearn_core::models::OutcomeReason;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::inspect::read_captions;
use crate::manifest::Manifest;
use crate::pipeline::{run_pipeline, VideoInput};

/// Arguments of `ilearn generate`.
#[derive(Debug, Clone)]
pub struct GenerateArgs {
    pub captions: PathBuf,
    pub title: String,
    pub video_id: Option<String>,
    pub language: Option<String>,
    pub format: Option<CaptionFormat>,
    pub out: Option<PathBuf>,
    pub overwrite: bool,
}

pub fn run_generate(config: &Config, args: GenerateArgs) -> Result<()> {
    if let Some(out) = &args.out {
        if out.exists() && !args.overwrite {
            bail!(
                "{} already exists (pass --overwrite to replace it)",
                out.display()
            );
        }
    }

    let captions = read_captions(&args.captions, args.format)?;
    let video_id = args
        .video_id
        .clone()
        .unwrap_or_else(|| video_id_from_path(&args.captions));

    let input = VideoInput {
        video_id,
        title: args.title.clone(),
        language: args.language.clone(),
        captions: Some(captions),
        chapters: None,
        duration_sec: None,
    };

    let manifest = run_pipeline(&input, config)?;
    let json = manifest.to_json_pretty()?;

    match &args.out {
        Some(out) => {
            write_manifest(out, &json)?;
            print_summary(&manifest);
            println!("Manifest written to {}", out.display());
        }
        None => {
            // The manifest owns stdout; the summary goes to the log.
            log_summary(&manifest);
            println!("{}", json);
        }
    }

    Ok(())
}

fn write_manifest(path: &Path, json: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write manifest: {}", path.display()))
}

/// Derives an id from the caption file stem, e.g. `lecture-01.en.srt` → `lecture-01`.
fn video_id_from_path(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| n.split('.').next())
        .filter(|s| !s.is_empty())
        .unwrap_or("video")
        .to_string()
}

fn print_summary(manifest: &Manifest) {
    println!(
        "{}: {} segments ({:?}), {} questions",
        manifest.video_id,
        manifest.segments.len(),
        manifest.source,
        manifest.question_count
    );
    for mcq in manifest.questions() {
        println!("  ? {}", mcq.stem);
    }
    for reason in OutcomeReason::ALL {
        let count = manifest.reasons.get(&reason).copied().unwrap_or(0);
        if count > 0 {
            println!("  {:<22} {}", reason, count);
        }
    }
}

fn log_summary(manifest: &Manifest) {
    for (reason, count) in &manifest.reasons {
        tracing::info!(reason = %reason, count = *count, "segment outcomes");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_id_from_path() {
        assert_eq!(video_id_from_path(Path::new("/tmp/lecture-01.en.srt")), "lecture-01");
        assert_eq!(video_id_from_path(Path::new("talk.vtt")), "talk");
        assert_eq!(video_id_from_path(Path::new(".srt")), "video");
    }

    #[test]
    fn test_refuses_overwrite() {
        let dir = tempfile::TempDir::new().unwrap();
        let out = dir.path().join("manifest.json");
        std::fs::write(&out, "{}").unwrap();

        let args = GenerateArgs {
            captions: dir.path().join("missing.srt"),
            title: "T".to_string(),
            video_id: None,
            language: None,
            format: None,
            out: Some(out.clone()),
            overwrite: false,
        };
        let err = run_generate(&Config::default(), args).unwrap_err();
        assert!(err.to_string().contains("--overwrite"));
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "{}");
    }
}
