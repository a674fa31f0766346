//! # iLearn CLI (`ilearn`)
//!
//! Parses captions, segments them, generates checkpoint questions and
//! serves the same pipeline over HTTP.
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `ilearn parse <file>` | Parse an SRT or VTT file and print the cues |
//! | `ilearn segment <file>` | Parse and segment captions |
//! | `ilearn chapters` | Segment by chapter markers in a description |
//! | `ilearn uniform` | Fixed-width segments for a duration |
//! | `ilearn generate <file>` | Full pipeline, writes the playback manifest |
//! | `ilearn config` | Print the effective configuration |
//! | `ilearn serve` | Start the HTTP API |
//!
//! ## Examples
//!
//! ```bash
//! ilearn parse lecture.vtt --json
//! ilearn segment lecture.srt --min 20 --preferred 40 --max 60
//! ilearn chapters --description desc.txt --duration 912
//! ilearn generate lecture.srt --title "Cell Biology" --out out/cells.json
//! ilearn --config ./config/ilearn.toml serve
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use ilearn::config::{self, DEFAULT_CONFIG_PATH};
use ilearn::generate::{self, GenerateArgs};
use ilearn::inspect::{self, SegmentOverrides};
use ilearn::{logging, server};
use ilearn_core::caption::CaptionFormat;
use std::path::PathBuf;

/// iLearn: caption segmentation and checkpoint quiz generation.
#[derive(Parser)]
#[command(
    name = "ilearn",
    about = "iLearn: caption segmentation and checkpoint quiz generation",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/ilearn.toml`; built-in defaults are used when
    /// that file does not exist. An explicitly given path must exist.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level (`trace`, `debug`, `info`, `warn`, `error`). Overrides
    /// `[logging].level`; `RUST_LOG` overrides both.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a caption file and print its cues.
    Parse {
        /// SRT or VTT file.
        file: PathBuf,

        /// Caption format; detected from the extension and content when omitted.
        #[arg(long, value_parser = parse_format)]
        format: Option<CaptionFormat>,

        /// Print cues as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Parse and segment a caption file.
    Segment {
        file: PathBuf,

        #[arg(long, value_parser = parse_format)]
        format: Option<CaptionFormat>,

        /// Minimum segment duration in seconds.
        #[arg(long)]
        min: Option<f64>,

        /// Maximum segment duration in seconds.
        #[arg(long)]
        max: Option<f64>,

        /// Preferred segment duration in seconds.
        #[arg(long)]
        preferred: Option<f64>,

        /// Language tag stored on each segment.
        #[arg(long)]
        language: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// Segment a video by chapter markers (`M:SS Title` lines).
    Chapters {
        /// Text file holding the video description.
        #[arg(long)]
        description: PathBuf,

        /// Video duration in seconds.
        #[arg(long)]
        duration: f64,

        #[arg(long)]
        json: bool,
    },

    /// Split a duration into fixed-width segments.
    Uniform {
        /// Video duration in seconds.
        #[arg(long)]
        duration: f64,

        /// Window width in seconds. Defaults to `[segmentation].uniform_width_secs`.
        #[arg(long)]
        width: Option<f64>,

        #[arg(long)]
        json: bool,
    },

    /// Run the full pipeline and write the playback manifest.
    ///
    /// Prints a per-reason summary. Without `--out` the manifest JSON goes
    /// to stdout.
    Generate {
        /// SRT or VTT file.
        file: PathBuf,

        /// Video title, used in question stems.
        #[arg(long)]
        title: String,

        /// Defaults to the caption file name without extensions.
        #[arg(long)]
        video_id: Option<String>,

        #[arg(long)]
        language: Option<String>,

        #[arg(long, value_parser = parse_format)]
        format: Option<CaptionFormat>,

        /// Output path for the manifest JSON.
        #[arg(long)]
        out: Option<PathBuf>,

        /// Replace an existing file at `--out`.
        #[arg(long)]
        overwrite: bool,
    },

    /// Print the effective configuration as TOML.
    Config,

    /// Start the HTTP API on `[server].bind`.
    Serve,
}

fn parse_format(s: &str) -> Result<CaptionFormat, String> {
    s.parse::<CaptionFormat>().map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let cfg = config::resolve_config(cli.config.as_deref())?;
    logging::init_tracing(&cfg.logging, cli.log_level.as_deref())?;
    let config_path = cli
        .config
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    tracing::debug!(config = config_path.as_str(), "configuration loaded");

    match cli.command {
        Commands::Parse { file, format, json } => {
            inspect::run_parse(&file, format, json)?;
        }
        Commands::Segment {
            file,
            format,
            min,
            max,
            preferred,
            language,
            json,
        } => {
            let overrides = SegmentOverrides {
                min,
                max,
                preferred,
            };
            inspect::run_segment(&cfg, &file, format, &overrides, language.as_deref(), json)?;
        }
        Commands::Chapters {
            description,
            duration,
            json,
        } => {
            inspect::run_chapters(&cfg, &description, duration, json)?;
        }
        Commands::Uniform {
            duration,
            width,
            json,
        } => {
            inspect::run_uniform(&cfg, duration, width, json)?;
        }
        Commands::Generate {
            file,
            title,
            video_id,
            language,
            format,
            out,
            overwrite,
        } => {
            generate::run_generate(
                &cfg,
                GenerateArgs {
                    captions: file,
                    title,
                    video_id,
                    language,
                    format,
                    out,
                    overwrite,
                },
            )?;
        }
        Commands::Config => {
            print!("{}", cfg.to_toml_pretty()?);
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
    }

    Ok(())
}
