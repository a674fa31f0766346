//! TOML configuration.
//!
//! Every section and field has a default, so an empty file (or no file at
//! all) is a valid configuration. Values are validated once after parsing;
//! the rest of the application can trust them.
//!
//! ```toml
//! [logging]
//! level = "info"
//! format = "pretty"
//!
//! [segmentation]
//! min_duration_secs = 30.0
//! max_duration_secs = 60.0
//! preferred_duration_secs = 45.0
//!
//! [mcq]
//! dedup_threshold = 0.9
//! max_per_video = 20
//!
//! [server]
//! bind = "127.0.0.1:7341"
//! ```

use anyhow::{bail, Context, Result};
use ilearn_core::mcq::McqOptions;
use ilearn_core::segment::{
    SegmentOptions, DEFAULT_MAX_DURATION_SECS, DEFAULT_MIN_DURATION_SECS,
    DEFAULT_PREFERRED_DURATION_SECS, DEFAULT_UNIFORM_WIDTH_SECS,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Used when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "./config/ilearn.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub segmentation: SegmentationConfig,
    pub mcq: McqConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`.
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationConfig {
    pub min_duration_secs: f64,
    pub max_duration_secs: f64,
    pub preferred_duration_secs: f64,
    /// Window width when a video has neither captions nor chapters.
    pub uniform_width_secs: f64,
    pub default_language: String,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            min_duration_secs: DEFAULT_MIN_DURATION_SECS,
            max_duration_secs: DEFAULT_MAX_DURATION_SECS,
            preferred_duration_secs: DEFAULT_PREFERRED_DURATION_SECS,
            uniform_width_secs: DEFAULT_UNIFORM_WIDTH_SECS,
            default_language: "en".to_string(),
        }
    }
}

impl SegmentationConfig {
    pub fn segment_options(&self) -> SegmentOptions {
        SegmentOptions {
            min_duration_secs: self.min_duration_secs,
            max_duration_secs: self.max_duration_secs,
            preferred_duration_secs: self.preferred_duration_secs,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct McqConfig {
    pub min_context_chars: usize,
    pub min_sentence_chars: usize,
    pub dedup_threshold: f64,
    pub max_per_segment: usize,
    /// Cap on questions in one manifest. Unlimited when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_per_video: Option<usize>,
    pub support_min_secs: f64,
    pub support_fraction: f64,
    pub classify_content: bool,
}

impl Default for McqConfig {
    fn default() -> Self {
        let core = McqOptions::default();
        Self {
            min_context_chars: core.min_context_chars,
            min_sentence_chars: core.min_sentence_chars,
            dedup_threshold: core.dedup_threshold,
            max_per_segment: core.max_per_segment,
            max_per_video: None,
            support_min_secs: core.support_min_secs,
            support_fraction: core.support_fraction,
            classify_content: core.classify_content,
        }
    }
}

impl McqConfig {
    pub fn mcq_options(&self) -> McqOptions {
        McqOptions {
            min_context_chars: self.min_context_chars,
            min_sentence_chars: self.min_sentence_chars,
            dedup_threshold: self.dedup_threshold,
            max_per_segment: self.max_per_segment,
            support_min_secs: self.support_min_secs,
            support_fraction: self.support_fraction,
            classify_content: self.classify_content,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:7341".to_string(),
        }
    }
}

impl Config {
    /// Checks every value that the pipeline relies on.
    pub fn validate(&self) -> Result<()> {
        match self.logging.format.as_str() {
            "pretty" | "json" => {}
            other => bail!("logging.format must be 'pretty' or 'json', got '{}'", other),
        }

        self.segmentation
            .segment_options()
            .validate()
            .context("invalid [segmentation] settings")?;

        if !(self.segmentation.uniform_width_secs > 0.0) {
            bail!("segmentation.uniform_width_secs must be > 0");
        }
        if self.segmentation.default_language.trim().is_empty() {
            bail!("segmentation.default_language must not be empty");
        }

        let mcq = &self.mcq;
        if !(mcq.dedup_threshold > 0.0 && mcq.dedup_threshold <= 1.0) {
            bail!("mcq.dedup_threshold must be in (0.0, 1.0]");
        }
        if mcq.max_per_segment < 1 {
            bail!("mcq.max_per_segment must be >= 1");
        }
        if mcq.max_per_video == Some(0) {
            bail!("mcq.max_per_video must be >= 1 when set");
        }
        if !(0.0..=1.0).contains(&mcq.support_fraction) {
            bail!("mcq.support_fraction must be in [0.0, 1.0]");
        }
        if !(mcq.support_min_secs >= 0.0) {
            bail!("mcq.support_min_secs must be >= 0");
        }

        Ok(())
    }

    pub fn to_toml_pretty(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config as TOML")
    }
}

/// Reads and validates the config file at `path`, which must exist.
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    config.validate()?;
    Ok(config)
}

/// Loads an explicitly given config, or the default path when present,
/// or falls back to built-in defaults.
pub fn resolve_config(explicit: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit {
        return load_config(path);
    }
    let default_path = PathBuf::from(DEFAULT_CONFIG_PATH);
    if default_path.exists() {
        return load_config(&default_path);
    }
    Ok(Config::default())
}
