//! Tracing subscriber setup.
//!
//! Diagnostics go to stderr through `tracing`; stdout is reserved for
//! command output so it can be piped. `RUST_LOG` takes precedence over the
//! level from the CLI or config.

use anyhow::Result;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingConfig;

pub fn init_tracing(logging: &LoggingConfig, cli_override_level: Option<&str>) -> Result<()> {
    let level = cli_override_level.unwrap_or(logging.level.as_str());
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    // A global subscriber may already be installed.
    let installed = if logging.format == "json" {
        builder.json().try_init()
    } else {
        builder.pretty().try_init()
    };
    if installed.is_err() {
        return Ok(());
    }

    tracing::debug!(
        level = level,
        format = logging.format.as_str(),
        "logging initialized"
    );

    Ok(())
}
