use crate::config::Config;
use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

pub const LOG_FILE: &str = "ni.log";

pub fn log_dir() -> Result<PathBuf> {
    let base = dirs::cache_dir().context("Could not determine cache directory")?;
    Ok(base.join("ni"))
}

/// Sends `tracing` output to the log file. The screen belongs to the editor
/// while it runs, so nothing is logged to stdout or stderr.
pub fn init(config: &Config) -> Result<()> {
    let dir = log_dir()?;
    fs::create_dir_all(&dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(tracing_appender::rolling::never(&dir, LOG_FILE))
        .with_ansi(false)
        .try_init()
        .map_err(|err| anyhow::anyhow!("Failed to install logger: {err}"))?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "logging to {}", dir.join(LOG_FILE).display());
    Ok(())
}
