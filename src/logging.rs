//! File-based tracing setup. The terminal belongs to the TUI, so events go to
//! `<data_dir>/logs/kancli.log`.

use anyhow::{Context, Result};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::GlobalConfig;

/// Environment variable overriding the configured log filter
pub const LOG_ENV: &str = "KANCLI_LOG";

pub const LOG_FILE: &str = "kancli.log";

/// Build the filter from KANCLI_LOG, falling back to the configured level
pub fn build_filter(config: &GlobalConfig) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber writing into `log_dir`.
///
/// The returned guard flushes pending events when dropped; keep it alive
/// until the program exits.
pub fn init(config: &GlobalConfig, log_dir: &Path) -> Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory {:?}", log_dir))?;

    let appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(build_filter(config))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(false),
        )
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(guard)
}
