//! Logging setup for the tidysheet binary.
//!
//! Events go to the console and to a daily-rotated file in the app data
//! directory. The library itself only emits `tracing` events; installing a
//! subscriber is left to the binary (or to the embedding application).
//!
//! ```no_run
//! tidysheet::logging::init(0).expect("Failed to initialize logging");
//! tracing::info!("ready");
//! ```

use anyhow::{Context as _, Result};
use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    EnvFilter, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _,
};

/// Gets the log directory path based on platform conventions
///
/// Returns:
/// - Windows: `%APPDATA%/tidysheet/logs`
/// - macOS: `~/Library/Application Support/tidysheet/logs`
/// - Linux: `~/.local/share/tidysheet/logs`
pub fn get_log_dir() -> Result<PathBuf> {
    let base_dir = dirs::data_dir().context("Failed to determine data directory")?;
    let log_dir = base_dir.join("tidysheet").join("logs");

    if !log_dir.exists() {
        std::fs::create_dir_all(&log_dir)
            .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;
    }

    Ok(log_dir)
}

/// Default filter directive for a `-v` count.
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// Initializes console and rolling-file logging.
///
/// `RUST_LOG` overrides the level picked from `verbosity`.
///
/// # Errors
///
/// Returns error if the log directory or file appender cannot be created,
/// or a global subscriber is already installed.
pub fn init(verbosity: u8) -> Result<()> {
    let log_dir = get_log_dir()?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .max_log_files(10)
        .filename_prefix("tidysheet")
        .filename_suffix("log")
        .build(&log_dir)
        .context("Failed to create file appender")?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive(verbosity)))
        .context("Failed to create env filter")?;

    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let file_layer = fmt::layer()
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_ansi(false)
        .with_writer(file_appender);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    tracing::debug!("Logging initialized, log directory: {}", log_dir.display());

    Ok(())
}
