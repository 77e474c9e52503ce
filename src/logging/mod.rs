//! Structured logging for the HoneyFarm core
//!
//! File-based logging with daily rotation plus a compact console layer.
//! Logs are written to the platform config directory under `honeyfarm/logs`.

pub mod macros;

use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the logging system
///
/// Creates the log directory and sets up daily rotating log files.
///
/// Set `RUST_LOG` to control the level (`info` by default):
/// - `RUST_LOG=debug` for debug level
/// - `RUST_LOG=trace` for trace level
pub fn init_logging() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let log_dir = get_log_directory()?;

    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "honeyfarm.log");

    // Console layer (stderr)
    let console_layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(true)
        .with_line_number(true)
        .compact();

    // File layer, JSON for easier parsing, no ANSI colors
    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .with_file(true)
        .json();

    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    let init_result = tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init();

    if let Err(e) = init_result {
        // Avoid panicking when another subsystem/test already installed a
        // global subscriber.
        if e.to_string().contains("already been set") {
            return Ok(log_dir);
        }
        return Err(Box::new(e));
    }

    tracing::info!("Logging initialized. Log directory: {}", log_dir.display());

    Ok(log_dir)
}

/// Get log directory path
///
/// Returns: `%APPDATA%/honeyfarm/logs` on Windows,
///          `~/.config/honeyfarm/logs` on Linux/macOS
fn get_log_directory() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let base_dir = if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .ok_or("Could not find APPDATA directory")?
            .join("honeyfarm")
    } else {
        dirs::config_dir()
            .ok_or("Could not find config directory")?
            .join("honeyfarm")
    };

    Ok(base_dir.join("logs"))
}

/// Get current log file path (for display)
pub fn get_current_log_file() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let log_dir = get_log_directory()?;
    let today = chrono::Local::now().format("%Y-%m-%d").to_string();
    Ok(log_dir.join(format!("honeyfarm.log.{}", today)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_directory_path() {
        let log_dir = get_log_directory().expect("Should get log directory");
        assert!(log_dir.to_string_lossy().contains("honeyfarm"));
        assert!(log_dir.to_string_lossy().contains("logs"));
    }
}
