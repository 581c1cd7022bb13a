//! Unified logging setup for the bridge services
//!
//! Console logging with an optional daily-rolling file output. The
//! console level comes from the CLI, overridable via `RUST_LOG`; the file
//! layer captures everything at its own fixed level.

use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

use crate::error::{BridgeError, Result};

// Guards keep the non-blocking file writers alive for the process lifetime.
static GUARDS: OnceLock<Mutex<Vec<WorkerGuard>>> = OnceLock::new();

fn guards() -> &'static Mutex<Vec<WorkerGuard>> {
    GUARDS.get_or_init(|| Mutex::new(Vec::new()))
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Service name, used as the log file stem
    pub service_name: String,
    /// Directory for rolling log files
    pub log_dir: PathBuf,
    /// Console log level
    pub console_level: Level,
    /// File log level
    pub file_level: Level,
    /// Whether to write rolling log files at all
    pub enable_file: bool,
    /// Whether the console output uses ANSI colors
    pub ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            service_name: "service".to_string(),
            log_dir: PathBuf::from("logs"),
            console_level: Level::INFO,
            file_level: Level::DEBUG,
            enable_file: false,
            ansi: true,
        }
    }
}

/// Parse a log level name, falling back to `info` for unknown values
pub fn parse_level(name: &str) -> Level {
    match name.to_ascii_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Initialize the global subscriber from a [`LogConfig`]
///
/// Must be called once, early in service bootstrap. A second call fails
/// with a configuration error.
pub fn init_with_config(config: LogConfig) -> Result<()> {
    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.console_level.to_string()));
    let console_layer = fmt::layer()
        .with_ansi(config.ansi)
        .with_target(false)
        .with_filter(console_filter);

    let registry = tracing_subscriber::registry().with(console_layer);

    if config.enable_file {
        fs::create_dir_all(&config.log_dir).map_err(|e| {
            BridgeError::config(format!(
                "failed to create log directory {}: {}",
                config.log_dir.display(),
                e
            ))
        })?;
        let appender = tracing_appender::rolling::daily(
            &config.log_dir,
            format!("{}.log", config.service_name),
        );
        let (writer, guard) = tracing_appender::non_blocking(appender);
        guards()
            .lock()
            .map_err(|_| BridgeError::Internal("log guard mutex poisoned".to_string()))?
            .push(guard);

        let file_layer = fmt::layer()
            .with_ansi(false)
            .with_target(false)
            .with_writer(writer)
            .with_filter(LevelFilter::from_level(config.file_level));

        registry
            .with(file_layer)
            .try_init()
            .map_err(|e| BridgeError::config(format!("failed to init logging: {}", e)))?;
    } else {
        registry
            .try_init()
            .map_err(|e| BridgeError::config(format!("failed to init logging: {}", e)))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("trace"), Level::TRACE);
        assert_eq!(parse_level("DEBUG"), Level::DEBUG);
        assert_eq!(parse_level("warning"), Level::WARN);
        assert_eq!(parse_level("bogus"), Level::INFO);
    }
}
