//! Structured logging with tracing
//!
//! Centralized logging setup on the tracing ecosystem: env-filter driven
//! levels, plain or JSON output and an optional daily rolling log file.

use std::ffi::OsStr;
use std::path::Path;

use tracing::{Level, debug, info, warn};
use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use vpm_domain::error::{Error, Result};

pub use crate::config::LoggingConfig;
use crate::constants::{DEFAULT_LOG_FILE_STEM, LOG_FILTER_ENV};

/// Initialize logging with the provided configuration
///
/// `VPM_LOG` overrides the configured level with a full filter directive.
/// Fails if a global subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let level = parse_log_level(&config.level)?;
    let filter =
        EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new(&config.level));

    let file_appender = config.file_output.as_ref().map(|path| {
        tracing_appender::rolling::daily(
            path.parent().unwrap_or_else(|| Path::new(".")),
            path.file_stem()
                .unwrap_or_else(|| OsStr::new(DEFAULT_LOG_FILE_STEM)),
        )
    });

    // Layer types differ per format, so each branch installs its own stack
    let installed = if config.json_format {
        let stdout = fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true);
        let registry = Registry::default().with(filter);
        if let Some(appender) = file_appender {
            let file = fmt::layer()
                .json()
                .with_writer(appender)
                .with_ansi(false)
                .with_target(true);
            registry.with(stdout).with(file).try_init()
        } else {
            registry.with(stdout).try_init()
        }
    } else {
        let stdout = fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true);
        let registry = Registry::default().with(filter);
        if let Some(appender) = file_appender {
            let file = fmt::layer()
                .with_writer(appender)
                .with_ansi(false)
                .with_target(true);
            registry.with(stdout).with(file).try_init()
        } else {
            registry.with(stdout).try_init()
        }
    };
    installed.map_err(|e| Error::config(format!("Failed to install logging subscriber: {e}")))?;

    info!("Logging initialized with level: {}", level);
    Ok(())
}

/// Parse log level string to tracing Level
pub fn parse_log_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" | "warning" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(Error::configuration(format!(
            "Invalid log level: {level}. Use trace, debug, info, warn, or error"
        ))),
    }
}

/// Log configuration loading status
pub fn log_config_loaded(config_path: &Path, success: bool) {
    if success {
        info!("Configuration loaded from {}", config_path.display());
    } else {
        warn!("Configuration file not found: {}", config_path.display());
    }
}

/// Log a health check result
pub fn log_health_check(component: &str, healthy: bool, details: Option<&str>) {
    if healthy {
        debug!(provider = component, "Health check passed");
    } else {
        warn!(
            provider = component,
            details = details.unwrap_or("Unknown failure"),
            "Health check failed"
        );
    }
}
