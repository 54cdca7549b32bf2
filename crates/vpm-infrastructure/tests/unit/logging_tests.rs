//! Logging helper tests

use std::path::Path;

use tracing::Level;
use vpm_domain::error::Error;
use vpm_infrastructure::logging::{
    LoggingConfig, log_config_loaded, log_health_check, parse_log_level,
};

#[test]
fn test_parse_log_level() {
    assert_eq!(parse_log_level("trace").unwrap(), Level::TRACE);
    assert_eq!(parse_log_level("DEBUG").unwrap(), Level::DEBUG);
    assert_eq!(parse_log_level("info").unwrap(), Level::INFO);
    assert_eq!(parse_log_level("warning").unwrap(), Level::WARN);
    assert_eq!(parse_log_level("error").unwrap(), Level::ERROR);
}

#[test]
fn test_parse_log_level_rejects_unknown() {
    let err = parse_log_level("verbose").unwrap_err();

    assert!(matches!(err, Error::Configuration { .. }));
    assert!(err.to_string().contains("verbose"));
}

#[test]
fn test_default_logging_config() {
    let config = LoggingConfig::default();

    assert_eq!(config.level, "info");
    assert!(!config.json_format);
    assert!(config.file_output.is_none());
}

#[test]
fn test_log_helpers_without_subscriber() {
    log_config_loaded(Path::new("vpm.toml"), true);
    log_config_loaded(Path::new("missing.toml"), false);
    log_health_check("primary", true, None);
    log_health_check("primary", false, Some("connection refused"));
}
