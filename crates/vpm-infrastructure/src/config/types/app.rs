//! Main application configuration

use serde::{Deserialize, Serialize};

use super::logging::LoggingConfig;
use super::manager::ManagerConfig;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Provider manager configuration
    #[serde(default)]
    pub manager: ManagerConfig,
}
