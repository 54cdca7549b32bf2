//! Factory configuration types

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use vpm_domain::value_objects::ConfigMap;

use crate::constants::DEFAULT_PROVIDER_TIMEOUT_SECS;

/// Behaviour switches for the provider factory
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FactoryConfig {
    /// Check merged configuration against the descriptor schema and a trial build
    pub enable_validation: bool,

    /// Merge built-in, registry and custom defaults around caller settings
    pub enable_auto_config: bool,

    /// Abort chain/hybrid assembly on the first backend failure
    pub fail_fast: bool,

    /// `timeout_secs` injected into every auto-configured backend
    pub default_timeout_secs: u64,

    /// Per-type overrides applied last
    pub custom_configs: HashMap<String, ConfigMap>,

    /// Type identifiers preferred by callers choosing among compatible types
    pub preferred_providers: Vec<String>,
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self {
            enable_validation: true,
            enable_auto_config: true,
            fail_fast: true,
            default_timeout_secs: DEFAULT_PROVIDER_TIMEOUT_SECS,
            custom_configs: HashMap::new(),
            preferred_providers: Vec::new(),
        }
    }
}
