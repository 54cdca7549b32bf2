//! Provider manager configuration types

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use vpm_domain::value_objects::ConfigMap;

use super::factory::FactoryConfig;
use crate::constants::{DEFAULT_FALLBACK_HISTORY_LIMIT, DEFAULT_HEALTH_CHECK_INTERVAL_SECS};
use crate::routing::{FallbackPolicy, HybridStrategy};

/// One named backend instance
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProviderConfig {
    /// Registered type identifier (`memory`, `null`, ...)
    #[serde(rename = "type", alias = "provider_type")]
    pub provider_type: String,

    /// Free-form settings handed to the factory
    #[serde(default)]
    pub settings: ConfigMap,
}

impl ProviderConfig {
    /// Instance of `provider_type` with no settings
    pub fn new<S: Into<String>>(provider_type: S) -> Self {
        Self {
            provider_type: provider_type.into(),
            settings: ConfigMap::new(),
        }
    }

    /// Add a setting
    pub fn with_setting<K: Into<String>, V: Into<serde_json::Value>>(
        mut self,
        key: K,
        value: V,
    ) -> Self {
        self.settings.insert(key.into(), value.into());
        self
    }
}

/// Fallback chain over named instances
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    /// Instance names in attempt order; empty disables the chain
    pub providers: Vec<String>,
    /// Whether failed members are retried on later calls
    pub policy: FallbackPolicy,
    /// Maximum number of fallback attempt records kept
    pub history_limit: usize,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            providers: Vec::new(),
            policy: FallbackPolicy::default(),
            history_limit: DEFAULT_FALLBACK_HISTORY_LIMIT,
        }
    }
}

/// Hybrid router over role-keyed instances
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HybridConfig {
    /// Member selection strategy
    #[serde(default)]
    pub strategy: HybridStrategy,
    /// Role to instance name
    #[serde(default)]
    pub members: BTreeMap<String, String>,
    /// Operation kind to role, used by the operation-based strategy
    #[serde(default)]
    pub routes: HashMap<String, String>,
}

/// Periodic health polling
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthCheckConfig {
    /// Run the background health task
    pub enabled: bool,
    /// Seconds between polls
    pub interval_secs: u64,
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: DEFAULT_HEALTH_CHECK_INTERVAL_SECS,
        }
    }
}

/// Provider manager configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerConfig {
    /// Instance to activate at startup; automatic selection when unset
    pub active_provider: Option<String>,
    /// Named backend instances
    pub providers: HashMap<String, ProviderConfig>,
    /// Fallback chain settings
    pub fallback: FallbackConfig,
    /// Hybrid router settings
    pub hybrid: Option<HybridConfig>,
    /// Health polling settings
    pub health: HealthCheckConfig,
    /// Factory behaviour
    pub factory: FactoryConfig,
}
