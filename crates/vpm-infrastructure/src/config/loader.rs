//! Configuration loader
//!
//! Loads [`AppConfig`] from defaults, a TOML file and `VPM_`-prefixed
//! environment variables, then validates cross references.

use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use vpm_domain::error::{Error, Result};
use vpm_domain::value_objects::Operation;

use crate::config::{
    AppConfig, FactoryConfig, FallbackConfig, HealthCheckConfig, HybridConfig, LoggingConfig,
    ProviderConfig,
};
use crate::constants::{
    CONFIG_ENV_PREFIX, CONFIG_ENV_SEPARATOR, DEFAULT_CONFIG_DIR, DEFAULT_CONFIG_FILENAME,
};
use crate::error_ext::ErrorContext;
use crate::logging::log_config_loaded;

/// Configuration loader service
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Configuration file path
    config_path: Option<PathBuf>,

    /// Environment prefix, without the trailing underscore
    env_prefix: String,
}

impl ConfigLoader {
    /// Create a new configuration loader with default settings
    pub fn new() -> Self {
        Self {
            config_path: None,
            env_prefix: CONFIG_ENV_PREFIX.to_string(),
        }
    }

    /// Set the configuration file path
    pub fn with_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the environment variable prefix
    pub fn with_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Load configuration from all sources
    ///
    /// Later sources override earlier ones:
    /// 1. `AppConfig::default()`
    /// 2. TOML file (explicit path, else `vpm.toml` discovered on disk)
    /// 3. Environment, nested keys split on `__`
    ///    (e.g. `VPM_MANAGER__HEALTH__INTERVAL_SECS=10`)
    pub fn load(&self) -> Result<AppConfig> {
        let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));

        match &self.config_path {
            Some(config_path) if config_path.exists() => {
                figment = figment.merge(Toml::file(config_path));
                log_config_loaded(config_path, true);
            }
            Some(config_path) => log_config_loaded(config_path, false),
            None => {
                if let Some(default_path) = Self::find_default_config_path() {
                    figment = figment.merge(Toml::file(&default_path));
                    log_config_loaded(&default_path, true);
                }
            }
        }

        figment = figment.merge(
            Env::prefixed(&format!("{}_", self.env_prefix)).split(CONFIG_ENV_SEPARATOR),
        );

        let app_config: AppConfig = figment
            .extract()
            .config_context("Failed to extract configuration")?;

        validate_app_config(&app_config)?;

        Ok(app_config)
    }

    /// Reload configuration from the same sources
    pub fn reload(&self) -> Result<AppConfig> {
        self.load()
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, config: &AppConfig, path: P) -> Result<()> {
        let toml_string =
            toml::to_string_pretty(config).config_context("Failed to serialize config to TOML")?;

        std::fs::write(path.as_ref(), toml_string).io_context(format!(
            "Failed to write config file {}",
            path.as_ref().display()
        ))?;

        Ok(())
    }

    /// Get the current configuration file path
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// First existing default location
    fn find_default_config_path() -> Option<PathBuf> {
        let current_dir = env::current_dir().ok()?;

        let mut candidates = vec![
            current_dir.join(DEFAULT_CONFIG_FILENAME),
            current_dir
                .join(DEFAULT_CONFIG_DIR)
                .join(DEFAULT_CONFIG_FILENAME),
        ];
        if let Some(config_dir) = dirs::config_dir() {
            candidates.push(config_dir.join(DEFAULT_CONFIG_DIR).join(DEFAULT_CONFIG_FILENAME));
        }

        candidates.into_iter().find(|path| path.exists())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate application configuration
///
/// Checks that every name the manager section refers to is configured.
pub fn validate_app_config(config: &AppConfig) -> Result<()> {
    let manager = &config.manager;
    validate_provider_types(&manager.providers)?;
    validate_active_provider(manager.active_provider.as_deref(), &manager.providers)?;
    validate_fallback_config(&manager.fallback, &manager.providers)?;
    if let Some(hybrid) = &manager.hybrid {
        validate_hybrid_config(hybrid, &manager.providers)?;
    }
    validate_health_config(&manager.health)?;
    Ok(())
}

fn validate_provider_types(providers: &HashMap<String, ProviderConfig>) -> Result<()> {
    if let Some((name, _)) = providers
        .iter()
        .find(|(_, provider)| provider.provider_type.trim().is_empty())
    {
        return Err(Error::configuration(format!(
            "Provider '{name}' has an empty type"
        )));
    }
    Ok(())
}

fn validate_active_provider(
    active: Option<&str>,
    providers: &HashMap<String, ProviderConfig>,
) -> Result<()> {
    match active {
        Some(name) if !providers.contains_key(name) => Err(Error::configuration(format!(
            "Active provider '{name}' is not configured"
        ))),
        _ => Ok(()),
    }
}

fn validate_fallback_config(
    fallback: &FallbackConfig,
    providers: &HashMap<String, ProviderConfig>,
) -> Result<()> {
    if let Some(name) = fallback
        .providers
        .iter()
        .find(|name| !providers.contains_key(name.as_str()))
    {
        return Err(Error::configuration(format!(
            "Fallback provider '{name}' is not configured"
        )));
    }
    if !fallback.providers.is_empty() && fallback.history_limit == 0 {
        return Err(Error::configuration(
            "Fallback history limit cannot be 0 when a fallback chain is configured",
        ));
    }
    Ok(())
}

fn validate_hybrid_config(
    hybrid: &HybridConfig,
    providers: &HashMap<String, ProviderConfig>,
) -> Result<()> {
    if hybrid.members.is_empty() {
        return Err(Error::configuration("Hybrid router has no members"));
    }
    if let Some((role, name)) = hybrid
        .members
        .iter()
        .find(|(_, name)| !providers.contains_key(name.as_str()))
    {
        return Err(Error::configuration(format!(
            "Hybrid member '{role}' refers to unknown provider '{name}'"
        )));
    }
    for (operation, role) in &hybrid.routes {
        operation.parse::<Operation>().map_err(|_| {
            Error::configuration(format!("Hybrid route uses unknown operation '{operation}'"))
        })?;
        if !hybrid.members.contains_key(role) {
            return Err(Error::configuration(format!(
                "Hybrid route '{operation}' refers to unknown role '{role}'"
            )));
        }
    }
    Ok(())
}

fn validate_health_config(health: &HealthCheckConfig) -> Result<()> {
    if health.enabled && health.interval_secs == 0 {
        return Err(Error::configuration(
            "Health check interval cannot be 0 when health checks are enabled",
        ));
    }
    Ok(())
}

/// Configuration builder for programmatic configuration
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    config: AppConfig,
}

impl ConfigBuilder {
    /// Create a new configuration builder with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set logging configuration
    pub fn with_logging(mut self, logging: LoggingConfig) -> Self {
        self.config.logging = logging;
        self
    }

    /// Add a named backend instance
    pub fn with_provider<S: Into<String>>(mut self, name: S, provider: ProviderConfig) -> Self {
        self.config.manager.providers.insert(name.into(), provider);
        self
    }

    /// Activate the named instance at startup
    pub fn with_active_provider<S: Into<String>>(mut self, name: S) -> Self {
        self.config.manager.active_provider = Some(name.into());
        self
    }

    /// Set the fallback chain
    pub fn with_fallback(mut self, fallback: FallbackConfig) -> Self {
        self.config.manager.fallback = fallback;
        self
    }

    /// Set the hybrid router
    pub fn with_hybrid(mut self, hybrid: HybridConfig) -> Self {
        self.config.manager.hybrid = Some(hybrid);
        self
    }

    /// Set health polling
    pub fn with_health(mut self, health: HealthCheckConfig) -> Self {
        self.config.manager.health = health;
        self
    }

    /// Set factory behaviour
    pub fn with_factory(mut self, factory: FactoryConfig) -> Self {
        self.config.manager.factory = factory;
        self
    }

    /// Build the configuration
    pub fn build(self) -> AppConfig {
        self.config
    }

    /// Build and validate the configuration
    pub fn try_build(self) -> Result<AppConfig> {
        validate_app_config(&self.config)?;
        Ok(self.config)
    }
}
