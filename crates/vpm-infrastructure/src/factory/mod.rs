//! Provider Factory
//!
//! Turns a `(type, settings)` pair into a validated, monitored backend.
//!
//! | Stage | Failure reported as |
//! |-------|---------------------|
//! | type lookup | `FactoryStage { stage: "type_lookup", .. }` wrapping `UnknownType` |
//! | validation | `FactoryStage { stage: "validation", .. }` wrapping the schema or trial-build error |
//! | construction | `FactoryStage { stage: "construction", .. }` wrapping the constructor error |

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde_json::json;
use tracing::{debug, warn};
use vpm_application::ports::registry::ProviderRegistry;
use vpm_domain::{VectorProvider, VectorProviderAdmin};
use vpm_domain::error::{Error, Result};
use vpm_domain::value_objects::{ConfigMap, Operation};

use crate::config::{FactoryConfig, ProviderConfig};
use crate::constants::{
    CHAIN_PROVIDER_TYPE, HYBRID_PROVIDER_TYPE, STAGE_CONSTRUCTION, STAGE_TYPE_LOOKUP,
    STAGE_VALIDATION, TIMEOUT_CONFIG_KEY,
};
use crate::monitoring::MonitoredProvider;
use crate::routing::{FallbackChain, FallbackPolicy, HybridRouter, HybridStrategy};

/// Builds monitored backend instances from the registry
#[derive(Clone)]
pub struct ProviderFactory {
    registry: Arc<ProviderRegistry>,
    config: FactoryConfig,
}

impl ProviderFactory {
    /// Factory over `registry` with the given behaviour
    pub fn new(registry: Arc<ProviderRegistry>, config: FactoryConfig) -> Self {
        Self { registry, config }
    }

    /// Registry backing this factory
    pub fn registry(&self) -> &Arc<ProviderRegistry> {
        &self.registry
    }

    /// Factory behaviour
    pub fn config(&self) -> &FactoryConfig {
        &self.config
    }

    /// Build one backend
    ///
    /// # Errors
    /// `FactoryStage` naming the failed stage.
    pub fn create(
        &self,
        provider_type: &str,
        settings: &ConfigMap,
    ) -> Result<Arc<MonitoredProvider>> {
        if !self.registry.contains(provider_type) {
            return Err(Error::factory_stage(
                STAGE_TYPE_LOOKUP,
                provider_type,
                Error::unknown_type(provider_type, self.registry.list_types()),
            ));
        }

        let config = if self.config.enable_auto_config {
            self.merged_config(provider_type, settings)
        } else {
            settings.clone()
        };

        if self.config.enable_validation {
            self.validate(provider_type, &config)
                .map_err(|e| Error::factory_stage(STAGE_VALIDATION, provider_type, e))?;
        }

        let provider = self
            .registry
            .create(provider_type, &config)
            .map_err(|e| Error::factory_stage(STAGE_CONSTRUCTION, provider_type, e))?;

        debug!(provider_type, provider = provider.name(), "Created provider");
        Ok(Arc::new(MonitoredProvider::new(provider)))
    }

    /// Build one backend from its registry defaults alone
    pub fn create_with_defaults(&self, provider_type: &str) -> Result<Arc<MonitoredProvider>> {
        self.create(provider_type, &self.registry.default_config(provider_type))
    }

    /// Configuration a backend of `provider_type` would receive
    ///
    /// Later entries win: built-in defaults, registry defaults, `settings`,
    /// then the factory's custom overrides for the type.
    pub fn merged_config(&self, provider_type: &str, settings: &ConfigMap) -> ConfigMap {
        let mut merged = ConfigMap::from([(
            TIMEOUT_CONFIG_KEY.to_string(),
            json!(self.config.default_timeout_secs),
        )]);
        merged.extend(self.registry.default_config(provider_type));
        merged.extend(settings.iter().map(|(k, v)| (k.clone(), v.clone())));
        if let Some(custom) = self.config.custom_configs.get(provider_type) {
            merged.extend(custom.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        merged
    }

    /// Schema check plus a discarded trial build
    fn validate(&self, provider_type: &str, config: &ConfigMap) -> Result<()> {
        self.registry.validate_config(provider_type, config)?;
        drop(self.registry.create(provider_type, config)?);
        Ok(())
    }

    /// Build a fallback chain, members in `specs` order
    ///
    /// Without fail-fast, members that cannot be built are skipped.
    pub fn create_chain(
        &self,
        specs: &[ProviderConfig],
        policy: FallbackPolicy,
    ) -> Result<FallbackChain> {
        let mut members: Vec<Arc<dyn VectorProvider>> = Vec::with_capacity(specs.len());
        for (index, spec) in specs.iter().enumerate() {
            match self.create(&spec.provider_type, &spec.settings) {
                Ok(provider) => members.push(provider),
                Err(e) if self.config.fail_fast => return Err(e),
                Err(e) => {
                    warn!(
                        index,
                        provider_type = %spec.provider_type,
                        error = %e,
                        "Skipping chain member that could not be created"
                    );
                }
            }
        }

        if members.is_empty() {
            return Err(Error::configuration_invalid(
                CHAIN_PROVIDER_TYPE,
                "no providers could be created",
            ));
        }
        Ok(FallbackChain::new(members).with_policy(policy))
    }

    /// Build a hybrid router over role-keyed members
    pub fn create_hybrid(
        &self,
        members: &BTreeMap<String, ProviderConfig>,
        strategy: HybridStrategy,
        routes: HashMap<Operation, String>,
    ) -> Result<HybridRouter> {
        let mut built: BTreeMap<String, Arc<dyn VectorProvider>> = BTreeMap::new();
        for (role, spec) in members {
            match self.create(&spec.provider_type, &spec.settings) {
                Ok(provider) => {
                    built.insert(role.clone(), provider);
                }
                Err(e) if self.config.fail_fast => return Err(e),
                Err(e) => {
                    warn!(
                        role = %role,
                        provider_type = %spec.provider_type,
                        error = %e,
                        "Skipping hybrid member that could not be created"
                    );
                }
            }
        }

        if built.is_empty() {
            return Err(Error::configuration_invalid(
                HYBRID_PROVIDER_TYPE,
                "no providers could be created",
            ));
        }
        // Routes to skipped members fall back to the first member
        let routes = routes
            .into_iter()
            .filter(|(_, role)| built.contains_key(role) || !members.contains_key(role))
            .collect();
        HybridRouter::new(built, strategy, routes)
    }
}
