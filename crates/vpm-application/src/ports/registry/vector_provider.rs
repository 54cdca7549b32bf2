//! Vector Provider Registry
//!
//! Catalog mapping a backend type identifier to its static descriptor and
//! constructor. Built-in backends submit a [`VectorProviderEntry`] into the
//! [`VECTOR_PROVIDERS`] distributed slice at compile time;
//! [`ProviderRegistry::with_builtin`] loads them. Other backends are added at
//! runtime through [`ProviderRegistry::register`].

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use vpm_domain::error::{Error, Result};
use vpm_domain::ports::providers::VectorProvider;
use vpm_domain::value_objects::ConfigMap;

use super::descriptor::{ProviderDescriptor, ProviderRequirements};

/// Constructor building a backend from its merged configuration
pub type ProviderConstructor =
    Arc<dyn Fn(&ConfigMap) -> Result<Arc<dyn VectorProvider>> + Send + Sync>;

/// Registry entry for compiled-in vector providers
///
/// Each built-in backend registers itself with this entry using
/// `#[linkme::distributed_slice(VECTOR_PROVIDERS)]`.
pub struct VectorProviderEntry {
    /// Unique type identifier (e.g. "memory", "null")
    pub name: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Static descriptor of the type
    pub descriptor: fn() -> ProviderDescriptor,
    /// Factory function to create a provider instance
    pub factory: fn(&ConfigMap) -> Result<Arc<dyn VectorProvider>>,
}

// Auto-collection via linkme distributed slices - providers submit entries at compile time
#[linkme::distributed_slice]
pub static VECTOR_PROVIDERS: [VectorProviderEntry] = [..];

/// List all compiled-in vector providers as (name, description) tuples
pub fn list_builtin_providers() -> Vec<(&'static str, &'static str)> {
    VECTOR_PROVIDERS
        .iter()
        .map(|e| (e.name, e.description))
        .collect()
}

/// Aggregate counts over registered types
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistryStatistics {
    /// Registered types
    pub total: usize,
    /// Cloud types
    pub cloud: usize,
    /// Local types
    pub local: usize,
    /// Types per category
    pub by_category: HashMap<String, usize>,
}

#[derive(Clone)]
struct Registration {
    descriptor: Arc<ProviderDescriptor>,
    constructor: ProviderConstructor,
}

static GLOBAL_REGISTRY: LazyLock<Arc<ProviderRegistry>> =
    LazyLock::new(|| Arc::new(ProviderRegistry::with_builtin()));

/// Backend type registry
///
/// Safe for concurrent use; registration and lookup never hold a lock
/// while a constructor runs.
#[derive(Default)]
pub struct ProviderRegistry {
    registrations: DashMap<String, Registration>,
}

impl ProviderRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-loaded with every compiled-in backend
    pub fn with_builtin() -> Self {
        let registry = Self::new();
        for entry in VECTOR_PROVIDERS {
            let factory = entry.factory;
            if let Err(e) = registry.register((entry.descriptor)(), Arc::new(factory)) {
                warn!(provider_type = entry.name, error = %e, "Skipping built-in provider");
            }
        }
        registry
    }

    /// Process-wide default registry, built lazily on first use
    ///
    /// Prefer an owned registry where the assembling code can pass one.
    pub fn global() -> Arc<Self> {
        Arc::clone(&GLOBAL_REGISTRY)
    }

    /// Register a backend type
    ///
    /// # Errors
    /// `DuplicateType` when the type is already registered; the existing
    /// registration is left untouched.
    pub fn register(
        &self,
        descriptor: ProviderDescriptor,
        constructor: ProviderConstructor,
    ) -> Result<()> {
        match self.registrations.entry(descriptor.provider_type.clone()) {
            Entry::Occupied(_) => Err(Error::duplicate_type(descriptor.provider_type)),
            Entry::Vacant(slot) => {
                debug!(provider_type = %descriptor.provider_type, "Registered provider type");
                slot.insert(Registration {
                    descriptor: Arc::new(descriptor),
                    constructor,
                });
                Ok(())
            }
        }
    }

    /// Remove a backend type
    pub fn unregister(&self, provider_type: &str) -> Result<()> {
        if self.registrations.remove(provider_type).is_none() {
            return Err(self.unknown(provider_type));
        }
        debug!(provider_type, "Unregistered provider type");
        Ok(())
    }

    /// Whether a type is registered
    pub fn contains(&self, provider_type: &str) -> bool {
        self.registrations.contains_key(provider_type)
    }

    /// Construct a backend of the given type
    ///
    /// The constructor's own error is returned unchanged.
    pub fn create(&self, provider_type: &str, config: &ConfigMap) -> Result<Arc<dyn VectorProvider>> {
        let constructor = self
            .registrations
            .get(provider_type)
            .map(|r| Arc::clone(&r.constructor))
            .ok_or_else(|| self.unknown(provider_type))?;
        constructor(config)
    }

    /// Canned configuration for the type; empty for unknown types
    pub fn default_config(&self, provider_type: &str) -> ConfigMap {
        self.registrations
            .get(provider_type)
            .map(|r| r.descriptor.default_config.clone())
            .unwrap_or_default()
    }

    /// Static descriptor of a type
    pub fn descriptor(&self, provider_type: &str) -> Result<Arc<ProviderDescriptor>> {
        self.registrations
            .get(provider_type)
            .map(|r| Arc::clone(&r.descriptor))
            .ok_or_else(|| self.unknown(provider_type))
    }

    /// Check a configuration map against the type's schema
    pub fn validate_config(&self, provider_type: &str, config: &ConfigMap) -> Result<()> {
        self.descriptor(provider_type)?
            .schema
            .validate(provider_type, config)
    }

    /// Registered type identifiers, sorted
    pub fn list_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.registrations.iter().map(|r| r.key().clone()).collect();
        types.sort();
        types
    }

    /// Descriptors of every registered type, sorted by type
    pub fn descriptors(&self) -> Vec<Arc<ProviderDescriptor>> {
        let mut descriptors: Vec<_> = self
            .registrations
            .iter()
            .map(|r| Arc::clone(&r.descriptor))
            .collect();
        descriptors.sort_by(|a, b| a.provider_type.cmp(&b.provider_type));
        descriptors
    }

    /// Types whose descriptor satisfies `requirements`, sorted
    ///
    /// Reads static descriptors only; no backend is constructed.
    pub fn compatible_types(&self, requirements: &ProviderRequirements) -> Vec<String> {
        self.descriptors()
            .into_iter()
            .filter(|d| d.satisfies(requirements))
            .map(|d| d.provider_type.clone())
            .collect()
    }

    /// Counts by cloud flag and category
    pub fn statistics(&self) -> RegistryStatistics {
        let mut stats = RegistryStatistics::default();
        for registration in &self.registrations {
            let descriptor = &registration.descriptor;
            stats.total += 1;
            if descriptor.is_cloud {
                stats.cloud += 1;
            } else {
                stats.local += 1;
            }
            *stats
                .by_category
                .entry(descriptor.category.clone())
                .or_default() += 1;
        }
        stats
    }

    fn unknown(&self, provider_type: &str) -> Error {
        Error::unknown_type(provider_type, self.list_types())
    }
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("types", &self.list_types())
            .finish()
    }
}
