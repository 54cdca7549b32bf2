//! Provider Registry System
//!
//! Backend registration using linkme distributed slices for compile-time
//! discovery, plus runtime registration on an explicit registry object.
//!
//! ## Registering a built-in backend
//!
//! ```ignore
//! use vpm_application::ports::registry::{VectorProviderEntry, VECTOR_PROVIDERS};
//!
//! #[linkme::distributed_slice(VECTOR_PROVIDERS)]
//! static MEMORY_PROVIDER: VectorProviderEntry = VectorProviderEntry {
//!     name: "memory",
//!     description: "In-memory vector store",
//!     descriptor: memory_descriptor,
//!     factory: memory_factory,
//! };
//! ```
//!
//! ## Registering at runtime
//!
//! ```ignore
//! let registry = ProviderRegistry::new();
//! registry.register(ProviderDescriptor::new("custom"), Arc::new(|config| build(config)))?;
//! let provider = registry.create("custom", &ConfigMap::new())?;
//! ```

/// Static descriptors, schemas and requirements
pub mod descriptor;
/// Registry object and linkme slice
pub mod vector_provider;

pub use descriptor::{
    ConfigField, ConfigSchema, ConfigValueKind, ProviderDescriptor, ProviderRequirements,
};
pub use vector_provider::{
    ProviderConstructor, ProviderRegistry, RegistryStatistics, VECTOR_PROVIDERS,
    VectorProviderEntry, list_builtin_providers,
};
