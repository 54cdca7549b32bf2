//! # Vector Provider Manager
//!
//! One façade over interchangeable vector-store backends.
//!
//! This crate provides the main public API. It re-exports the layers below
//! and links the built-in backends so the global registry knows them.
//!
//! ## Features
//!
//! - **Registry**: backends discovered from static descriptors, never built to be inspected
//! - **Factory**: merged defaults, schema validation and a monitoring wrapper for every instance
//! - **Fallback Chain**: ordered members tried until one succeeds
//! - **Hybrid Router**: role-keyed members selected per call
//! - **Provider Manager**: named instances, health polling and hot switching
//!
//! ## Example
//!
//! ```ignore
//! use vpm::{ConfigLoader, OperationContext, VectorData, bootstrap};
//!
//! let config = ConfigLoader::new().with_config_path("vpm.toml").load()?;
//! let ctx = OperationContext::new();
//! let manager = bootstrap(&config, &ctx).await?;
//! manager.store(&ctx, &[VectorData::new("doc-1", vec![0.1, 0.9])]).await?;
//! manager.shutdown(&ctx).await?;
//! ```
//!
//! ## Architecture
//!
//! - `domain` - capability contract, value objects and errors
//! - `application` - backend registry and descriptors
//! - `providers` - reference backends (`memory`, `null`)
//! - `infrastructure` - factory, monitoring, routing, manager, config and logging

// Force-link vpm-providers to ensure linkme inventory registrations are included
extern crate vpm_providers;

/// Domain layer - capability contract and data model
///
/// Re-exports from the domain crate for convenience
pub mod domain {
    pub use vpm_domain::*;
}

/// Application layer - backend registry
///
/// Re-exports from the application crate for convenience
pub mod application {
    pub use vpm_application::*;
}

/// Reference backends
///
/// Re-exports from the providers crate for convenience
pub mod providers {
    pub use vpm_providers::*;
}

/// Infrastructure layer - factory, routing, manager, config and logging
///
/// Re-exports from the infrastructure crate for convenience
pub mod infrastructure {
    pub use vpm_infrastructure::*;
}

// Re-export commonly used domain types at the crate root
pub use domain::*;

pub use domain::error::Result;
pub use domain::value_objects::OperationContext;

pub use application::registry::{ProviderDescriptor, ProviderRegistry, ProviderRequirements};
pub use infrastructure::config::{
    AppConfig, ConfigBuilder, ConfigLoader, FactoryConfig, FallbackConfig, HealthCheckConfig,
    HybridConfig, LoggingConfig, ManagerConfig, ProviderConfig,
};
pub use infrastructure::logging::init_logging;
pub use infrastructure::manager::{ManagerPhase, ProviderManager};
pub use infrastructure::{
    FallbackChain, FallbackPolicy, HybridRouter, HybridStrategy, MonitoredProvider,
    ProviderFactory, ProviderMetrics,
};

/// Install logging from `config` and bring up a manager over the global
/// registry
///
/// # Errors
/// `Config` when a global subscriber is already installed, otherwise
/// whatever [`ProviderManager::initialize`] returns.
pub async fn bootstrap(config: &AppConfig, ctx: &OperationContext) -> Result<ProviderManager> {
    init_logging(&config.logging)?;
    let manager = ProviderManager::with_global_registry(config.manager.clone());
    manager.initialize(ctx).await?;
    Ok(manager)
}
