//! # Vector Provider Manager - Reference Provider Implementations
//!
//! Backends shipped with the workspace. Each implements the capability
//! contract defined in `vpm-domain` and registers itself into the
//! `VECTOR_PROVIDERS` slice declared in `vpm-application`.
//!
//! | Type | Provider | Description |
//! |------|----------|-------------|
//! | `memory` | [`InMemoryVectorProvider`] | Full-featured, non-persistent store |
//! | `null` | [`NullVectorProvider`] | Accepts everything, stores nothing |
//!
//! Remote backends (Milvus, Qdrant, Pinecone, ...) live in their own crates
//! and register through `ProviderRegistry::register`.
//!
//! ## Feature Flags
//!
//! ```toml
//! [dependencies]
//! vpm-providers = { version = "0.1", default-features = false, features = ["provider-memory"] }
//! ```

pub use vpm_domain::error::{Error, Result};
pub use vpm_domain::ports::providers::{VectorProvider, VectorProviderAdmin};

/// Provider-specific constants
pub mod constants;

/// Shared utilities for provider implementations
pub mod utils;

/// Vector provider implementations
pub mod vector_provider;

#[cfg(feature = "provider-memory")]
pub use vector_provider::InMemoryVectorProvider;
#[cfg(feature = "provider-null")]
pub use vector_provider::NullVectorProvider;
