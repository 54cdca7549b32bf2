//! Domain Value Objects
//!
//! | Value Object | Description |
//! |--------------|-------------|
//! | [`VectorData`] | Stored vector with identifier and metadata |
//! | [`VectorQuery`] | Similarity query with top-K, threshold and filters |
//! | [`SearchResults`] | Ranked search hits |
//! | [`CollectionConfig`] / [`CollectionInfo`] | Collection descriptors |
//! | [`IndexConfig`] / [`IndexInfo`] | Index descriptors |
//! | [`HealthStatus`] | Backend health report |
//! | [`CostInfo`] / [`ProviderStats`] | Descriptive provider data |
//! | [`OperationContext`] | Cancellable execution context |
//! | [`Operation`] | Operation kind used for routing |

/// Collection and index descriptors
pub mod collection;
/// Cancellable execution context
pub mod context;
/// Health reports
pub mod health;
/// Operation kinds
pub mod operation;
/// Provider cost and stats
pub mod provider;
/// Vector payloads
pub mod vector;

pub use collection::{CollectionConfig, CollectionInfo, DistanceMetric, IndexConfig, IndexInfo};
pub use context::OperationContext;
pub use health::{HealthState, HealthStatus};
pub use operation::Operation;
pub use provider::{ConfigMap, CostInfo, ProviderInfo, ProviderStats};
pub use vector::{
    Metadata, SearchResults, SimilarityResult, VectorData, VectorQuery, filters_match,
};
