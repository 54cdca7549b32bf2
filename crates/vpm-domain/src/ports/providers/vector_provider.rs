//! Vector Provider Port
//!
//! The capability contract every backend satisfies. The orchestration layer
//! (registry, factory, monitoring, chain, hybrid router, manager) only ever
//! talks to backends through these two traits.
//!
//! ## Split
//!
//! | Trait | Operations |
//! |-------|------------|
//! | [`VectorProviderAdmin`] | lifecycle, health, stats, optimize, backup/restore, descriptive metadata |
//! | [`VectorProvider`] | data, search, collection, index and metadata operations |
//!
//! Every async operation takes an [`OperationContext`]. Callers cancel
//! through it; the orchestration layer never adds a timeout of its own.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;

use crate::error::Result;
use crate::value_objects::{
    CollectionConfig, CollectionInfo, ConfigMap, CostInfo, HealthStatus, IndexConfig, IndexInfo,
    Metadata, OperationContext, ProviderStats, SearchResults, SimilarityResult, VectorData,
    VectorQuery,
};

/// Administrative half of the capability contract
///
/// Lifecycle runs `initialize` → `start` → (`health`/`get_stats`)* → `stop`.
/// Descriptive methods are synchronous and side-effect free.
#[async_trait]
pub trait VectorProviderAdmin: Send + Sync {
    /// Apply configuration and prepare internal resources
    ///
    /// # Arguments
    /// * `ctx` - Execution context
    /// * `config` - Merged configuration map for this instance
    async fn initialize(&self, ctx: &OperationContext, config: &ConfigMap) -> Result<()>;

    /// Begin serving requests
    async fn start(&self, ctx: &OperationContext) -> Result<()>;

    /// Stop serving requests and release resources
    async fn stop(&self, ctx: &OperationContext) -> Result<()>;

    /// Probe the backend
    ///
    /// An `Err` means the probe itself failed; callers record the instance
    /// as unreachable.
    async fn health(&self, ctx: &OperationContext) -> Result<HealthStatus>;

    /// Storage statistics
    async fn get_stats(&self, ctx: &OperationContext) -> Result<ProviderStats>;

    /// Compact or rebuild internal structures
    async fn optimize(&self, ctx: &OperationContext) -> Result<()>;

    /// Write a backend-defined snapshot to `path`
    async fn backup(&self, ctx: &OperationContext, path: &Path) -> Result<()>;

    /// Replace current contents with the snapshot at `path`
    async fn restore(&self, ctx: &OperationContext, path: &Path) -> Result<()>;

    /// Instance name
    fn name(&self) -> &str;

    /// Backend type identifier, as registered
    fn provider_type(&self) -> &str;

    /// Capability tags (see `constants::CAPABILITY_*`)
    fn capabilities(&self) -> Vec<String>;

    /// Effective configuration
    fn configuration(&self) -> ConfigMap;

    /// Whether the backend is a remote/cloud service
    fn is_cloud(&self) -> bool;

    /// Reported cost
    fn cost_info(&self) -> CostInfo;
}

/// Data-plane half of the capability contract
///
/// # Example
///
/// ```ignore
/// let ctx = OperationContext::new();
/// provider.store(&ctx, &[VectorData::new("a", vec![1.0, 0.0])]).await?;
/// let hits = provider
///     .search(&ctx, &VectorQuery::new(vec![1.0, 0.0]).with_top_k(5))
///     .await?;
/// ```
#[async_trait]
pub trait VectorProvider: VectorProviderAdmin {
    /// Insert or replace vectors, each into its own collection
    async fn store(&self, ctx: &OperationContext, items: &[VectorData]) -> Result<()>;

    /// Fetch vectors by identifier; missing identifiers are skipped
    async fn retrieve(&self, ctx: &OperationContext, ids: &[String]) -> Result<Vec<VectorData>>;

    /// Replace an existing vector
    ///
    /// # Arguments
    /// * `id` - Identifier of the vector to replace
    /// * `item` - New contents; its `id` is ignored in favour of `id`
    async fn update(&self, ctx: &OperationContext, id: &str, item: &VectorData) -> Result<()>;

    /// Remove vectors by identifier
    async fn delete(&self, ctx: &OperationContext, ids: &[String]) -> Result<()>;

    /// Run a similarity query
    async fn search(&self, ctx: &OperationContext, query: &VectorQuery) -> Result<SearchResults>;

    /// Top-`k` neighbours of `embedding` across collections
    ///
    /// # Arguments
    /// * `embedding` - Query vector
    /// * `k` - Maximum number of results
    /// * `filters` - Metadata equality filters
    async fn find_similar(
        &self,
        ctx: &OperationContext,
        embedding: &[f32],
        k: usize,
        filters: &Metadata,
    ) -> Result<Vec<SimilarityResult>>;

    /// `find_similar` for several embeddings, results in input order
    async fn batch_find_similar(
        &self,
        ctx: &OperationContext,
        queries: &[Vec<f32>],
        k: usize,
    ) -> Result<Vec<Vec<SimilarityResult>>>;

    /// Create a collection
    async fn create_collection(&self, ctx: &OperationContext, config: &CollectionConfig)
    -> Result<()>;

    /// Delete a collection and its vectors
    async fn delete_collection(&self, ctx: &OperationContext, name: &str) -> Result<()>;

    /// Describe every collection
    async fn list_collections(&self, ctx: &OperationContext) -> Result<Vec<CollectionInfo>>;

    /// Describe one collection
    async fn get_collection(&self, ctx: &OperationContext, name: &str) -> Result<CollectionInfo>;

    /// Create an index on a collection
    async fn create_index(
        &self,
        ctx: &OperationContext,
        collection: &str,
        config: &IndexConfig,
    ) -> Result<()>;

    /// Drop an index
    async fn delete_index(&self, ctx: &OperationContext, collection: &str, name: &str)
    -> Result<()>;

    /// Describe the indexes of a collection
    async fn list_indexes(&self, ctx: &OperationContext, collection: &str)
    -> Result<Vec<IndexInfo>>;

    /// Merge metadata into a vector, keeping existing keys not in `metadata`
    async fn add_metadata(&self, ctx: &OperationContext, id: &str, metadata: &Metadata)
    -> Result<()>;

    /// Replace the metadata of a vector
    async fn update_metadata(
        &self,
        ctx: &OperationContext,
        id: &str,
        metadata: &Metadata,
    ) -> Result<()>;

    /// Metadata of each requested vector, keyed by identifier
    async fn get_metadata(
        &self,
        ctx: &OperationContext,
        ids: &[String],
    ) -> Result<HashMap<String, Metadata>>;

    /// Remove `keys` from the metadata of each vector in `ids`
    async fn delete_metadata(
        &self,
        ctx: &OperationContext,
        ids: &[String],
        keys: &[String],
    ) -> Result<()>;
}
