//! Null vector provider for testing
//!
//! Accepts every call and stores nothing. Collections are tracked so that
//! collection listings stay coherent, but vectors are dropped on the floor.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use vpm_domain::error::{Error, Result};
use vpm_domain::ports::providers::{VectorProvider, VectorProviderAdmin};
use vpm_domain::value_objects::{
    CollectionConfig, CollectionInfo, ConfigMap, CostInfo, HealthState, HealthStatus, IndexConfig,
    IndexInfo, Metadata, OperationContext, ProviderStats, SearchResults, SimilarityResult,
    VectorData, VectorQuery,
};

use crate::constants::{COLLECTION_STATUS_READY, NULL_PROVIDER_TYPE};

/// Null vector provider
///
/// Useful for:
/// - Unit testing where vector storage is not needed
/// - A default registry entry when no real backend is configured
/// - Measuring orchestration overhead without backend cost
pub struct NullVectorProvider {
    name: String,
    configuration: ConfigMap,
    collections: Arc<DashMap<String, CollectionInfo>>,
}

impl NullVectorProvider {
    /// Create a new null provider
    pub fn new() -> Self {
        Self::with_configuration(ConfigMap::new())
    }

    /// Create a null provider reporting `configuration`
    ///
    /// A string `name` entry overrides the instance name.
    pub fn with_configuration(configuration: ConfigMap) -> Self {
        let name = configuration
            .get("name")
            .and_then(|value| value.as_str())
            .unwrap_or(NULL_PROVIDER_TYPE)
            .to_string();
        Self {
            name,
            configuration,
            collections: Arc::new(DashMap::new()),
        }
    }
}

impl Default for NullVectorProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorProviderAdmin for NullVectorProvider {
    async fn initialize(&self, _ctx: &OperationContext, _config: &ConfigMap) -> Result<()> {
        Ok(())
    }

    async fn start(&self, _ctx: &OperationContext) -> Result<()> {
        Ok(())
    }

    async fn stop(&self, _ctx: &OperationContext) -> Result<()> {
        Ok(())
    }

    async fn health(&self, _ctx: &OperationContext) -> Result<HealthStatus> {
        Ok(HealthStatus::healthy())
    }

    async fn get_stats(&self, _ctx: &OperationContext) -> Result<ProviderStats> {
        Ok(ProviderStats {
            name: NULL_PROVIDER_TYPE.to_string(),
            provider_type: NULL_PROVIDER_TYPE.to_string(),
            status: HealthState::Healthy,
            total_vectors: 0,
            total_collections: self.collections.len() as u64,
            total_size_bytes: 0,
            uptime_secs: 0,
            last_operation: None,
        })
    }

    async fn optimize(&self, _ctx: &OperationContext) -> Result<()> {
        Ok(())
    }

    async fn backup(&self, _ctx: &OperationContext, _path: &Path) -> Result<()> {
        Ok(())
    }

    async fn restore(&self, _ctx: &OperationContext, _path: &Path) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn provider_type(&self) -> &str {
        NULL_PROVIDER_TYPE
    }

    fn capabilities(&self) -> Vec<String> {
        Vec::new()
    }

    fn configuration(&self) -> ConfigMap {
        self.configuration.clone()
    }

    fn is_cloud(&self) -> bool {
        false
    }

    fn cost_info(&self) -> CostInfo {
        CostInfo::free()
    }
}

#[async_trait]
impl VectorProvider for NullVectorProvider {
    async fn store(&self, _ctx: &OperationContext, _items: &[VectorData]) -> Result<()> {
        Ok(())
    }

    async fn retrieve(&self, _ctx: &OperationContext, _ids: &[String]) -> Result<Vec<VectorData>> {
        Ok(Vec::new())
    }

    async fn update(&self, _ctx: &OperationContext, _id: &str, _item: &VectorData) -> Result<()> {
        Ok(())
    }

    async fn delete(&self, _ctx: &OperationContext, _ids: &[String]) -> Result<()> {
        Ok(())
    }

    async fn search(&self, _ctx: &OperationContext, query: &VectorQuery) -> Result<SearchResults> {
        Ok(SearchResults {
            namespace: query.namespace.clone(),
            ..Default::default()
        })
    }

    async fn find_similar(
        &self,
        _ctx: &OperationContext,
        _embedding: &[f32],
        _k: usize,
        _filters: &Metadata,
    ) -> Result<Vec<SimilarityResult>> {
        Ok(Vec::new())
    }

    async fn batch_find_similar(
        &self,
        _ctx: &OperationContext,
        queries: &[Vec<f32>],
        _k: usize,
    ) -> Result<Vec<Vec<SimilarityResult>>> {
        Ok(vec![Vec::new(); queries.len()])
    }

    async fn create_collection(
        &self,
        _ctx: &OperationContext,
        config: &CollectionConfig,
    ) -> Result<()> {
        let now = Utc::now();
        self.collections.insert(
            config.name.clone(),
            CollectionInfo {
                name: config.name.clone(),
                dimension: config.dimension,
                metric: config.metric,
                vector_count: 0,
                size_bytes: 0,
                status: COLLECTION_STATUS_READY.to_string(),
                created_at: now,
                updated_at: now,
            },
        );
        Ok(())
    }

    async fn delete_collection(&self, _ctx: &OperationContext, name: &str) -> Result<()> {
        self.collections.remove(name);
        Ok(())
    }

    async fn list_collections(&self, _ctx: &OperationContext) -> Result<Vec<CollectionInfo>> {
        Ok(self.collections.iter().map(|c| c.value().clone()).collect())
    }

    async fn get_collection(&self, _ctx: &OperationContext, name: &str) -> Result<CollectionInfo> {
        self.collections
            .get(name)
            .map(|c| c.value().clone())
            .ok_or_else(|| Error::not_found(format!("collection '{name}'")))
    }

    async fn create_index(
        &self,
        _ctx: &OperationContext,
        _collection: &str,
        _config: &IndexConfig,
    ) -> Result<()> {
        Ok(())
    }

    async fn delete_index(&self, _ctx: &OperationContext, _collection: &str, _name: &str) -> Result<()> {
        Ok(())
    }

    async fn list_indexes(&self, _ctx: &OperationContext, _collection: &str) -> Result<Vec<IndexInfo>> {
        Ok(Vec::new())
    }

    async fn add_metadata(&self, _ctx: &OperationContext, _id: &str, _metadata: &Metadata) -> Result<()> {
        Ok(())
    }

    async fn update_metadata(
        &self,
        _ctx: &OperationContext,
        _id: &str,
        _metadata: &Metadata,
    ) -> Result<()> {
        Ok(())
    }

    async fn get_metadata(
        &self,
        _ctx: &OperationContext,
        _ids: &[String],
    ) -> Result<HashMap<String, Metadata>> {
        Ok(HashMap::new())
    }

    async fn delete_metadata(
        &self,
        _ctx: &OperationContext,
        _ids: &[String],
        _keys: &[String],
    ) -> Result<()> {
        Ok(())
    }
}

// ============================================================================
// Auto-registration via linkme distributed slice
// ============================================================================

use vpm_application::ports::registry::{ProviderDescriptor, VECTOR_PROVIDERS, VectorProviderEntry};
use vpm_domain::constants::CATEGORY_UTILITY;

/// Static descriptor of the null provider
pub fn null_descriptor() -> ProviderDescriptor {
    ProviderDescriptor::new(NULL_PROVIDER_TYPE)
        .with_description("Null vector provider (accepts everything, stores nothing)")
        .with_category(CATEGORY_UTILITY)
        .cloud(false)
        .with_tag("local")
        .with_tag("testing")
}

/// Factory function for creating null provider instances
fn null_factory(config: &ConfigMap) -> Result<Arc<dyn VectorProvider>> {
    Ok(Arc::new(NullVectorProvider::with_configuration(config.clone())))
}

#[linkme::distributed_slice(VECTOR_PROVIDERS)]
static NULL_PROVIDER: VectorProviderEntry = VectorProviderEntry {
    name: NULL_PROVIDER_TYPE,
    description: "Null vector provider (accepts everything, stores nothing)",
    descriptor: null_descriptor,
    factory: null_factory,
};
