//! Scriptable backend for orchestration tests
//!
//! Data lives in an [`InMemoryVectorProvider`]; failures, health, cloud
//! flag and latency are controlled by the test.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use vpm_application::ports::registry::{ProviderDescriptor, ProviderRegistry};
use vpm_domain::error::{Error, Result};
use vpm_domain::value_objects::{
    CollectionConfig, CollectionInfo, ConfigMap, CostInfo, HealthState, HealthStatus, IndexConfig,
    IndexInfo, Metadata, OperationContext, ProviderStats, SearchResults, SimilarityResult,
    VectorData, VectorQuery,
};
use vpm_domain::{VectorProvider, VectorProviderAdmin};
use vpm_providers::InMemoryVectorProvider;

/// Type identifier mocks are registered under
pub const MOCK_TYPE: &str = "mock";

/// Message carried by forced failures
pub const FORCED_FAILURE: &str = "forced failure";

/// In-memory backend with scripted failures
pub struct MockProvider {
    name: String,
    inner: InMemoryVectorProvider,
    cloud: bool,
    cost: CostInfo,
    failing: AtomicBool,
    fail_start: AtomicBool,
    health_error: AtomicBool,
    health_state: Mutex<HealthState>,
    latency: Mutex<Option<Duration>>,
    health_latency: Option<Duration>,
    calls: AtomicUsize,
    stops: AtomicUsize,
}

impl MockProvider {
    /// Healthy local mock
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            inner: InMemoryVectorProvider::new(),
            cloud: false,
            cost: CostInfo::free(),
            failing: AtomicBool::new(false),
            fail_start: AtomicBool::new(false),
            health_error: AtomicBool::new(false),
            health_state: Mutex::new(HealthState::Healthy),
            latency: Mutex::new(None),
            health_latency: None,
            calls: AtomicUsize::new(0),
            stops: AtomicUsize::new(0),
        }
    }

    /// Mark as a cloud backend
    pub fn cloud(mut self) -> Self {
        self.cloud = true;
        self
    }

    /// Report `cost`
    pub fn with_cost(mut self, cost: CostInfo) -> Self {
        self.cost = cost;
        self
    }

    /// Fail every data call from the start
    pub fn failing(self) -> Self {
        self.set_failing(true);
        self
    }

    /// Report `state` from `health`
    pub fn with_health(self, state: HealthState) -> Self {
        self.set_health(state);
        self
    }

    /// Sleep this long in every data call
    pub fn with_latency(self, latency: Duration) -> Self {
        *self.latency.lock().unwrap() = Some(latency);
        self
    }

    /// Sleep this long in every health probe
    pub fn with_health_latency(mut self, latency: Duration) -> Self {
        self.health_latency = Some(latency);
        self
    }

    /// Wrap in an `Arc`
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Toggle forced data-call failures
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Toggle failure of `start`
    pub fn set_fail_start(&self, fail: bool) {
        self.fail_start.store(fail, Ordering::SeqCst);
    }

    /// Toggle health probe errors
    pub fn set_health_error(&self, fail: bool) {
        self.health_error.store(fail, Ordering::SeqCst);
    }

    /// Change the reported health state
    pub fn set_health(&self, state: HealthState) {
        *self.health_state.lock().unwrap() = state;
    }

    /// Data calls received, failed ones included
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// `stop` calls received
    pub fn stop_count(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }

    async fn enter(&self, operation: &str) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let latency = *self.latency.lock().unwrap();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(Error::vector_db(format!(
                "{FORCED_FAILURE}: {} {operation}",
                self.name
            )));
        }
        Ok(())
    }
}

/// Registry holding the `mock` type
///
/// The constructor hands out the mock whose name matches the `name`
/// setting, so the manager's instance names select the mocks.
pub fn mock_registry(mocks: &[Arc<MockProvider>]) -> Arc<ProviderRegistry> {
    let registry = ProviderRegistry::with_builtin();
    register_mocks(&registry, mocks);
    Arc::new(registry)
}

/// Add the `mock` type to an existing registry
pub fn register_mocks(registry: &ProviderRegistry, mocks: &[Arc<MockProvider>]) {
    let by_name: HashMap<String, Arc<MockProvider>> = mocks
        .iter()
        .map(|mock| (mock.name.clone(), Arc::clone(mock)))
        .collect();
    registry
        .register(
            ProviderDescriptor::new(MOCK_TYPE).with_capabilities(["vector_storage"]),
            Arc::new(move |config: &ConfigMap| -> Result<Arc<dyn VectorProvider>> {
                let name = config
                    .get("name")
                    .and_then(|value| value.as_str())
                    .unwrap_or_default();
                let mock = by_name
                    .get(name)
                    .cloned()
                    .ok_or_else(|| Error::not_found(format!("mock '{name}'")))?;
                Ok(mock)
            }),
        )
        .unwrap();
}

#[async_trait]
impl VectorProviderAdmin for MockProvider {
    async fn initialize(&self, ctx: &OperationContext, config: &ConfigMap) -> Result<()> {
        self.inner.initialize(ctx, config).await
    }

    async fn start(&self, ctx: &OperationContext) -> Result<()> {
        if self.fail_start.load(Ordering::SeqCst) {
            return Err(Error::vector_db(format!("{FORCED_FAILURE}: {} start", self.name)));
        }
        self.inner.start(ctx).await
    }

    async fn stop(&self, ctx: &OperationContext) -> Result<()> {
        self.stops.fetch_add(1, Ordering::SeqCst);
        self.inner.stop(ctx).await
    }

    async fn health(&self, _ctx: &OperationContext) -> Result<HealthStatus> {
        if let Some(latency) = self.health_latency {
            tokio::time::sleep(latency).await;
        }
        if self.health_error.load(Ordering::SeqCst) {
            return Err(Error::vector_db(format!("{} unreachable", self.name)));
        }
        let state = *self.health_state.lock().unwrap();
        Ok(HealthStatus::new(state, format!("{} is {state}", self.name)))
    }

    async fn get_stats(&self, ctx: &OperationContext) -> Result<ProviderStats> {
        self.enter("get_stats").await?;
        self.inner.get_stats(ctx).await
    }

    async fn optimize(&self, ctx: &OperationContext) -> Result<()> {
        self.enter("optimize").await?;
        self.inner.optimize(ctx).await
    }

    async fn backup(&self, ctx: &OperationContext, path: &Path) -> Result<()> {
        self.enter("backup").await?;
        self.inner.backup(ctx, path).await
    }

    async fn restore(&self, ctx: &OperationContext, path: &Path) -> Result<()> {
        self.enter("restore").await?;
        self.inner.restore(ctx, path).await
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn provider_type(&self) -> &str {
        MOCK_TYPE
    }

    fn capabilities(&self) -> Vec<String> {
        vec!["vector_storage".to_string(), self.name.clone()]
    }

    fn configuration(&self) -> ConfigMap {
        ConfigMap::from([("name".to_string(), self.name.clone().into())])
    }

    fn is_cloud(&self) -> bool {
        self.cloud
    }

    fn cost_info(&self) -> CostInfo {
        self.cost.clone()
    }
}

#[async_trait]
impl VectorProvider for MockProvider {
    async fn store(&self, ctx: &OperationContext, items: &[VectorData]) -> Result<()> {
        self.enter("store").await?;
        self.inner.store(ctx, items).await
    }

    async fn retrieve(&self, ctx: &OperationContext, ids: &[String]) -> Result<Vec<VectorData>> {
        self.enter("retrieve").await?;
        self.inner.retrieve(ctx, ids).await
    }

    async fn update(&self, ctx: &OperationContext, id: &str, item: &VectorData) -> Result<()> {
        self.enter("update").await?;
        self.inner.update(ctx, id, item).await
    }

    async fn delete(&self, ctx: &OperationContext, ids: &[String]) -> Result<()> {
        self.enter("delete").await?;
        self.inner.delete(ctx, ids).await
    }

    async fn search(&self, ctx: &OperationContext, query: &VectorQuery) -> Result<SearchResults> {
        self.enter("search").await?;
        self.inner.search(ctx, query).await
    }

    async fn find_similar(
        &self,
        ctx: &OperationContext,
        embedding: &[f32],
        k: usize,
        filters: &Metadata,
    ) -> Result<Vec<SimilarityResult>> {
        self.enter("find_similar").await?;
        self.inner.find_similar(ctx, embedding, k, filters).await
    }

    async fn batch_find_similar(
        &self,
        ctx: &OperationContext,
        queries: &[Vec<f32>],
        k: usize,
    ) -> Result<Vec<Vec<SimilarityResult>>> {
        self.enter("batch_find_similar").await?;
        self.inner.batch_find_similar(ctx, queries, k).await
    }

    async fn create_collection(
        &self,
        ctx: &OperationContext,
        config: &CollectionConfig,
    ) -> Result<()> {
        self.enter("create_collection").await?;
        self.inner.create_collection(ctx, config).await
    }

    async fn delete_collection(&self, ctx: &OperationContext, name: &str) -> Result<()> {
        self.enter("delete_collection").await?;
        self.inner.delete_collection(ctx, name).await
    }

    async fn list_collections(&self, ctx: &OperationContext) -> Result<Vec<CollectionInfo>> {
        self.enter("list_collections").await?;
        self.inner.list_collections(ctx).await
    }

    async fn get_collection(&self, ctx: &OperationContext, name: &str) -> Result<CollectionInfo> {
        self.enter("get_collection").await?;
        self.inner.get_collection(ctx, name).await
    }

    async fn create_index(
        &self,
        ctx: &OperationContext,
        collection: &str,
        config: &IndexConfig,
    ) -> Result<()> {
        self.enter("create_index").await?;
        self.inner.create_index(ctx, collection, config).await
    }

    async fn delete_index(&self, ctx: &OperationContext, collection: &str, name: &str) -> Result<()> {
        self.enter("delete_index").await?;
        self.inner.delete_index(ctx, collection, name).await
    }

    async fn list_indexes(&self, ctx: &OperationContext, collection: &str) -> Result<Vec<IndexInfo>> {
        self.enter("list_indexes").await?;
        self.inner.list_indexes(ctx, collection).await
    }

    async fn add_metadata(&self, ctx: &OperationContext, id: &str, metadata: &Metadata) -> Result<()> {
        self.enter("add_metadata").await?;
        self.inner.add_metadata(ctx, id, metadata).await
    }

    async fn update_metadata(
        &self,
        ctx: &OperationContext,
        id: &str,
        metadata: &Metadata,
    ) -> Result<()> {
        self.enter("update_metadata").await?;
        self.inner.update_metadata(ctx, id, metadata).await
    }

    async fn get_metadata(
        &self,
        ctx: &OperationContext,
        ids: &[String],
    ) -> Result<HashMap<String, Metadata>> {
        self.enter("get_metadata").await?;
        self.inner.get_metadata(ctx, ids).await
    }

    async fn delete_metadata(
        &self,
        ctx: &OperationContext,
        ids: &[String],
        keys: &[String],
    ) -> Result<()> {
        self.enter("delete_metadata").await?;
        self.inner.delete_metadata(ctx, ids, keys).await
    }
}
