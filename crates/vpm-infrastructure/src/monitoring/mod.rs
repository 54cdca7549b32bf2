//! Monitoring Decorator
//!
//! [`MonitoredProvider`] forwards every contract call to the wrapped backend
//! and records its duration and outcome. Descriptive calls are not recorded.

use std::collections::HashMap;
use std::future::Future;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vpm_domain::error::Result;
use vpm_domain::value_objects::{
    CollectionConfig, CollectionInfo, ConfigMap, CostInfo, HealthStatus, IndexConfig, IndexInfo,
    Metadata, OperationContext, ProviderStats, SearchResults, SimilarityResult, VectorData,
    VectorQuery,
};
use vpm_domain::{VectorProvider, VectorProviderAdmin};

use crate::utils::TimedOperation;

/// Call counters and latency of one wrapped instance
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderMetrics {
    /// Recorded calls
    pub total_operations: u64,
    /// Calls that returned `Ok`
    pub successful_operations: u64,
    /// Calls that returned `Err`
    pub failed_operations: u64,
    /// Sum of call durations
    pub total_latency: Duration,
    /// Fastest call
    pub min_latency: Duration,
    /// Slowest call
    pub max_latency: Duration,
    /// When the last call finished
    pub last_operation: Option<DateTime<Utc>>,
}

impl ProviderMetrics {
    /// Add one call
    pub fn record(&mut self, latency: Duration, success: bool) {
        if self.total_operations == 0 || latency < self.min_latency {
            self.min_latency = latency;
        }
        self.max_latency = self.max_latency.max(latency);
        self.total_operations += 1;
        self.total_latency += latency;
        if success {
            self.successful_operations += 1;
        } else {
            self.failed_operations += 1;
        }
        self.last_operation = Some(Utc::now());
    }

    /// Mean call duration
    pub fn average_latency(&self) -> Duration {
        u32::try_from(self.total_operations)
            .ok()
            .and_then(|count| self.total_latency.checked_div(count))
            .unwrap_or_default()
    }

    /// Failed share of all calls, 0.0 when nothing was recorded
    #[allow(clippy::cast_precision_loss)]
    pub fn error_rate(&self) -> f64 {
        if self.total_operations == 0 {
            0.0
        } else {
            self.failed_operations as f64 / self.total_operations as f64
        }
    }
}

/// Pass-through wrapper recording call metrics
pub struct MonitoredProvider {
    inner: Arc<dyn VectorProvider>,
    metrics: Mutex<ProviderMetrics>,
}

impl MonitoredProvider {
    /// Wrap `inner` with empty counters
    pub fn new(inner: Arc<dyn VectorProvider>) -> Self {
        Self {
            inner,
            metrics: Mutex::new(ProviderMetrics::default()),
        }
    }

    /// Snapshot of the counters
    pub fn metrics(&self) -> ProviderMetrics {
        self.metrics
            .lock()
            .map(|metrics| metrics.clone())
            .unwrap_or_default()
    }

    /// The wrapped instance
    pub fn inner(&self) -> &Arc<dyn VectorProvider> {
        &self.inner
    }

    async fn observe<T, Fut>(&self, call: Fut) -> Result<T>
    where
        Fut: Future<Output = Result<T>> + Send,
    {
        let timer = TimedOperation::start();
        let result = call.await;
        if let Ok(mut metrics) = self.metrics.lock() {
            metrics.record(timer.elapsed(), result.is_ok());
        }
        result
    }
}

#[async_trait]
impl VectorProviderAdmin for MonitoredProvider {
    async fn initialize(&self, ctx: &OperationContext, config: &ConfigMap) -> Result<()> {
        self.observe(self.inner.initialize(ctx, config)).await
    }

    async fn start(&self, ctx: &OperationContext) -> Result<()> {
        self.observe(self.inner.start(ctx)).await
    }

    async fn stop(&self, ctx: &OperationContext) -> Result<()> {
        self.observe(self.inner.stop(ctx)).await
    }

    async fn health(&self, ctx: &OperationContext) -> Result<HealthStatus> {
        self.observe(self.inner.health(ctx)).await
    }

    async fn get_stats(&self, ctx: &OperationContext) -> Result<ProviderStats> {
        self.observe(self.inner.get_stats(ctx)).await
    }

    async fn optimize(&self, ctx: &OperationContext) -> Result<()> {
        self.observe(self.inner.optimize(ctx)).await
    }

    async fn backup(&self, ctx: &OperationContext, path: &Path) -> Result<()> {
        self.observe(self.inner.backup(ctx, path)).await
    }

    async fn restore(&self, ctx: &OperationContext, path: &Path) -> Result<()> {
        self.observe(self.inner.restore(ctx, path)).await
    }

    fn name(&self) -> &str {
        self.inner.name()
    }

    fn provider_type(&self) -> &str {
        self.inner.provider_type()
    }

    fn capabilities(&self) -> Vec<String> {
        self.inner.capabilities()
    }

    fn configuration(&self) -> ConfigMap {
        self.inner.configuration()
    }

    fn is_cloud(&self) -> bool {
        self.inner.is_cloud()
    }

    fn cost_info(&self) -> CostInfo {
        self.inner.cost_info()
    }
}

#[async_trait]
impl VectorProvider for MonitoredProvider {
    async fn store(&self, ctx: &OperationContext, items: &[VectorData]) -> Result<()> {
        self.observe(self.inner.store(ctx, items)).await
    }

    async fn retrieve(&self, ctx: &OperationContext, ids: &[String]) -> Result<Vec<VectorData>> {
        self.observe(self.inner.retrieve(ctx, ids)).await
    }

    async fn update(&self, ctx: &OperationContext, id: &str, item: &VectorData) -> Result<()> {
        self.observe(self.inner.update(ctx, id, item)).await
    }

    async fn delete(&self, ctx: &OperationContext, ids: &[String]) -> Result<()> {
        self.observe(self.inner.delete(ctx, ids)).await
    }

    async fn search(&self, ctx: &OperationContext, query: &VectorQuery) -> Result<SearchResults> {
        self.observe(self.inner.search(ctx, query)).await
    }

    async fn find_similar(
        &self,
        ctx: &OperationContext,
        embedding: &[f32],
        k: usize,
        filters: &Metadata,
    ) -> Result<Vec<SimilarityResult>> {
        self.observe(self.inner.find_similar(ctx, embedding, k, filters))
            .await
    }

    async fn batch_find_similar(
        &self,
        ctx: &OperationContext,
        queries: &[Vec<f32>],
        k: usize,
    ) -> Result<Vec<Vec<SimilarityResult>>> {
        self.observe(self.inner.batch_find_similar(ctx, queries, k))
            .await
    }

    async fn create_collection(
        &self,
        ctx: &OperationContext,
        config: &CollectionConfig,
    ) -> Result<()> {
        self.observe(self.inner.create_collection(ctx, config)).await
    }

    async fn delete_collection(&self, ctx: &OperationContext, name: &str) -> Result<()> {
        self.observe(self.inner.delete_collection(ctx, name)).await
    }

    async fn list_collections(&self, ctx: &OperationContext) -> Result<Vec<CollectionInfo>> {
        self.observe(self.inner.list_collections(ctx)).await
    }

    async fn get_collection(&self, ctx: &OperationContext, name: &str) -> Result<CollectionInfo> {
        self.observe(self.inner.get_collection(ctx, name)).await
    }

    async fn create_index(
        &self,
        ctx: &OperationContext,
        collection: &str,
        config: &IndexConfig,
    ) -> Result<()> {
        self.observe(self.inner.create_index(ctx, collection, config))
            .await
    }

    async fn delete_index(&self, ctx: &OperationContext, collection: &str, name: &str) -> Result<()> {
        self.observe(self.inner.delete_index(ctx, collection, name))
            .await
    }

    async fn list_indexes(&self, ctx: &OperationContext, collection: &str) -> Result<Vec<IndexInfo>> {
        self.observe(self.inner.list_indexes(ctx, collection)).await
    }

    async fn add_metadata(&self, ctx: &OperationContext, id: &str, metadata: &Metadata) -> Result<()> {
        self.observe(self.inner.add_metadata(ctx, id, metadata))
            .await
    }

    async fn update_metadata(
        &self,
        ctx: &OperationContext,
        id: &str,
        metadata: &Metadata,
    ) -> Result<()> {
        self.observe(self.inner.update_metadata(ctx, id, metadata))
            .await
    }

    async fn get_metadata(
        &self,
        ctx: &OperationContext,
        ids: &[String],
    ) -> Result<HashMap<String, Metadata>> {
        self.observe(self.inner.get_metadata(ctx, ids)).await
    }

    async fn delete_metadata(
        &self,
        ctx: &OperationContext,
        ids: &[String],
        keys: &[String],
    ) -> Result<()> {
        self.observe(self.inner.delete_metadata(ctx, ids, keys))
            .await
    }
}
