//! Fallback Chain
//!
//! Tries members in a fixed order until one succeeds. Under
//! [`FallbackPolicy::Ratchet`] a member that failed is skipped by later
//! calls until [`FallbackChain::reset`].

use std::collections::{BTreeSet, HashMap, VecDeque};
use std::fmt;
use std::future::Future;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use vpm_domain::error::{Error, Result};
use vpm_domain::value_objects::{
    CollectionConfig, CollectionInfo, ConfigMap, CostInfo, HealthStatus, IndexConfig, IndexInfo,
    Metadata, Operation, OperationContext, ProviderStats, SearchResults, SimilarityResult,
    VectorData, VectorQuery,
};
use vpm_domain::{VectorProvider, VectorProviderAdmin};

use crate::constants::{CHAIN_PROVIDER_NAME, CHAIN_PROVIDER_TYPE, DEFAULT_FALLBACK_HISTORY_LIMIT};
use crate::utils::TimedOperation;

/// Where each call starts scanning the chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Start at the current member; failed members stay skipped until `reset`
    #[default]
    Ratchet,
    /// Start at the first member on every call
    RetryFromStart,
}

impl fmt::Display for FallbackPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ratchet => f.write_str("ratchet"),
            Self::RetryFromStart => f.write_str("retry_from_start"),
        }
    }
}

/// Diagnostic record of a call that saw at least one member fail
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FallbackAttempt {
    /// When the call started
    pub timestamp: DateTime<Utc>,
    /// Operation kind
    pub operation: Operation,
    /// Members tried, in order
    pub candidates: Vec<String>,
    /// Member that finally served the call
    pub succeeded: Option<String>,
    /// `(member, error)` for every failed candidate
    pub errors: Vec<(String, String)>,
    /// Wall time of the whole call
    pub duration_ms: u64,
}

/// Ordered failover across backend instances
pub struct FallbackChain {
    members: Vec<Arc<dyn VectorProvider>>,
    current: AtomicUsize,
    policy: FallbackPolicy,
    history: Mutex<VecDeque<FallbackAttempt>>,
    history_limit: usize,
}

impl FallbackChain {
    /// Chain over `members` with the default ratchet policy
    pub fn new(members: Vec<Arc<dyn VectorProvider>>) -> Self {
        Self {
            members,
            current: AtomicUsize::new(0),
            policy: FallbackPolicy::default(),
            history: Mutex::new(VecDeque::new()),
            history_limit: DEFAULT_FALLBACK_HISTORY_LIMIT,
        }
    }

    /// Set the scan policy
    pub fn with_policy(mut self, policy: FallbackPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Cap the attempt history
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// Scan policy
    pub fn policy(&self) -> FallbackPolicy {
        self.policy
    }

    /// Members in attempt order
    pub fn members(&self) -> &[Arc<dyn VectorProvider>] {
        &self.members
    }

    /// Number of members
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the chain has no members
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Index the next call starts from; equals `len()` once exhausted
    pub fn current_index(&self) -> usize {
        self.current.load(Ordering::Acquire)
    }

    /// Rewind to the first member
    pub fn reset(&self) {
        self.current.store(0, Ordering::Release);
        info!(provider = CHAIN_PROVIDER_NAME, "Fallback chain reset");
    }

    /// Copy of the attempt history, oldest first
    pub fn history(&self) -> Vec<FallbackAttempt> {
        self.history
            .lock()
            .map(|history| history.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Member answering descriptive and health queries
    fn current_member(&self) -> Option<&Arc<dyn VectorProvider>> {
        let last = self.members.len().checked_sub(1)?;
        self.members.get(self.current_index().min(last))
    }

    fn record(&self, attempt: FallbackAttempt) {
        if self.history_limit == 0 {
            return;
        }
        if let Ok(mut history) = self.history.lock() {
            while history.len() >= self.history_limit {
                history.pop_front();
            }
            history.push_back(attempt);
        }
    }

    /// Run `call` against members until one succeeds
    async fn attempt<T, F, Fut>(&self, operation: Operation, call: F) -> Result<T>
    where
        F: Fn(Arc<dyn VectorProvider>) -> Fut + Send + Sync,
        Fut: Future<Output = Result<T>> + Send,
        T: Send,
    {
        let timestamp = Utc::now();
        let timer = TimedOperation::start();
        let start = match self.policy {
            FallbackPolicy::Ratchet => self.current_index(),
            FallbackPolicy::RetryFromStart => 0,
        };

        let mut candidates = Vec::new();
        let mut errors = Vec::new();
        for (index, member) in self.members.iter().enumerate().skip(start) {
            let name = member.name().to_string();
            candidates.push(name.clone());

            match call(Arc::clone(member)).await {
                Ok(value) => {
                    if self.policy == FallbackPolicy::RetryFromStart {
                        self.current.store(index, Ordering::Release);
                    }
                    if !errors.is_empty() {
                        info!(
                            operation = %operation,
                            provider = %name,
                            failed = errors.len(),
                            "Fallback chain recovered"
                        );
                        self.record(FallbackAttempt {
                            timestamp,
                            operation,
                            candidates,
                            succeeded: Some(name),
                            errors,
                            duration_ms: timer.elapsed_ms(),
                        });
                    }
                    return Ok(value);
                }
                // Cancellation says nothing about the member
                Err(error) if matches!(error.root(), Error::Cancelled { .. }) => return Err(error),
                Err(error) => {
                    debug!(
                        operation = %operation,
                        provider = %name,
                        error = %error,
                        "Chain member failed, trying next"
                    );
                    errors.push((name, error.to_string()));
                    if self.policy == FallbackPolicy::Ratchet {
                        self.current.fetch_max(index + 1, Ordering::AcqRel);
                    }
                }
            }
        }

        if !errors.is_empty() {
            self.record(FallbackAttempt {
                timestamp,
                operation,
                candidates,
                succeeded: None,
                errors: errors.clone(),
                duration_ms: timer.elapsed_ms(),
            });
        }
        warn!(operation = %operation, failed = errors.len(), "Fallback chain exhausted");
        Err(Error::all_providers_exhausted(operation.as_str(), errors))
    }

    /// Run `call` against every member, stopping at the first failure
    async fn for_each_member<F, Fut>(&self, call: F) -> Result<()>
    where
        F: Fn(Arc<dyn VectorProvider>) -> Fut + Send + Sync,
        Fut: Future<Output = Result<()>> + Send,
    {
        for member in &self.members {
            call(Arc::clone(member))
                .await
                .map_err(|error| Error::backend(member.name(), error))?;
        }
        Ok(())
    }
}

#[async_trait]
impl VectorProviderAdmin for FallbackChain {
    async fn initialize(&self, ctx: &OperationContext, config: &ConfigMap) -> Result<()> {
        self.for_each_member(|member| async move { member.initialize(ctx, config).await })
            .await
    }

    async fn start(&self, ctx: &OperationContext) -> Result<()> {
        self.for_each_member(|member| async move { member.start(ctx).await })
            .await
    }

    async fn stop(&self, ctx: &OperationContext) -> Result<()> {
        self.for_each_member(|member| async move { member.stop(ctx).await })
            .await
    }

    async fn health(&self, ctx: &OperationContext) -> Result<HealthStatus> {
        match self.current_member() {
            Some(member) => member.health(ctx).await,
            None => Ok(HealthStatus::unreachable("Fallback chain has no members")),
        }
    }

    async fn get_stats(&self, ctx: &OperationContext) -> Result<ProviderStats> {
        match self.current_member() {
            Some(member) => member.get_stats(ctx).await,
            None => Err(Error::all_providers_exhausted(Operation::Stats.as_str(), Vec::new())),
        }
    }

    async fn optimize(&self, ctx: &OperationContext) -> Result<()> {
        self.for_each_member(|member| async move { member.optimize(ctx).await })
            .await
    }

    async fn backup(&self, ctx: &OperationContext, path: &Path) -> Result<()> {
        self.for_each_member(|member| async move { member.backup(ctx, path).await })
            .await
    }

    async fn restore(&self, ctx: &OperationContext, path: &Path) -> Result<()> {
        self.for_each_member(|member| async move { member.restore(ctx, path).await })
            .await
    }

    fn name(&self) -> &str {
        CHAIN_PROVIDER_NAME
    }

    fn provider_type(&self) -> &str {
        CHAIN_PROVIDER_TYPE
    }

    fn capabilities(&self) -> Vec<String> {
        self.members
            .iter()
            .flat_map(|member| member.capabilities())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    fn configuration(&self) -> ConfigMap {
        self.current_member()
            .map(|member| member.configuration())
            .unwrap_or_default()
    }

    fn is_cloud(&self) -> bool {
        self.current_member()
            .is_some_and(|member| member.is_cloud())
    }

    fn cost_info(&self) -> CostInfo {
        self.current_member()
            .map(|member| member.cost_info())
            .unwrap_or_default()
    }
}

#[async_trait]
impl VectorProvider for FallbackChain {
    async fn store(&self, ctx: &OperationContext, items: &[VectorData]) -> Result<()> {
        self.attempt(Operation::Store, |member| async move {
            member.store(ctx, items).await
        })
        .await
    }

    async fn retrieve(&self, ctx: &OperationContext, ids: &[String]) -> Result<Vec<VectorData>> {
        self.attempt(Operation::Retrieve, |member| async move {
            member.retrieve(ctx, ids).await
        })
        .await
    }

    async fn update(&self, ctx: &OperationContext, id: &str, item: &VectorData) -> Result<()> {
        self.attempt(Operation::Update, |member| async move {
            member.update(ctx, id, item).await
        })
        .await
    }

    async fn delete(&self, ctx: &OperationContext, ids: &[String]) -> Result<()> {
        self.attempt(Operation::Delete, |member| async move {
            member.delete(ctx, ids).await
        })
        .await
    }

    async fn search(&self, ctx: &OperationContext, query: &VectorQuery) -> Result<SearchResults> {
        self.attempt(Operation::Search, |member| async move {
            member.search(ctx, query).await
        })
        .await
    }

    async fn find_similar(
        &self,
        ctx: &OperationContext,
        embedding: &[f32],
        k: usize,
        filters: &Metadata,
    ) -> Result<Vec<SimilarityResult>> {
        self.attempt(Operation::Similar, |member| async move {
            member.find_similar(ctx, embedding, k, filters).await
        })
        .await
    }

    async fn batch_find_similar(
        &self,
        ctx: &OperationContext,
        queries: &[Vec<f32>],
        k: usize,
    ) -> Result<Vec<Vec<SimilarityResult>>> {
        self.attempt(Operation::BatchSimilar, |member| async move {
            member.batch_find_similar(ctx, queries, k).await
        })
        .await
    }

    async fn create_collection(
        &self,
        ctx: &OperationContext,
        config: &CollectionConfig,
    ) -> Result<()> {
        self.attempt(Operation::Collection, |member| async move {
            member.create_collection(ctx, config).await
        })
        .await
    }

    async fn delete_collection(&self, ctx: &OperationContext, name: &str) -> Result<()> {
        self.attempt(Operation::Collection, |member| async move {
            member.delete_collection(ctx, name).await
        })
        .await
    }

    async fn list_collections(&self, ctx: &OperationContext) -> Result<Vec<CollectionInfo>> {
        self.attempt(Operation::Collection, |member| async move {
            member.list_collections(ctx).await
        })
        .await
    }

    async fn get_collection(&self, ctx: &OperationContext, name: &str) -> Result<CollectionInfo> {
        self.attempt(Operation::Collection, |member| async move {
            member.get_collection(ctx, name).await
        })
        .await
    }

    async fn create_index(
        &self,
        ctx: &OperationContext,
        collection: &str,
        config: &IndexConfig,
    ) -> Result<()> {
        self.attempt(Operation::Index, |member| async move {
            member.create_index(ctx, collection, config).await
        })
        .await
    }

    async fn delete_index(&self, ctx: &OperationContext, collection: &str, name: &str) -> Result<()> {
        self.attempt(Operation::Index, |member| async move {
            member.delete_index(ctx, collection, name).await
        })
        .await
    }

    async fn list_indexes(&self, ctx: &OperationContext, collection: &str) -> Result<Vec<IndexInfo>> {
        self.attempt(Operation::Index, |member| async move {
            member.list_indexes(ctx, collection).await
        })
        .await
    }

    async fn add_metadata(&self, ctx: &OperationContext, id: &str, metadata: &Metadata) -> Result<()> {
        self.attempt(Operation::Metadata, |member| async move {
            member.add_metadata(ctx, id, metadata).await
        })
        .await
    }

    async fn update_metadata(
        &self,
        ctx: &OperationContext,
        id: &str,
        metadata: &Metadata,
    ) -> Result<()> {
        self.attempt(Operation::Metadata, |member| async move {
            member.update_metadata(ctx, id, metadata).await
        })
        .await
    }

    async fn get_metadata(
        &self,
        ctx: &OperationContext,
        ids: &[String],
    ) -> Result<HashMap<String, Metadata>> {
        self.attempt(Operation::Metadata, |member| async move {
            member.get_metadata(ctx, ids).await
        })
        .await
    }

    async fn delete_metadata(
        &self,
        ctx: &OperationContext,
        ids: &[String],
        keys: &[String],
    ) -> Result<()> {
        self.attempt(Operation::Metadata, |member| async move {
            member.delete_metadata(ctx, ids, keys).await
        })
        .await
    }
}
