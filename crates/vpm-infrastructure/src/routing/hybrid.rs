//! Hybrid Router
//!
//! Role-keyed members behind one backend. Each routed call picks exactly
//! one member by strategy and never retries elsewhere.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;
use vpm_domain::error::{Error, Result};
use vpm_domain::value_objects::{
    CollectionConfig, CollectionInfo, ConfigMap, CostInfo, HealthState, HealthStatus,
    IndexConfig, IndexInfo, Metadata, Operation, OperationContext, ProviderStats, SearchResults,
    SimilarityResult, VectorData, VectorQuery,
};
use vpm_domain::{VectorProvider, VectorProviderAdmin};

use crate::constants::HYBRID_PROVIDER_TYPE;
use crate::utils::TimedOperation;

/// How the router picks a member for each call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HybridStrategy {
    /// Always the first member
    #[default]
    Failover,
    /// Cycle through members on every routed call
    RoundRobin,
    /// Same as `RoundRobin`
    LoadBalance,
    /// Member mapped to the operation kind, else the first member
    OperationBased,
}

impl HybridStrategy {
    /// Canonical lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Failover => "failover",
            Self::RoundRobin => "round_robin",
            Self::LoadBalance => "load_balance",
            Self::OperationBased => "operation_based",
        }
    }
}

impl fmt::Display for HybridStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Routes each call to one of several role-keyed backend instances
///
/// # Example
///
/// ```ignore
/// let router = HybridRouter::new(
///     BTreeMap::from([("search".into(), fast), ("store".into(), durable)]),
///     HybridStrategy::OperationBased,
///     HashMap::from([(Operation::Store, "store".into())]),
/// )?;
/// router.store(&ctx, &items).await?; // lands on `durable`
/// ```
pub struct HybridRouter {
    name: String,
    strategy: HybridStrategy,
    /// Sorted by role
    members: Vec<(String, Arc<dyn VectorProvider>)>,
    /// Operation kind to member index
    routes: HashMap<Operation, usize>,
    cursor: AtomicUsize,
}

impl HybridRouter {
    /// Build a router
    ///
    /// Fails with `ConfigurationInvalid` when there are no members or a
    /// route names an unknown role.
    pub fn new(
        members: BTreeMap<String, Arc<dyn VectorProvider>>,
        strategy: HybridStrategy,
        routes: HashMap<Operation, String>,
    ) -> Result<Self> {
        if members.is_empty() {
            return Err(Error::configuration_invalid(
                HYBRID_PROVIDER_TYPE,
                "hybrid router needs at least one member",
            ));
        }
        let members: Vec<_> = members.into_iter().collect();

        let mut resolved = HashMap::with_capacity(routes.len());
        for (operation, role) in routes {
            let index = members
                .iter()
                .position(|(member_role, _)| *member_role == role)
                .ok_or_else(|| {
                    Error::configuration_invalid(
                        HYBRID_PROVIDER_TYPE,
                        format!("route '{operation}' refers to unknown role '{role}'"),
                    )
                })?;
            resolved.insert(operation, index);
        }

        Ok(Self {
            name: format!("Hybrid({strategy})"),
            strategy,
            members,
            routes: resolved,
            cursor: AtomicUsize::new(0),
        })
    }

    /// Selection strategy
    pub fn strategy(&self) -> HybridStrategy {
        self.strategy
    }

    /// Roles in routing order
    pub fn roles(&self) -> Vec<&str> {
        self.members.iter().map(|(role, _)| role.as_str()).collect()
    }

    /// Member serving `role`
    pub fn member(&self, role: &str) -> Option<Arc<dyn VectorProvider>> {
        self.members
            .iter()
            .find(|(member_role, _)| member_role == role)
            .map(|(_, member)| Arc::clone(member))
    }

    /// Pick the member for one call of `operation`
    ///
    /// Round-robin strategies advance the shared cursor on every call.
    pub fn select(&self, operation: Operation) -> (&str, &Arc<dyn VectorProvider>) {
        let index = match self.strategy {
            HybridStrategy::Failover => 0,
            HybridStrategy::RoundRobin | HybridStrategy::LoadBalance => {
                self.cursor.fetch_add(1, Ordering::Relaxed) % self.members.len()
            }
            HybridStrategy::OperationBased => self.routes.get(&operation).copied().unwrap_or(0),
        };
        let (role, member) = &self.members[index];
        (role.as_str(), member)
    }

    /// Run `call` on the selected member
    async fn route<T, F, Fut>(&self, operation: Operation, call: F) -> Result<T>
    where
        F: FnOnce(Arc<dyn VectorProvider>) -> Fut + Send,
        Fut: Future<Output = Result<T>> + Send,
    {
        let (role, member) = self.select(operation);
        debug!(
            operation = %operation,
            role,
            provider = member.name(),
            strategy = %self.strategy,
            "Hybrid route"
        );
        let name = member.name().to_string();
        call(Arc::clone(member))
            .await
            .map_err(|error| Error::backend(name, error))
    }

    /// Run `call` on every member, aggregating failures
    async fn broadcast<F, Fut>(&self, action: &str, call: F) -> Result<()>
    where
        F: Fn(Arc<dyn VectorProvider>) -> Fut + Send + Sync,
        Fut: Future<Output = Result<()>> + Send,
    {
        let mut failures = Vec::new();
        for (role, member) in &self.members {
            if let Err(error) = call(Arc::clone(member)).await {
                failures.push(format!("{role}: {error}"));
            }
        }
        if failures.is_empty() {
            Ok(())
        } else {
            Err(Error::lifecycle(format!(
                "errors during {action}: {}",
                failures.join("; ")
            )))
        }
    }
}

#[async_trait]
impl VectorProviderAdmin for HybridRouter {
    async fn initialize(&self, ctx: &OperationContext, config: &ConfigMap) -> Result<()> {
        self.broadcast("initialize", |member| async move {
            member.initialize(ctx, config).await
        })
        .await
    }

    async fn start(&self, ctx: &OperationContext) -> Result<()> {
        self.broadcast("start", |member| async move { member.start(ctx).await })
            .await
    }

    async fn stop(&self, ctx: &OperationContext) -> Result<()> {
        self.broadcast("stop", |member| async move { member.stop(ctx).await })
            .await
    }

    async fn health(&self, ctx: &OperationContext) -> Result<HealthStatus> {
        let timer = TimedOperation::start();
        let reports = join_all(self.members.iter().map(|(_, member)| member.health(ctx))).await;

        let mut problems = Vec::new();
        let mut details = Vec::with_capacity(reports.len());
        for ((role, _), report) in self.members.iter().zip(reports) {
            match report {
                Ok(status) if status.is_healthy() => {
                    details.push((role.clone(), json!(status.state)));
                }
                Ok(status) => {
                    problems.push(format!("{role}: unhealthy ({})", status.message));
                    details.push((role.clone(), json!(status.state)));
                }
                Err(error) => {
                    problems.push(format!("{role}: unhealthy ({error})"));
                    details.push((role.clone(), json!("unreachable")));
                }
            }
        }

        let status = if problems.is_empty() {
            HealthStatus::new(HealthState::Healthy, "All providers healthy")
        } else {
            HealthStatus::degraded(problems.join("; "))
        };
        Ok(details
            .into_iter()
            .fold(status, |status, (role, state)| status.with_detail(role, state))
            .with_response_time(timer.elapsed_ms()))
    }

    async fn get_stats(&self, ctx: &OperationContext) -> Result<ProviderStats> {
        self.route(Operation::Stats, |member| async move {
            member.get_stats(ctx).await
        })
        .await
    }

    async fn optimize(&self, ctx: &OperationContext) -> Result<()> {
        self.route(Operation::Optimize, |member| async move {
            member.optimize(ctx).await
        })
        .await
    }

    async fn backup(&self, ctx: &OperationContext, path: &Path) -> Result<()> {
        self.route(Operation::Backup, |member| async move {
            member.backup(ctx, path).await
        })
        .await
    }

    async fn restore(&self, ctx: &OperationContext, path: &Path) -> Result<()> {
        self.route(Operation::Restore, |member| async move {
            member.restore(ctx, path).await
        })
        .await
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn provider_type(&self) -> &str {
        HYBRID_PROVIDER_TYPE
    }

    fn capabilities(&self) -> Vec<String> {
        self.members
            .iter()
            .flat_map(|(_, member)| member.capabilities())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    fn configuration(&self) -> ConfigMap {
        let providers: serde_json::Map<String, Value> = self
            .members
            .iter()
            .map(|(role, member)| (role.clone(), json!(member.configuration())))
            .collect();
        ConfigMap::from([
            ("strategy".to_string(), json!(self.strategy.as_str())),
            ("providers".to_string(), Value::Object(providers)),
        ])
    }

    fn is_cloud(&self) -> bool {
        self.members.iter().any(|(_, member)| member.is_cloud())
    }

    fn cost_info(&self) -> CostInfo {
        self.members
            .iter()
            .map(|(_, member)| member.cost_info())
            .sum()
    }
}

#[async_trait]
impl VectorProvider for HybridRouter {
    async fn store(&self, ctx: &OperationContext, items: &[VectorData]) -> Result<()> {
        self.route(Operation::Store, |member| async move {
            member.store(ctx, items).await
        })
        .await
    }

    async fn retrieve(&self, ctx: &OperationContext, ids: &[String]) -> Result<Vec<VectorData>> {
        self.route(Operation::Retrieve, |member| async move {
            member.retrieve(ctx, ids).await
        })
        .await
    }

    async fn update(&self, ctx: &OperationContext, id: &str, item: &VectorData) -> Result<()> {
        self.route(Operation::Update, |member| async move {
            member.update(ctx, id, item).await
        })
        .await
    }

    async fn delete(&self, ctx: &OperationContext, ids: &[String]) -> Result<()> {
        self.route(Operation::Delete, |member| async move {
            member.delete(ctx, ids).await
        })
        .await
    }

    async fn search(&self, ctx: &OperationContext, query: &VectorQuery) -> Result<SearchResults> {
        self.route(Operation::Search, |member| async move {
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
        self.route(Operation::Similar, |member| async move {
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
        self.route(Operation::BatchSimilar, |member| async move {
            member.batch_find_similar(ctx, queries, k).await
        })
        .await
    }

    async fn create_collection(
        &self,
        ctx: &OperationContext,
        config: &CollectionConfig,
    ) -> Result<()> {
        self.route(Operation::Collection, |member| async move {
            member.create_collection(ctx, config).await
        })
        .await
    }

    async fn delete_collection(&self, ctx: &OperationContext, name: &str) -> Result<()> {
        self.route(Operation::Collection, |member| async move {
            member.delete_collection(ctx, name).await
        })
        .await
    }

    async fn list_collections(&self, ctx: &OperationContext) -> Result<Vec<CollectionInfo>> {
        self.route(Operation::Collection, |member| async move {
            member.list_collections(ctx).await
        })
        .await
    }

    async fn get_collection(&self, ctx: &OperationContext, name: &str) -> Result<CollectionInfo> {
        self.route(Operation::Collection, |member| async move {
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
        self.route(Operation::Index, |member| async move {
            member.create_index(ctx, collection, config).await
        })
        .await
    }

    async fn delete_index(&self, ctx: &OperationContext, collection: &str, name: &str) -> Result<()> {
        self.route(Operation::Index, |member| async move {
            member.delete_index(ctx, collection, name).await
        })
        .await
    }

    async fn list_indexes(&self, ctx: &OperationContext, collection: &str) -> Result<Vec<IndexInfo>> {
        self.route(Operation::Index, |member| async move {
            member.list_indexes(ctx, collection).await
        })
        .await
    }

    async fn add_metadata(&self, ctx: &OperationContext, id: &str, metadata: &Metadata) -> Result<()> {
        self.route(Operation::Metadata, |member| async move {
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
        self.route(Operation::Metadata, |member| async move {
            member.update_metadata(ctx, id, metadata).await
        })
        .await
    }

    async fn get_metadata(
        &self,
        ctx: &OperationContext,
        ids: &[String],
    ) -> Result<HashMap<String, Metadata>> {
        self.route(Operation::Metadata, |member| async move {
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
        self.route(Operation::Metadata, |member| async move {
            member.delete_metadata(ctx, ids, keys).await
        })
        .await
    }
}
