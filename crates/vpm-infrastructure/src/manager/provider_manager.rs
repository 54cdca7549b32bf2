//! Provider manager implementation

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::future::Future;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError, RwLock as StdRwLock};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::{Mutex as AsyncMutex, RwLock};
use tracing::{debug, info, warn};
use vpm_application::ports::registry::ProviderRegistry;
use vpm_domain::{VectorProvider, VectorProviderAdmin};
use vpm_domain::error::{Error, Result};
use vpm_domain::value_objects::{
    CollectionConfig, CollectionInfo, ConfigMap, Metadata, Operation, OperationContext,
    ProviderInfo, ProviderStats, SearchResults, SimilarityResult, VectorData, VectorQuery,
};

use super::health::{HealthCheckTask, HealthRecord, Instances};
use super::performance::{PerformanceMonitor, PerformanceRecord};
use crate::config::ManagerConfig;
use crate::constants::{DEFAULT_HEALTH_CHECK_INTERVAL_SECS, HYBRID_PROVIDER_TYPE};
use crate::factory::ProviderFactory;
use crate::routing::{FallbackAttempt, FallbackChain, HybridRouter};
use crate::utils::TimedOperation;

/// Lifecycle phase of the manager as a whole
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManagerPhase {
    /// Constructed, `initialize` not yet called
    Uninitialized,
    /// `initialize` in progress
    Initializing,
    /// Serving requests
    Ready,
    /// A switch is in progress; requests keep using the old instance
    Switching,
    /// `shutdown` in progress
    ShuttingDown,
    /// All instances stopped and dropped
    ShutDown,
}

impl fmt::Display for ManagerPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let phase = match self {
            Self::Uninitialized => "uninitialized",
            Self::Initializing => "initializing",
            Self::Ready => "ready",
            Self::Switching => "switching",
            Self::ShuttingDown => "shutting_down",
            Self::ShutDown => "shut_down",
        };
        f.write_str(phase)
    }
}

/// Manages named backend instances behind a single active one
///
/// # Example
///
/// ```ignore
/// let manager = ProviderManager::new(config.manager, ProviderRegistry::global());
/// manager.initialize(&ctx).await?;
/// manager.store(&ctx, &[VectorData::new("a", vec![1.0, 0.0])]).await?;
/// manager.switch_provider(&ctx, "replica").await?;
/// manager.shutdown(&ctx).await?;
/// ```
pub struct ProviderManager {
    config: ManagerConfig,
    factory: ProviderFactory,
    instances: Arc<Instances>,
    active: RwLock<Option<String>>,
    performance: PerformanceMonitor,
    phase: Mutex<ManagerPhase>,
    /// Serializes initialize, switch, add/remove and shutdown
    admin: AsyncMutex<()>,
    health_task: AsyncMutex<Option<HealthCheckTask>>,
    fallback: StdRwLock<Option<Arc<FallbackChain>>>,
    hybrid: StdRwLock<Option<Arc<HybridRouter>>>,
}

impl ProviderManager {
    /// Manager building its instances from `registry`
    pub fn new(config: ManagerConfig, registry: Arc<ProviderRegistry>) -> Self {
        let factory = ProviderFactory::new(registry, config.factory.clone());
        Self {
            config,
            factory,
            instances: Arc::new(Instances::default()),
            active: RwLock::new(None),
            performance: PerformanceMonitor::new(),
            phase: Mutex::new(ManagerPhase::Uninitialized),
            admin: AsyncMutex::new(()),
            health_task: AsyncMutex::new(None),
            fallback: StdRwLock::new(None),
            hybrid: StdRwLock::new(None),
        }
    }

    /// Manager over the process-wide registry
    pub fn with_global_registry(config: ManagerConfig) -> Self {
        Self::new(config, ProviderRegistry::global())
    }

    /// Configuration the manager was built with
    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> ManagerPhase {
        *self.phase.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_phase(&self, phase: ManagerPhase) {
        *self.phase.lock().unwrap_or_else(PoisonError::into_inner) = phase;
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Build, initialize and start every configured instance, then pick the
    /// active one
    ///
    /// # Errors
    /// `Lifecycle` unless the manager is uninitialized. On any other failure
    /// the instances started so far are stopped and the manager returns to
    /// uninitialized.
    pub async fn initialize(&self, ctx: &OperationContext) -> Result<()> {
        let _admin = self.admin.lock().await;
        {
            let mut phase = self.phase.lock().unwrap_or_else(PoisonError::into_inner);
            if *phase != ManagerPhase::Uninitialized {
                return Err(Error::lifecycle(format!(
                    "cannot initialize a manager that is {phase}"
                )));
            }
            *phase = ManagerPhase::Initializing;
        }
        info!(instances = self.config.providers.len(), "Initializing provider manager");

        match self.bring_up(ctx).await {
            Ok(()) => {
                self.set_phase(ManagerPhase::Ready);
                info!(
                    active = self.active_provider_name().await.as_deref().unwrap_or_default(),
                    "Provider manager ready"
                );
                Ok(())
            }
            Err(error) => {
                warn!(error = %error, "Provider manager initialization failed, rolling back");
                self.tear_down(ctx).await;
                self.set_phase(ManagerPhase::Uninitialized);
                Err(error)
            }
        }
    }

    async fn bring_up(&self, ctx: &OperationContext) -> Result<()> {
        self.start_instances(ctx).await?;
        self.instances.refresh(ctx).await;

        match self.config.active_provider.as_deref() {
            Some(name) => {
                if let Err(error) = self.activate(ctx, name).await {
                    warn!(
                        provider = name,
                        error = %error,
                        "Configured active provider unavailable, selecting automatically"
                    );
                    self.select_automatically().await?;
                }
            }
            None => self.select_automatically().await?,
        }

        self.install_fallback_chain().await;
        self.install_hybrid_router().await?;

        if self.config.health.enabled {
            let interval = Duration::from_secs(self.health_interval_secs());
            let task = HealthCheckTask::spawn(Arc::clone(&self.instances), interval);
            *self.health_task.lock().await = Some(task);
        }
        Ok(())
    }

    /// Configured polling interval; zero means the default
    fn health_interval_secs(&self) -> u64 {
        match self.config.health.interval_secs {
            0 => {
                warn!(
                    default_secs = DEFAULT_HEALTH_CHECK_INTERVAL_SECS,
                    "Health check interval is zero, using the default"
                );
                DEFAULT_HEALTH_CHECK_INTERVAL_SECS
            }
            secs => secs,
        }
    }

    async fn start_instances(&self, ctx: &OperationContext) -> Result<()> {
        let configured: BTreeMap<_, _> = self.config.providers.iter().collect();
        for (name, provider_config) in configured {
            let mut settings = provider_config.settings.clone();
            settings
                .entry("name".to_string())
                .or_insert_with(|| json!(name));

            match self.start_instance(ctx, &provider_config.provider_type, &settings).await {
                Ok(provider) => {
                    info!(
                        provider = %name,
                        provider_type = %provider_config.provider_type,
                        "Provider started"
                    );
                    self.instances
                        .providers
                        .write()
                        .await
                        .insert(name.clone(), provider);
                    self.instances
                        .health
                        .write()
                        .await
                        .insert(name.clone(), HealthRecord::new(name.as_str()));
                }
                Err(error) if self.config.factory.fail_fast => {
                    return Err(Error::backend(name.as_str(), error));
                }
                Err(error) => {
                    warn!(provider = %name, error = %error, "Skipping provider that failed to start");
                }
            }
        }
        Ok(())
    }

    async fn start_instance(
        &self,
        ctx: &OperationContext,
        provider_type: &str,
        settings: &ConfigMap,
    ) -> Result<Arc<dyn VectorProvider>> {
        let provider = self.factory.create(provider_type, settings)?;
        provider.initialize(ctx, &provider.configuration()).await?;
        if let Err(error) = provider.start(ctx).await {
            let _ = provider.stop(ctx).await;
            return Err(error);
        }
        Ok(provider)
    }

    /// Local instances first, then cloud; first healthy wins, else the
    /// first instance overall
    async fn select_automatically(&self) -> Result<()> {
        let snapshot = self.instances.snapshot().await;
        let Some((first, _)) = snapshot.first() else {
            return Err(Error::NoActiveProvider);
        };

        let health = self.instances.health.read().await.clone();
        let is_healthy = |name: &str| health.get(name).is_some_and(|record| record.is_healthy);
        let (local, cloud): (Vec<_>, Vec<_>) =
            snapshot.iter().partition(|(_, provider)| !provider.is_cloud());

        let chosen = local
            .iter()
            .chain(cloud.iter())
            .map(|(name, _)| name)
            .find(|name| is_healthy(name));

        let name = match chosen {
            Some(name) => {
                info!(provider = %name, "Selected active provider");
                name.clone()
            }
            None => {
                warn!(provider = %first, "No healthy provider, starting degraded");
                first.clone()
            }
        };
        *self.active.write().await = Some(name);
        Ok(())
    }

    async fn install_fallback_chain(&self) {
        let fallback = &self.config.fallback;
        if fallback.providers.is_empty() {
            return;
        }
        let providers = self.instances.providers.read().await;
        let members: Vec<Arc<dyn VectorProvider>> = fallback
            .providers
            .iter()
            .filter_map(|name| {
                let member = providers.get(name).cloned();
                if member.is_none() {
                    warn!(provider = %name, "Fallback member not running, leaving it out");
                }
                member
            })
            .collect();
        drop(providers);

        let chain = FallbackChain::new(members)
            .with_policy(fallback.policy)
            .with_history_limit(fallback.history_limit);
        info!(members = chain.len(), policy = %fallback.policy, "Fallback chain installed");
        *self.fallback.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(chain));
    }

    async fn install_hybrid_router(&self) -> Result<()> {
        let Some(hybrid) = &self.config.hybrid else {
            return Ok(());
        };

        let providers = self.instances.providers.read().await;
        let mut members = BTreeMap::new();
        for (role, name) in &hybrid.members {
            match providers.get(name) {
                Some(provider) => {
                    members.insert(role.clone(), Arc::clone(provider));
                }
                None if self.config.factory.fail_fast => {
                    return Err(Error::provider_not_found(name.as_str()));
                }
                None => {
                    warn!(
                        role = %role,
                        provider = %name,
                        "Hybrid member not running, leaving it out"
                    );
                }
            }
        }
        drop(providers);

        if members.is_empty() {
            return Err(Error::configuration_invalid(
                HYBRID_PROVIDER_TYPE,
                "no configured member is running",
            ));
        }

        let mut routes = HashMap::new();
        for (operation, role) in &hybrid.routes {
            let parsed = operation.parse::<Operation>().map_err(|_| {
                Error::configuration_invalid(
                    HYBRID_PROVIDER_TYPE,
                    format!("route uses unknown operation '{operation}'"),
                )
            })?;
            // Routes to members left out fall back to the first member
            if hybrid.members.contains_key(role) && !members.contains_key(role) {
                continue;
            }
            routes.insert(parsed, role.clone());
        }

        let router = HybridRouter::new(members, hybrid.strategy, routes)?;
        info!(router = router.name(), "Hybrid router installed");
        *self.hybrid.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(router));
        Ok(())
    }

    /// Stop the health task and every instance, then drop all state
    ///
    /// Stop failures are logged, not returned. Calling it again is a no-op.
    pub async fn shutdown(&self, ctx: &OperationContext) -> Result<()> {
        let _admin = self.admin.lock().await;
        if self.phase() == ManagerPhase::ShutDown {
            return Ok(());
        }
        self.set_phase(ManagerPhase::ShuttingDown);
        info!("Shutting down provider manager");

        self.tear_down(ctx).await;

        self.set_phase(ManagerPhase::ShutDown);
        info!("Provider manager shut down");
        Ok(())
    }

    async fn tear_down(&self, ctx: &OperationContext) {
        if let Some(task) = self.health_task.lock().await.take() {
            task.stop().await;
        }

        for (name, provider) in self.instances.snapshot().await {
            if let Err(error) = provider.stop(ctx).await {
                warn!(provider = %name, error = %error, "Provider failed to stop");
            }
        }

        self.instances.clear().await;
        *self.active.write().await = None;
        *self.fallback.write().unwrap_or_else(PoisonError::into_inner) = None;
        *self.hybrid.write().unwrap_or_else(PoisonError::into_inner) = None;
        self.performance.clear();
    }

    // ========================================================================
    // Active instance
    // ========================================================================

    /// Make `name` the active instance if it reports healthy now
    ///
    /// In-flight calls on the previous instance are not drained.
    ///
    /// # Errors
    /// `ProviderNotFound` for unknown names, `ProviderUnhealthy` when the
    /// health probe fails or reports anything but healthy. The previous
    /// active instance stays in place on error.
    pub async fn switch_provider(&self, ctx: &OperationContext, name: &str) -> Result<()> {
        let _admin = self.admin.lock().await;
        let phase = self.phase();
        if matches!(phase, ManagerPhase::ShuttingDown | ManagerPhase::ShutDown) {
            return Err(Error::lifecycle(format!("cannot switch provider while {phase}")));
        }

        let switching = phase == ManagerPhase::Ready;
        if switching {
            self.set_phase(ManagerPhase::Switching);
        }
        let result = self.activate(ctx, name).await;
        if switching {
            self.set_phase(ManagerPhase::Ready);
        }
        result
    }

    async fn activate(&self, ctx: &OperationContext, name: &str) -> Result<()> {
        let provider = self
            .instances
            .providers
            .read()
            .await
            .get(name)
            .cloned()
            .ok_or_else(|| Error::provider_not_found(name))?;

        match self.instances.probe(ctx, name, &provider).await {
            Ok(status) if status.is_healthy() => {}
            Ok(status) => {
                return Err(Error::provider_unhealthy(
                    name,
                    format!("{}: {}", status.state, status.message),
                ));
            }
            Err(error) => return Err(Error::provider_unhealthy(name, error.to_string())),
        }

        let previous = self.active.write().await.replace(name.to_string());
        info!(
            from = previous.as_deref().unwrap_or("none"),
            to = name,
            "Switched active provider"
        );
        Ok(())
    }

    /// Name of the active instance
    pub async fn active_provider_name(&self) -> Option<String> {
        self.active.read().await.clone()
    }

    /// The active instance
    ///
    /// # Errors
    /// `NoActiveProvider` when none is set or it has been removed.
    pub async fn active_provider(&self) -> Result<Arc<dyn VectorProvider>> {
        self.resolve_active().await.map(|(_, provider)| provider)
    }

    async fn resolve_active(&self) -> Result<(String, Arc<dyn VectorProvider>)> {
        let name = self
            .active
            .read()
            .await
            .clone()
            .ok_or(Error::NoActiveProvider)?;
        let provider = self
            .instances
            .providers
            .read()
            .await
            .get(&name)
            .cloned()
            .ok_or(Error::NoActiveProvider)?;
        Ok((name, provider))
    }

    // ========================================================================
    // Instance administration
    // ========================================================================

    /// A managed instance by name
    pub async fn get_provider(&self, name: &str) -> Result<Arc<dyn VectorProvider>> {
        self.instances
            .providers
            .read()
            .await
            .get(name)
            .cloned()
            .ok_or_else(|| Error::provider_not_found(name))
    }

    /// Manage an already started instance
    ///
    /// # Errors
    /// `InvalidArgument` when the name is taken.
    pub async fn add_provider(&self, name: &str, provider: Arc<dyn VectorProvider>) -> Result<()> {
        let _admin = self.admin.lock().await;
        let mut providers = self.instances.providers.write().await;
        if providers.contains_key(name) {
            return Err(Error::invalid_argument(format!(
                "Provider '{name}' is already managed"
            )));
        }
        providers.insert(name.to_string(), provider);
        drop(providers);

        self.instances
            .health
            .write()
            .await
            .insert(name.to_string(), HealthRecord::new(name));
        info!(provider = name, "Provider added");
        Ok(())
    }

    /// Stop and forget an instance
    ///
    /// Removing the active instance leaves the manager without one until
    /// the next switch.
    pub async fn remove_provider(&self, ctx: &OperationContext, name: &str) -> Result<()> {
        let _admin = self.admin.lock().await;
        let provider = self
            .instances
            .providers
            .write()
            .await
            .remove(name)
            .ok_or_else(|| Error::provider_not_found(name))?;
        self.instances.health.write().await.remove(name);
        self.performance.remove(name);

        if let Err(error) = provider.stop(ctx).await {
            warn!(provider = name, error = %error, "Provider failed to stop");
        }
        info!(provider = name, "Provider removed");
        Ok(())
    }

    /// Summary of every managed instance
    pub async fn list_providers(&self) -> HashMap<String, ProviderInfo> {
        let active = self.active_provider_name().await;
        let health = self.instances.health.read().await.clone();
        self.instances
            .snapshot()
            .await
            .into_iter()
            .map(|(name, provider)| {
                let info = ProviderInfo {
                    name: name.clone(),
                    provider_type: provider.provider_type().to_string(),
                    capabilities: provider.capabilities(),
                    is_cloud: provider.is_cloud(),
                    is_active: active.as_deref() == Some(name.as_str()),
                    is_healthy: health.get(&name).is_some_and(|record| record.is_healthy),
                    cost_info: provider.cost_info(),
                };
                (name, info)
            })
            .collect()
    }

    /// Probe every instance now and return the merged health table
    pub async fn get_provider_health(&self, ctx: &OperationContext) -> HashMap<String, HealthRecord> {
        self.instances.refresh(ctx).await
    }

    /// Copies of the per-instance performance records
    pub fn get_provider_performance(&self) -> HashMap<String, PerformanceRecord> {
        self.performance.snapshot()
    }

    /// Optimize every instance; failures are logged
    pub async fn optimize_providers(&self, ctx: &OperationContext) {
        for (name, provider) in self.instances.snapshot().await {
            let timer = TimedOperation::start();
            let result = provider.optimize(ctx).await;
            self.performance
                .record(&name, Operation::Optimize.as_str(), timer.elapsed(), result.is_ok());
            match result {
                Ok(()) => debug!(provider = %name, "Provider optimized"),
                Err(error) => warn!(provider = %name, error = %error, "Provider optimization failed"),
            }
        }
    }

    /// Fallback chain over the configured instances
    pub fn fallback_chain(&self) -> Option<Arc<FallbackChain>> {
        self.fallback
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Hybrid router over the configured roles
    pub fn hybrid_router(&self) -> Option<Arc<HybridRouter>> {
        self.hybrid
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Attempt history of the fallback chain; empty without one
    pub fn fallback_history(&self) -> Vec<FallbackAttempt> {
        self.fallback_chain()
            .map(|chain| chain.history())
            .unwrap_or_default()
    }

    // ========================================================================
    // Request path
    // ========================================================================

    async fn execute<T, F, Fut>(&self, operation: &str, call: F) -> Result<T>
    where
        F: FnOnce(Arc<dyn VectorProvider>) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let (name, provider) = self.resolve_active().await?;
        debug!(operation, provider = %name, "Dispatching to active provider");

        let timer = TimedOperation::start();
        let result = call(provider).await;
        self.performance
            .record(&name, operation, timer.elapsed(), result.is_ok());
        result.map_err(|error| Error::backend(name, error))
    }

    /// Store vectors on the active instance
    pub async fn store(&self, ctx: &OperationContext, items: &[VectorData]) -> Result<()> {
        self.execute("store", |provider| async move { provider.store(ctx, items).await })
            .await
    }

    /// Fetch vectors from the active instance
    pub async fn retrieve(&self, ctx: &OperationContext, ids: &[String]) -> Result<Vec<VectorData>> {
        self.execute("retrieve", |provider| async move {
            provider.retrieve(ctx, ids).await
        })
        .await
    }

    /// Replace a vector on the active instance
    pub async fn update(&self, ctx: &OperationContext, id: &str, item: &VectorData) -> Result<()> {
        self.execute("update", |provider| async move {
            provider.update(ctx, id, item).await
        })
        .await
    }

    /// Delete vectors from the active instance
    pub async fn delete(&self, ctx: &OperationContext, ids: &[String]) -> Result<()> {
        self.execute("delete", |provider| async move { provider.delete(ctx, ids).await })
            .await
    }

    /// Query the active instance
    pub async fn search(&self, ctx: &OperationContext, query: &VectorQuery) -> Result<SearchResults> {
        self.execute("search", |provider| async move {
            provider.search(ctx, query).await
        })
        .await
    }

    /// Nearest neighbours on the active instance
    pub async fn find_similar(
        &self,
        ctx: &OperationContext,
        embedding: &[f32],
        k: usize,
        filters: &Metadata,
    ) -> Result<Vec<SimilarityResult>> {
        self.execute("find_similar", |provider| async move {
            provider.find_similar(ctx, embedding, k, filters).await
        })
        .await
    }

    /// Nearest neighbours of several embeddings on the active instance
    pub async fn batch_find_similar(
        &self,
        ctx: &OperationContext,
        queries: &[Vec<f32>],
        k: usize,
    ) -> Result<Vec<Vec<SimilarityResult>>> {
        self.execute("batch_find_similar", |provider| async move {
            provider.batch_find_similar(ctx, queries, k).await
        })
        .await
    }

    /// Create a collection on the active instance
    pub async fn create_collection(
        &self,
        ctx: &OperationContext,
        config: &CollectionConfig,
    ) -> Result<()> {
        self.execute("create_collection", |provider| async move {
            provider.create_collection(ctx, config).await
        })
        .await
    }

    /// Delete a collection on the active instance
    pub async fn delete_collection(&self, ctx: &OperationContext, name: &str) -> Result<()> {
        self.execute("delete_collection", |provider| async move {
            provider.delete_collection(ctx, name).await
        })
        .await
    }

    /// Collections of the active instance
    pub async fn list_collections(&self, ctx: &OperationContext) -> Result<Vec<CollectionInfo>> {
        self.execute("list_collections", |provider| async move {
            provider.list_collections(ctx).await
        })
        .await
    }

    /// Statistics of the active instance
    pub async fn get_stats(&self, ctx: &OperationContext) -> Result<ProviderStats> {
        self.execute("get_stats", |provider| async move { provider.get_stats(ctx).await })
            .await
    }

    /// Back up the active instance to `path`
    pub async fn backup(&self, ctx: &OperationContext, path: &Path) -> Result<()> {
        self.execute("backup", |provider| async move { provider.backup(ctx, path).await })
            .await
    }

    /// Restore the active instance from `path`
    pub async fn restore(&self, ctx: &OperationContext, path: &Path) -> Result<()> {
        self.execute("restore", |provider| async move {
            provider.restore(ctx, path).await
        })
        .await
    }
}
