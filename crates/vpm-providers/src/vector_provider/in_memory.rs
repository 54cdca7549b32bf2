//! In-memory vector provider implementation
//!
//! Full implementation of the capability contract over concurrent hash maps.
//! Data lives only as long as the process unless written out with `backup`.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, RwLock};
use std::time::Instant;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;
use vpm_domain::constants::{
    CAPABILITY_BACKUP, CAPABILITY_BATCH_SEARCH, CAPABILITY_COLLECTIONS, CAPABILITY_INDEXING,
    CAPABILITY_METADATA_FILTERING, CAPABILITY_SIMILARITY_SEARCH, CAPABILITY_VECTOR_STORAGE,
};
use vpm_domain::error::{Error, Result};
use vpm_domain::ports::providers::{VectorProvider, VectorProviderAdmin};
use vpm_domain::value_objects::{
    CollectionConfig, CollectionInfo, ConfigMap, CostInfo, DistanceMetric, HealthState,
    HealthStatus, IndexConfig, IndexInfo, Metadata, OperationContext, ProviderStats,
    SearchResults, SimilarityResult, VectorData, VectorQuery, filters_match,
};

use crate::constants::{
    COLLECTION_STATUS_READY, INDEX_STATE_READY, MEMORY_PROVIDER_TYPE, MEMORY_SNAPSHOT_VERSION,
};
use crate::utils::{ScoredCandidate, score_vectors, top_k};

const CAPABILITIES: [&str; 7] = [
    CAPABILITY_VECTOR_STORAGE,
    CAPABILITY_SIMILARITY_SEARCH,
    CAPABILITY_METADATA_FILTERING,
    CAPABILITY_COLLECTIONS,
    CAPABILITY_INDEXING,
    CAPABILITY_BACKUP,
    CAPABILITY_BATCH_SEARCH,
];

/// Typed settings of the in-memory provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemorySettings {
    /// Instance name reported by `name()`, fixed at construction
    pub name: String,
    /// Dimension enforced on auto-created collections (0 = take from first vector)
    pub dimension: usize,
    /// Metric of auto-created collections
    pub metric: DistanceMetric,
    /// Create a collection on first `store` into it
    pub auto_create_collections: bool,
    /// Upper bound on stored vectors (0 = unbounded)
    pub max_vectors: usize,
}

impl Default for MemorySettings {
    fn default() -> Self {
        Self {
            name: MEMORY_PROVIDER_TYPE.to_string(),
            dimension: 0,
            metric: DistanceMetric::Cosine,
            auto_create_collections: true,
            max_vectors: 0,
        }
    }
}

impl MemorySettings {
    /// Parse settings out of a configuration map; unknown keys are ignored
    pub fn from_config(config: &ConfigMap) -> Result<Self> {
        let value = serde_json::to_value(config)?;
        serde_json::from_value(value)
            .map_err(|e| Error::configuration_invalid(MEMORY_PROVIDER_TYPE, e.to_string()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CollectionData {
    config: CollectionConfig,
    vectors: HashMap<String, VectorData>,
    indexes: HashMap<String, IndexInfo>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CollectionData {
    fn new(config: CollectionConfig) -> Self {
        let now = Utc::now();
        Self {
            config,
            vectors: HashMap::new(),
            indexes: HashMap::new(),
            created_at: now,
            updated_at: now,
        }
    }

    fn size_bytes(&self) -> u64 {
        let floats: usize = self.vectors.values().map(|v| v.vector.len()).sum();
        (floats * std::mem::size_of::<f32>()) as u64
    }

    fn info(&self) -> CollectionInfo {
        CollectionInfo {
            name: self.config.name.clone(),
            dimension: self.config.dimension,
            metric: self.config.metric,
            vector_count: self.vectors.len() as u64,
            size_bytes: self.size_bytes(),
            status: COLLECTION_STATUS_READY.to_string(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[derive(Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    collections: Vec<CollectionData>,
}

/// In-memory vector provider
///
/// Collections are kept in a `DashMap`; a vector belongs to exactly one
/// collection and is addressed by its identifier across collections.
pub struct InMemoryVectorProvider {
    name: String,
    settings: RwLock<MemorySettings>,
    configuration: RwLock<ConfigMap>,
    collections: Arc<DashMap<String, CollectionData>>,
    state: RwLock<HealthState>,
    started_at: RwLock<Option<Instant>>,
    last_operation: RwLock<Option<DateTime<Utc>>>,
}

impl InMemoryVectorProvider {
    /// Create a provider with default settings
    pub fn new() -> Self {
        Self::with_settings(MemorySettings::default(), ConfigMap::new())
    }

    /// Create a provider from a configuration map
    pub fn from_config(config: &ConfigMap) -> Result<Self> {
        let settings = MemorySettings::from_config(config)?;
        Ok(Self::with_settings(settings, config.clone()))
    }

    fn with_settings(settings: MemorySettings, configuration: ConfigMap) -> Self {
        Self {
            name: settings.name.clone(),
            settings: RwLock::new(settings),
            configuration: RwLock::new(configuration),
            collections: Arc::new(DashMap::new()),
            state: RwLock::new(HealthState::NotInitialized),
            started_at: RwLock::new(None),
            last_operation: RwLock::new(None),
        }
    }

    fn settings(&self) -> MemorySettings {
        self.settings
            .read()
            .map(|s| s.clone())
            .unwrap_or_default()
    }

    fn set_state(&self, state: HealthState) {
        if let Ok(mut guard) = self.state.write() {
            *guard = state;
        }
    }

    fn current_state(&self) -> HealthState {
        self.state.read().map(|s| *s).unwrap_or_default()
    }

    fn mark_operation(&self) {
        if let Ok(mut guard) = self.last_operation.write() {
            *guard = Some(Utc::now());
        }
    }

    fn total_vectors(&self) -> usize {
        self.collections.iter().map(|c| c.vectors.len()).sum()
    }

    /// Name of the collection currently holding `id`
    fn locate(&self, id: &str) -> Option<String> {
        self.collections
            .iter()
            .find(|c| c.vectors.contains_key(id))
            .map(|c| c.key().clone())
    }

    fn with_vector_mut<F>(&self, id: &str, mutate: F) -> Result<()>
    where
        F: FnOnce(&mut VectorData),
    {
        let collection = self
            .locate(id)
            .ok_or_else(|| Error::not_found(format!("vector '{id}'")))?;
        let mut data = self
            .collections
            .get_mut(&collection)
            .ok_or_else(|| Error::not_found(format!("collection '{collection}'")))?;
        let vector = data
            .vectors
            .get_mut(id)
            .ok_or_else(|| Error::not_found(format!("vector '{id}'")))?;
        mutate(vector);
        data.touch();
        Ok(())
    }

    fn score_collection(
        data: &CollectionData,
        embedding: &[f32],
        accept: impl Fn(&VectorData) -> bool,
        include_vector: bool,
    ) -> Vec<ScoredCandidate<SimilarityResult>> {
        let now = Utc::now();
        data.vectors
            .values()
            .filter(|v| !v.is_expired(now) && accept(v))
            .map(|v| {
                let (score, distance) = score_vectors(data.config.metric, embedding, &v.vector);
                ScoredCandidate {
                    score,
                    distance,
                    item: SimilarityResult {
                        id: v.id.clone(),
                        score,
                        distance,
                        metadata: v.metadata.clone(),
                        vector: include_vector.then(|| v.vector.clone()),
                    },
                }
            })
            .collect()
    }

    fn similar_across_collections(
        &self,
        embedding: &[f32],
        k: usize,
        filters: &Metadata,
    ) -> Vec<SimilarityResult> {
        let candidates: Vec<_> = self
            .collections
            .iter()
            .filter(|c| c.config.dimension == embedding.len())
            .flat_map(|c| {
                Self::score_collection(&c, embedding, |v| filters_match(filters, &v.metadata), false)
            })
            .collect();
        top_k(candidates, k).into_iter().map(|c| c.item).collect()
    }
}

impl Default for InMemoryVectorProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorProviderAdmin for InMemoryVectorProvider {
    async fn initialize(&self, ctx: &OperationContext, config: &ConfigMap) -> Result<()> {
        ctx.ensure_active("initialize")?;
        let mut merged = self
            .configuration
            .read()
            .map(|c| c.clone())
            .unwrap_or_default();
        merged.extend(config.iter().map(|(k, v)| (k.clone(), v.clone())));
        let settings = MemorySettings::from_config(&merged)?;

        if let Ok(mut guard) = self.settings.write() {
            *guard = settings;
        }
        if let Ok(mut guard) = self.configuration.write() {
            *guard = merged;
        }
        self.set_state(HealthState::NotStarted);
        Ok(())
    }

    async fn start(&self, ctx: &OperationContext) -> Result<()> {
        ctx.ensure_active("start")?;
        if self.current_state() == HealthState::NotInitialized {
            return Err(Error::invalid_argument(
                "in-memory provider must be initialized before start",
            ));
        }
        if let Ok(mut guard) = self.started_at.write() {
            *guard = Some(Instant::now());
        }
        self.set_state(HealthState::Healthy);
        debug!(provider = %self.name(), "In-memory provider started");
        Ok(())
    }

    async fn stop(&self, _ctx: &OperationContext) -> Result<()> {
        if let Ok(mut guard) = self.started_at.write() {
            *guard = None;
        }
        self.set_state(HealthState::NotStarted);
        Ok(())
    }

    async fn health(&self, ctx: &OperationContext) -> Result<HealthStatus> {
        ctx.ensure_active("health")?;
        let state = self.current_state();
        let message = match state {
            HealthState::Healthy => "in-memory store ready".to_string(),
            other => format!("in-memory store {other}"),
        };
        Ok(HealthStatus::new(state, message)
            .with_detail("collections", self.collections.len())
            .with_detail("vectors", self.total_vectors()))
    }

    async fn get_stats(&self, ctx: &OperationContext) -> Result<ProviderStats> {
        ctx.ensure_active("get_stats")?;
        let uptime_secs = self
            .started_at
            .read()
            .ok()
            .and_then(|s| s.map(|t| t.elapsed().as_secs()))
            .unwrap_or(0);
        Ok(ProviderStats {
            name: self.name().to_string(),
            provider_type: MEMORY_PROVIDER_TYPE.to_string(),
            status: self.current_state(),
            total_vectors: self.total_vectors() as u64,
            total_collections: self.collections.len() as u64,
            total_size_bytes: self.collections.iter().map(|c| c.size_bytes()).sum(),
            uptime_secs,
            last_operation: self.last_operation.read().ok().and_then(|t| *t),
        })
    }

    async fn optimize(&self, ctx: &OperationContext) -> Result<()> {
        ctx.ensure_active("optimize")?;
        let now = Utc::now();
        let mut purged = 0usize;
        for mut data in self.collections.iter_mut() {
            let before = data.vectors.len();
            data.vectors.retain(|_, v| !v.is_expired(now));
            purged += before - data.vectors.len();
        }
        debug!(provider = %self.name(), purged, "Purged expired vectors");
        Ok(())
    }

    async fn backup(&self, ctx: &OperationContext, path: &Path) -> Result<()> {
        ctx.ensure_active("backup")?;
        let snapshot = Snapshot {
            version: MEMORY_SNAPSHOT_VERSION,
            collections: self.collections.iter().map(|c| c.value().clone()).collect(),
        };
        let bytes = serde_json::to_vec_pretty(&snapshot)?;
        tokio::fs::write(path, bytes)
            .await
            .map_err(|e| Error::io_with_source(format!("writing {}", path.display()), e))
    }

    async fn restore(&self, ctx: &OperationContext, path: &Path) -> Result<()> {
        ctx.ensure_active("restore")?;
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| Error::io_with_source(format!("reading {}", path.display()), e))?;
        let snapshot: Snapshot = serde_json::from_slice(&bytes)?;
        if snapshot.version != MEMORY_SNAPSHOT_VERSION {
            return Err(Error::invalid_argument(format!(
                "unsupported snapshot version {}",
                snapshot.version
            )));
        }
        self.collections.clear();
        for data in snapshot.collections {
            self.collections.insert(data.config.name.clone(), data);
        }
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn provider_type(&self) -> &str {
        MEMORY_PROVIDER_TYPE
    }

    fn capabilities(&self) -> Vec<String> {
        CAPABILITIES.iter().map(ToString::to_string).collect()
    }

    fn configuration(&self) -> ConfigMap {
        self.configuration
            .read()
            .map(|c| c.clone())
            .unwrap_or_default()
    }

    fn is_cloud(&self) -> bool {
        false
    }

    fn cost_info(&self) -> CostInfo {
        CostInfo::free()
    }
}

#[async_trait]
impl VectorProvider for InMemoryVectorProvider {
    async fn store(&self, ctx: &OperationContext, items: &[VectorData]) -> Result<()> {
        ctx.ensure_active("store")?;
        let settings = self.settings();
        if settings.max_vectors > 0 && self.total_vectors() + items.len() > settings.max_vectors {
            return Err(Error::vector_db(format!(
                "capacity of {} vectors exceeded",
                settings.max_vectors
            )));
        }

        // Validate the whole batch before writing any of it
        let mut dimensions: HashMap<&str, usize> = HashMap::new();
        for item in items {
            if item.vector.is_empty() {
                return Err(Error::invalid_argument(format!(
                    "vector '{}' has no values",
                    item.id
                )));
            }
            let expected = match dimensions.get(item.collection.as_str()) {
                Some(dimension) => *dimension,
                None => {
                    let dimension = match self.collections.get(&item.collection) {
                        Some(data) => data.config.dimension,
                        None if !settings.auto_create_collections => {
                            return Err(Error::not_found(format!(
                                "collection '{}'",
                                item.collection
                            )));
                        }
                        None if settings.dimension > 0 => settings.dimension,
                        None => item.vector.len(),
                    };
                    dimensions.insert(item.collection.as_str(), dimension);
                    dimension
                }
            };
            if item.vector.len() != expected {
                return Err(Error::invalid_argument(format!(
                    "vector '{}' has dimension {}, collection '{}' expects {}",
                    item.id,
                    item.vector.len(),
                    item.collection,
                    expected
                )));
            }
        }

        for item in items {
            let dimension = dimensions
                .get(item.collection.as_str())
                .copied()
                .unwrap_or(item.vector.len());
            let mut data = self
                .collections
                .entry(item.collection.clone())
                .or_insert_with(|| {
                    CollectionData::new(
                        CollectionConfig::new(&item.collection, dimension)
                            .with_metric(settings.metric),
                    )
                });
            data.vectors.insert(item.id.clone(), item.clone());
            data.touch();
        }
        self.mark_operation();
        Ok(())
    }

    async fn retrieve(&self, ctx: &OperationContext, ids: &[String]) -> Result<Vec<VectorData>> {
        ctx.ensure_active("retrieve")?;
        let now = Utc::now();
        let found = ids
            .iter()
            .filter_map(|id| {
                self.collections
                    .iter()
                    .find_map(|c| c.vectors.get(id).cloned())
            })
            .filter(|v| !v.is_expired(now))
            .collect();
        self.mark_operation();
        Ok(found)
    }

    async fn update(&self, ctx: &OperationContext, id: &str, item: &VectorData) -> Result<()> {
        ctx.ensure_active("update")?;
        let mut replacement = item.clone();
        replacement.id = id.to_string();
        self.with_vector_mut(id, |stored| {
            replacement.collection = stored.collection.clone();
            *stored = replacement;
        })?;
        self.mark_operation();
        Ok(())
    }

    async fn delete(&self, ctx: &OperationContext, ids: &[String]) -> Result<()> {
        ctx.ensure_active("delete")?;
        for mut data in self.collections.iter_mut() {
            let before = data.vectors.len();
            for id in ids {
                data.vectors.remove(id);
            }
            if data.vectors.len() != before {
                data.touch();
            }
        }
        self.mark_operation();
        Ok(())
    }

    async fn search(&self, ctx: &OperationContext, query: &VectorQuery) -> Result<SearchResults> {
        ctx.ensure_active("search")?;
        let started = Instant::now();
        // Unknown collections yield an empty result set
        let Some(data) = self.collections.get(&query.collection) else {
            return Ok(SearchResults {
                namespace: query.namespace.clone(),
                ..Default::default()
            });
        };
        if query.vector.len() != data.config.dimension {
            return Err(Error::invalid_argument(format!(
                "query has dimension {}, collection '{}' expects {}",
                query.vector.len(),
                query.collection,
                data.config.dimension
            )));
        }

        let candidates: Vec<_> = Self::score_collection(
            &data,
            &query.vector,
            |v| query.accepts(v),
            query.include_vector,
        )
        .into_iter()
        .filter(|c| query.threshold.is_none_or(|t| c.score >= t))
        .collect();
        let total = candidates.len();
        let results = top_k(candidates, query.effective_top_k())
            .into_iter()
            .map(|c| c.item)
            .collect();
        drop(data);

        self.mark_operation();
        Ok(SearchResults {
            results,
            total,
            duration_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            namespace: query.namespace.clone(),
        })
    }

    async fn find_similar(
        &self,
        ctx: &OperationContext,
        embedding: &[f32],
        k: usize,
        filters: &Metadata,
    ) -> Result<Vec<SimilarityResult>> {
        ctx.ensure_active("find_similar")?;
        let results = self.similar_across_collections(embedding, k, filters);
        self.mark_operation();
        Ok(results)
    }

    async fn batch_find_similar(
        &self,
        ctx: &OperationContext,
        queries: &[Vec<f32>],
        k: usize,
    ) -> Result<Vec<Vec<SimilarityResult>>> {
        ctx.ensure_active("batch_find_similar")?;
        let no_filters = Metadata::new();
        let results = queries
            .iter()
            .map(|q| self.similar_across_collections(q, k, &no_filters))
            .collect();
        self.mark_operation();
        Ok(results)
    }

    async fn create_collection(
        &self,
        ctx: &OperationContext,
        config: &CollectionConfig,
    ) -> Result<()> {
        ctx.ensure_active("create_collection")?;
        if config.dimension == 0 {
            return Err(Error::invalid_argument(format!(
                "collection '{}' needs a non-zero dimension",
                config.name
            )));
        }
        match self.collections.entry(config.name.clone()) {
            dashmap::mapref::entry::Entry::Occupied(_) => Err(Error::vector_db(format!(
                "Collection '{}' already exists",
                config.name
            ))),
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(CollectionData::new(config.clone()));
                Ok(())
            }
        }
    }

    async fn delete_collection(&self, ctx: &OperationContext, name: &str) -> Result<()> {
        ctx.ensure_active("delete_collection")?;
        self.collections.remove(name);
        Ok(())
    }

    async fn list_collections(&self, ctx: &OperationContext) -> Result<Vec<CollectionInfo>> {
        ctx.ensure_active("list_collections")?;
        let mut collections: Vec<_> = self.collections.iter().map(|c| c.info()).collect();
        collections.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(collections)
    }

    async fn get_collection(&self, ctx: &OperationContext, name: &str) -> Result<CollectionInfo> {
        ctx.ensure_active("get_collection")?;
        self.collections
            .get(name)
            .map(|c| c.info())
            .ok_or_else(|| Error::not_found(format!("collection '{name}'")))
    }

    async fn create_index(
        &self,
        ctx: &OperationContext,
        collection: &str,
        config: &IndexConfig,
    ) -> Result<()> {
        ctx.ensure_active("create_index")?;
        let mut data = self
            .collections
            .get_mut(collection)
            .ok_or_else(|| Error::not_found(format!("collection '{collection}'")))?;
        if data.indexes.contains_key(&config.name) {
            return Err(Error::vector_db(format!(
                "Index '{}' already exists on '{collection}'",
                config.name
            )));
        }
        data.indexes.insert(
            config.name.clone(),
            IndexInfo {
                name: config.name.clone(),
                index_type: config.index_type.clone(),
                state: INDEX_STATE_READY.to_string(),
                created_at: Utc::now(),
            },
        );
        data.touch();
        Ok(())
    }

    async fn delete_index(&self, ctx: &OperationContext, collection: &str, name: &str) -> Result<()> {
        ctx.ensure_active("delete_index")?;
        let mut data = self
            .collections
            .get_mut(collection)
            .ok_or_else(|| Error::not_found(format!("collection '{collection}'")))?;
        data.indexes
            .remove(name)
            .ok_or_else(|| Error::not_found(format!("index '{name}' on '{collection}'")))?;
        data.touch();
        Ok(())
    }

    async fn list_indexes(&self, ctx: &OperationContext, collection: &str) -> Result<Vec<IndexInfo>> {
        ctx.ensure_active("list_indexes")?;
        let data = self
            .collections
            .get(collection)
            .ok_or_else(|| Error::not_found(format!("collection '{collection}'")))?;
        let mut indexes: Vec<_> = data.indexes.values().cloned().collect();
        indexes.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(indexes)
    }

    async fn add_metadata(&self, ctx: &OperationContext, id: &str, metadata: &Metadata) -> Result<()> {
        ctx.ensure_active("add_metadata")?;
        self.with_vector_mut(id, |stored| {
            stored
                .metadata
                .extend(metadata.iter().map(|(k, v)| (k.clone(), v.clone())));
        })
    }

    async fn update_metadata(
        &self,
        ctx: &OperationContext,
        id: &str,
        metadata: &Metadata,
    ) -> Result<()> {
        ctx.ensure_active("update_metadata")?;
        self.with_vector_mut(id, |stored| stored.metadata = metadata.clone())
    }

    async fn get_metadata(
        &self,
        ctx: &OperationContext,
        ids: &[String],
    ) -> Result<HashMap<String, Metadata>> {
        ctx.ensure_active("get_metadata")?;
        Ok(ids
            .iter()
            .filter_map(|id| {
                self.collections
                    .iter()
                    .find_map(|c| c.vectors.get(id).map(|v| (id.clone(), v.metadata.clone())))
            })
            .collect())
    }

    async fn delete_metadata(
        &self,
        ctx: &OperationContext,
        ids: &[String],
        keys: &[String],
    ) -> Result<()> {
        ctx.ensure_active("delete_metadata")?;
        for mut data in self.collections.iter_mut() {
            for id in ids {
                if let Some(stored) = data.vectors.get_mut(id) {
                    for key in keys {
                        stored.metadata.remove(key);
                    }
                }
            }
        }
        Ok(())
    }
}

// ============================================================================
// Auto-registration via linkme distributed slice
// ============================================================================

use vpm_application::ports::registry::{
    ConfigField, ConfigValueKind, ProviderDescriptor, VECTOR_PROVIDERS, VectorProviderEntry,
};
use vpm_domain::constants::CATEGORY_UTILITY;

/// Static descriptor of the in-memory provider
pub fn in_memory_descriptor() -> ProviderDescriptor {
    ProviderDescriptor::new(MEMORY_PROVIDER_TYPE)
        .with_description("In-memory vector store (fast, non-persistent)")
        .with_category(CATEGORY_UTILITY)
        .with_capabilities(CAPABILITIES)
        .cloud(false)
        .with_cost(CostInfo::free())
        .with_default("metric", "cosine")
        .with_default("auto_create_collections", true)
        .with_field(ConfigField::optional("name", ConfigValueKind::String))
        .with_field(ConfigField::optional("dimension", ConfigValueKind::Integer))
        .with_field(ConfigField::optional("metric", ConfigValueKind::String))
        .with_field(ConfigField::optional(
            "auto_create_collections",
            ConfigValueKind::Bool,
        ))
        .with_field(ConfigField::optional("max_vectors", ConfigValueKind::Integer))
        .with_tag("local")
}

/// Factory function for creating in-memory provider instances
fn in_memory_factory(config: &ConfigMap) -> Result<Arc<dyn VectorProvider>> {
    Ok(Arc::new(InMemoryVectorProvider::from_config(config)?))
}

#[linkme::distributed_slice(VECTOR_PROVIDERS)]
static MEMORY_PROVIDER: VectorProviderEntry = VectorProviderEntry {
    name: MEMORY_PROVIDER_TYPE,
    description: "In-memory vector store (fast, non-persistent)",
    descriptor: in_memory_descriptor,
    factory: in_memory_factory,
};
