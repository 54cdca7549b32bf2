//! Domain layer constants
//!
//! Capability tags advertised by backends, registry categories and the
//! defaults shared by the orchestration layer.

// ============================================================================
// CAPABILITY TAGS
// ============================================================================

/// Backend persists vectors
pub const CAPABILITY_VECTOR_STORAGE: &str = "vector_storage";

/// Backend answers similarity queries
pub const CAPABILITY_SIMILARITY_SEARCH: &str = "similarity_search";

/// Backend filters search results by metadata
pub const CAPABILITY_METADATA_FILTERING: &str = "metadata_filtering";

/// Backend manages named collections
pub const CAPABILITY_COLLECTIONS: &str = "collections";

/// Backend manages secondary indexes
pub const CAPABILITY_INDEXING: &str = "indexing";

/// Backend supports backup and restore
pub const CAPABILITY_BACKUP: &str = "backup";

/// Backend supports batched similarity queries
pub const CAPABILITY_BATCH_SEARCH: &str = "batch_search";

// ============================================================================
// REGISTRY CATEGORIES
// ============================================================================

/// Dedicated vector databases (Milvus, Qdrant, Pinecone, ...)
pub const CATEGORY_VECTOR_DATABASE: &str = "vector_database";

/// AI memory services
pub const CATEGORY_AI_MEMORY: &str = "ai_memory";

/// Utility backends (in-memory, null)
pub const CATEGORY_UTILITY: &str = "utility";

// ============================================================================
// COST
// ============================================================================

/// Currency reported by aggregated cost info
pub const DEFAULT_COST_CURRENCY: &str = "USD";

/// Billing period reported by aggregated cost info
pub const DEFAULT_BILLING_PERIOD: &str = "monthly";

// ============================================================================
// SEARCH
// ============================================================================

/// Result count used when a query leaves `top_k` at zero
pub const DEFAULT_TOP_K: usize = 10;

/// Collection used when a vector does not name one
pub const DEFAULT_COLLECTION: &str = "default";
