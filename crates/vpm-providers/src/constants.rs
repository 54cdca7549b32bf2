//! Provider Constants
//!
//! Constants specific to the reference provider implementations.

// ============================================================================
// PROVIDER TYPE IDENTIFIERS
// ============================================================================

/// Registry type of the in-memory provider
pub const MEMORY_PROVIDER_TYPE: &str = "memory";

/// Registry type of the null provider
pub const NULL_PROVIDER_TYPE: &str = "null";

// ============================================================================
// IN-MEMORY PROVIDER
// ============================================================================

/// Index kind reported for collections without an explicit index
pub const MEMORY_DEFAULT_INDEX_TYPE: &str = "flat";

/// Status reported for live collections
pub const COLLECTION_STATUS_READY: &str = "ready";

/// State reported for built indexes
pub const INDEX_STATE_READY: &str = "ready";

/// Snapshot format version written by `backup`
pub const MEMORY_SNAPSHOT_VERSION: u32 = 1;
