//! Infrastructure layer constants
//!
//! Contains constants that are part of the infrastructure implementation.
//! Domain-specific constants are defined in `vpm_domain::constants`.

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "vpm.toml";

/// Default configuration directory name
pub const DEFAULT_CONFIG_DIR: &str = "vpm";

/// Environment variable prefix for configuration
pub const CONFIG_ENV_PREFIX: &str = "VPM";

/// Separator between nested keys in environment variable names
pub const CONFIG_ENV_SEPARATOR: &str = "__";

// ============================================================================
// LOGGING CONSTANTS
// ============================================================================

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable overriding the log filter
pub const LOG_FILTER_ENV: &str = "VPM_LOG";

/// Default log file stem for the rolling appender
pub const DEFAULT_LOG_FILE_STEM: &str = "vpm";

// ============================================================================
// FACTORY CONSTANTS
// ============================================================================

/// Default backend timeout injected by auto-configuration (seconds)
pub const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 30;

/// Configuration key carrying the backend timeout
pub const TIMEOUT_CONFIG_KEY: &str = "timeout_secs";

/// Factory stage: type lookup
pub const STAGE_TYPE_LOOKUP: &str = "type_lookup";

/// Factory stage: schema check and throwaway construction
pub const STAGE_VALIDATION: &str = "validation";

/// Factory stage: real construction
pub const STAGE_CONSTRUCTION: &str = "construction";

// ============================================================================
// ROUTING CONSTANTS
// ============================================================================

/// Name reported by the fallback chain
pub const CHAIN_PROVIDER_NAME: &str = "provider_chain";

/// Type reported by the fallback chain
pub const CHAIN_PROVIDER_TYPE: &str = "chain";

/// Type reported by the hybrid router
pub const HYBRID_PROVIDER_TYPE: &str = "hybrid";

/// Default cap of the fallback attempt history
pub const DEFAULT_FALLBACK_HISTORY_LIMIT: usize = 100;

// ============================================================================
// HEALTH CHECK CONSTANTS
// ============================================================================

/// Default interval between background health checks (seconds)
pub const DEFAULT_HEALTH_CHECK_INTERVAL_SECS: u64 = 30;
