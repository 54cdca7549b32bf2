//! Provider-level descriptive payloads: configuration maps, cost and stats

use std::collections::HashMap;
use std::ops::Add;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::health::HealthState;
use crate::constants::{DEFAULT_BILLING_PERIOD, DEFAULT_COST_CURRENCY};

/// Key/value configuration handed to a backend
pub type ConfigMap = HashMap<String, Value>;

/// Cost reported by a backend
///
/// Amounts share the currency and billing period of the report; summing
/// reports of mixed currencies keeps the left-hand currency.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CostInfo {
    /// ISO currency code
    pub currency: String,
    /// Compute cost
    pub compute_cost: f64,
    /// Data transfer cost
    pub transfer_cost: f64,
    /// Storage cost
    pub storage_cost: f64,
    /// Total cost
    pub total_cost: f64,
    /// Billing period (e.g. `monthly`)
    pub billing_period: String,
    /// Free tier already consumed
    #[serde(default)]
    pub free_tier_used: bool,
    /// Free tier allowance
    #[serde(default)]
    pub free_tier_limit: f64,
}

impl CostInfo {
    /// Zero cost in the default currency and period
    pub fn free() -> Self {
        Self {
            currency: DEFAULT_COST_CURRENCY.to_string(),
            compute_cost: 0.0,
            transfer_cost: 0.0,
            storage_cost: 0.0,
            total_cost: 0.0,
            billing_period: DEFAULT_BILLING_PERIOD.to_string(),
            free_tier_used: false,
            free_tier_limit: 0.0,
        }
    }

    /// Cost with the given monthly total attributed to compute
    pub fn monthly(total_cost: f64) -> Self {
        Self {
            compute_cost: total_cost,
            total_cost,
            ..Self::free()
        }
    }
}

impl Default for CostInfo {
    fn default() -> Self {
        Self::free()
    }
}

impl Add for CostInfo {
    type Output = CostInfo;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            currency: self.currency,
            compute_cost: self.compute_cost + rhs.compute_cost,
            transfer_cost: self.transfer_cost + rhs.transfer_cost,
            storage_cost: self.storage_cost + rhs.storage_cost,
            total_cost: self.total_cost + rhs.total_cost,
            billing_period: self.billing_period,
            free_tier_used: self.free_tier_used || rhs.free_tier_used,
            free_tier_limit: self.free_tier_limit + rhs.free_tier_limit,
        }
    }
}

impl std::iter::Sum for CostInfo {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::free(), Add::add)
    }
}

/// Statistics reported by a backend's `get_stats`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderStats {
    /// Instance name
    pub name: String,
    /// Backend type identifier
    pub provider_type: String,
    /// Current lifecycle state
    pub status: HealthState,
    /// Stored vectors across collections
    pub total_vectors: u64,
    /// Number of collections
    pub total_collections: u64,
    /// Approximate storage footprint in bytes
    pub total_size_bytes: u64,
    /// Seconds since start
    pub uptime_secs: u64,
    /// Last data-plane operation
    #[serde(default)]
    pub last_operation: Option<DateTime<Utc>>,
}

/// Summary of one managed instance, as listed by the manager
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderInfo {
    /// Instance name
    pub name: String,
    /// Backend type identifier
    pub provider_type: String,
    /// Advertised capability tags
    pub capabilities: Vec<String>,
    /// Remote/cloud backend
    pub is_cloud: bool,
    /// Currently the active instance
    pub is_active: bool,
    /// Last known health
    pub is_healthy: bool,
    /// Reported cost
    pub cost_info: CostInfo,
}
