//! Per-instance performance records kept by the manager

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

/// Request-path statistics of one managed instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRecord {
    /// Instance name
    pub name: String,
    /// Recorded operations
    pub total_operations: u64,
    /// Operations that succeeded
    pub successful_operations: u64,
    /// Operations that failed
    pub failed_operations: u64,
    /// Fastest operation
    pub min_latency: Duration,
    /// Slowest operation
    pub max_latency: Duration,
    /// Running mean latency
    pub average_latency: Duration,
    /// `failed / total`
    pub error_rate: f64,
    /// Operations per second since the first recorded operation
    pub throughput: f64,
    /// First recorded operation
    pub first_operation: DateTime<Utc>,
    /// Last recorded operation
    pub last_operation: DateTime<Utc>,
    /// Count per operation name
    pub operations: HashMap<String, u64>,
}

impl PerformanceRecord {
    fn new(name: &str, now: DateTime<Utc>) -> Self {
        Self {
            name: name.to_string(),
            total_operations: 0,
            successful_operations: 0,
            failed_operations: 0,
            min_latency: Duration::ZERO,
            max_latency: Duration::ZERO,
            average_latency: Duration::ZERO,
            error_rate: 0.0,
            throughput: 0.0,
            first_operation: now,
            last_operation: now,
            operations: HashMap::new(),
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn record(&mut self, operation: &str, latency: Duration, success: bool, now: DateTime<Utc>) {
        if self.total_operations == 0 || latency < self.min_latency {
            self.min_latency = latency;
        }
        self.max_latency = self.max_latency.max(latency);

        // Running mean over every recorded operation
        let previous = self.total_operations as f64;
        let average = self.average_latency.as_secs_f64();
        self.total_operations += 1;
        let count = self.total_operations as f64;
        self.average_latency =
            Duration::from_secs_f64((average * previous + latency.as_secs_f64()) / count);

        if success {
            self.successful_operations += 1;
        } else {
            self.failed_operations += 1;
        }
        self.error_rate = self.failed_operations as f64 / count;

        self.last_operation = now;
        let window = (now - self.first_operation)
            .to_std()
            .unwrap_or_default()
            .as_secs_f64();
        self.throughput = if window > 0.0 { count / window } else { count };

        *self.operations.entry(operation.to_string()).or_insert(0) += 1;
    }
}

/// Concurrent table of [`PerformanceRecord`]s keyed by instance name
#[derive(Debug, Default)]
pub struct PerformanceMonitor {
    records: DashMap<String, PerformanceRecord>,
}

impl PerformanceMonitor {
    /// Empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one operation outcome for `name`
    pub fn record(&self, name: &str, operation: &str, latency: Duration, success: bool) {
        let now = Utc::now();
        self.records
            .entry(name.to_string())
            .or_insert_with(|| PerformanceRecord::new(name, now))
            .record(operation, latency, success, now);
    }

    /// Copy of the record for `name`
    pub fn get(&self, name: &str) -> Option<PerformanceRecord> {
        self.records.get(name).map(|record| record.clone())
    }

    /// Copies of every record
    pub fn snapshot(&self) -> HashMap<String, PerformanceRecord> {
        self.records
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    /// Drop the record for `name`
    pub fn remove(&self, name: &str) {
        self.records.remove(name);
    }

    /// Drop every record
    pub fn clear(&self) {
        self.records.clear();
    }
}
