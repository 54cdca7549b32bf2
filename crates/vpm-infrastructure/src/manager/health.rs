//! Health tracking for managed instances
//!
//! [`Instances`] holds the instance map and the health table the manager
//! and the periodic [`HealthCheckTask`] share. Probes run on a snapshot of
//! the map with no lock held; only publishing the results takes the write
//! lock on the health table.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use vpm_domain::{VectorProvider, VectorProviderAdmin};
use vpm_domain::error::Result;
use vpm_domain::value_objects::{HealthState, HealthStatus, OperationContext};

use crate::logging::log_health_check;
use crate::utils::TimedOperation;

/// Last known health of one managed instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthRecord {
    /// Instance name
    pub name: String,
    /// Last reported or inferred state
    pub state: HealthState,
    /// Whether the last probe reported healthy
    pub is_healthy: bool,
    /// Status message or probe error
    pub message: String,
    /// When the last probe finished
    pub last_check: Option<DateTime<Utc>>,
    /// Latency of the last probe
    pub response_time_ms: u64,
    /// Probes that failed outright
    pub error_count: u64,
    /// Error of the last failed probe
    pub last_error: Option<String>,
    /// Time spent healthy between consecutive healthy probes
    pub uptime_ms: u64,
}

impl HealthRecord {
    /// Record for an instance that was never probed
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: HealthState::NotInitialized,
            is_healthy: false,
            message: String::new(),
            last_check: None,
            response_time_ms: 0,
            error_count: 0,
            last_error: None,
            uptime_ms: 0,
        }
    }

    /// Fold one probe outcome into the record
    pub fn apply(&mut self, outcome: &Result<HealthStatus>, elapsed_ms: u64) {
        let now = Utc::now();
        let previous = self.last_check.replace(now);
        match outcome {
            Ok(status) => {
                if let (true, true, Some(previous)) =
                    (self.is_healthy, status.is_healthy(), previous)
                {
                    let healthy_for = (now - previous).num_milliseconds().max(0);
                    self.uptime_ms += u64::try_from(healthy_for).unwrap_or_default();
                }
                self.state = status.state;
                self.is_healthy = status.is_healthy();
                self.message.clone_from(&status.message);
                self.response_time_ms = if status.response_time_ms > 0 {
                    status.response_time_ms
                } else {
                    elapsed_ms
                };
            }
            Err(error) => {
                self.state = HealthState::Unreachable;
                self.is_healthy = false;
                self.message = error.to_string();
                self.response_time_ms = elapsed_ms;
                self.error_count += 1;
                self.last_error = Some(error.to_string());
            }
        }
    }
}

/// Managed instances and their health table
#[derive(Default)]
pub struct Instances {
    /// Instance name to backend
    pub providers: RwLock<HashMap<String, Arc<dyn VectorProvider>>>,
    /// Instance name to last known health
    pub health: RwLock<HashMap<String, HealthRecord>>,
}

impl Instances {
    /// Cloned `(name, backend)` pairs, sorted by name
    pub async fn snapshot(&self) -> Vec<(String, Arc<dyn VectorProvider>)> {
        let mut snapshot: Vec<_> = self
            .providers
            .read()
            .await
            .iter()
            .map(|(name, provider)| (name.clone(), Arc::clone(provider)))
            .collect();
        snapshot.sort_by(|a, b| a.0.cmp(&b.0));
        snapshot
    }

    /// Probe one instance and publish the outcome
    pub async fn probe(
        &self,
        ctx: &OperationContext,
        name: &str,
        provider: &Arc<dyn VectorProvider>,
    ) -> Result<HealthStatus> {
        let timer = TimedOperation::start();
        let outcome = provider.health(ctx).await;
        self.publish(vec![(name.to_string(), &outcome, timer.elapsed_ms())])
            .await;
        outcome
    }

    /// Probe every instance concurrently and publish the results
    ///
    /// Returns a copy of the whole health table.
    pub async fn refresh(&self, ctx: &OperationContext) -> HashMap<String, HealthRecord> {
        let snapshot = self.snapshot().await;
        let outcomes = join_all(snapshot.iter().map(|(_, provider)| async move {
            let (outcome, took) = TimedOperation::measure(provider.health(ctx)).await;
            (outcome, u64::try_from(took.as_millis()).unwrap_or(u64::MAX))
        }))
        .await;

        self.publish(
            snapshot
                .iter()
                .zip(outcomes.iter())
                .map(|((name, _), (outcome, elapsed))| (name.clone(), outcome, *elapsed))
                .collect(),
        )
        .await;
        self.health.read().await.clone()
    }

    /// Fold outcomes into the health table
    ///
    /// Instances removed while their probe was in flight are skipped.
    async fn publish(&self, outcomes: Vec<(String, &Result<HealthStatus>, u64)>) {
        let providers = self.providers.read().await;
        let mut health = self.health.write().await;
        for (name, outcome, elapsed_ms) in outcomes {
            if !providers.contains_key(&name) {
                debug!(provider = %name, "Dropping health result of removed provider");
                continue;
            }
            let detail = match outcome {
                Ok(status) => status.message.clone(),
                Err(error) => error.to_string(),
            };
            let record = health
                .entry(name.clone())
                .or_insert_with(|| HealthRecord::new(name.as_str()));
            record.apply(outcome, elapsed_ms);
            log_health_check(&name, record.is_healthy, Some(&detail));
        }
    }

    /// Drop everything
    pub async fn clear(&self) {
        self.providers.write().await.clear();
        self.health.write().await.clear();
    }
}

/// Periodic health polling running on its own tokio task
pub struct HealthCheckTask {
    cancel_token: CancellationToken,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl HealthCheckTask {
    /// Spawn the polling loop over `instances`
    pub fn spawn(instances: Arc<Instances>, interval: Duration) -> Self {
        let cancel_token = CancellationToken::new();
        let token = cancel_token.clone();
        let handle = tokio::spawn(async move {
            Self::run(&instances, interval, &token).await;
        });
        Self {
            cancel_token,
            handle: Mutex::new(Some(handle)),
        }
    }

    async fn run(instances: &Instances, interval: Duration, cancel_token: &CancellationToken) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // First tick completes immediately; initialize has just probed
        ticker.tick().await;

        info!(interval_secs = interval.as_secs(), "Health check task started");
        loop {
            tokio::select! {
                () = cancel_token.cancelled() => break,
                _ = ticker.tick() => {
                    let ctx = OperationContext::from_token(cancel_token.child_token());
                    let records = instances.refresh(&ctx).await;
                    debug!(instances = records.len(), "Health check cycle complete");
                }
            }
        }
        info!("Health check task stopped");
    }

    /// Whether the loop is still running
    pub fn is_running(&self) -> bool {
        !self.cancel_token.is_cancelled()
    }

    /// Cancel the loop and wait for it to finish
    pub async fn stop(&self) {
        self.cancel_token.cancel();
        let Some(handle) = self.handle.lock().await.take() else {
            return;
        };
        if let Err(error) = handle.await {
            warn!(error = %error, "Health check task ended abnormally");
        }
    }
}
