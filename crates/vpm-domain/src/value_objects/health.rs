//! Backend health reports

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::vector::Metadata;

/// Liveness state of a backend instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum HealthState {
    /// Serving normally
    Healthy,
    /// Serving with problems
    Degraded,
    /// Health probe failed or timed out
    Unreachable,
    /// `initialize` has not been called
    #[default]
    NotInitialized,
    /// Initialized but not started
    NotStarted,
}

impl HealthState {
    /// Only `Healthy` counts as healthy
    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy)
    }

    /// Still able to serve requests
    pub fn is_operational(&self) -> bool {
        matches!(self, Self::Healthy | Self::Degraded)
    }

    /// Canonical lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Degraded => "degraded",
            Self::Unreachable => "unreachable",
            Self::NotInitialized => "not_initialized",
            Self::NotStarted => "not_started",
        }
    }
}

impl fmt::Display for HealthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Health report returned by a backend's `health` call
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthStatus {
    /// Reported state
    pub state: HealthState,
    /// Human-readable detail
    pub message: String,
    /// When the report was produced
    pub timestamp: DateTime<Utc>,
    /// Probe latency in milliseconds
    pub response_time_ms: u64,
    /// Backend-specific details
    #[serde(default)]
    pub details: Metadata,
}

impl HealthStatus {
    /// Create a report with the given state
    pub fn new(state: HealthState, message: impl Into<String>) -> Self {
        Self {
            state,
            message: message.into(),
            timestamp: Utc::now(),
            response_time_ms: 0,
            details: Metadata::new(),
        }
    }

    /// Healthy report
    pub fn healthy() -> Self {
        Self::new(HealthState::Healthy, "ok")
    }

    /// Degraded report
    pub fn degraded(message: impl Into<String>) -> Self {
        Self::new(HealthState::Degraded, message)
    }

    /// Unreachable report
    pub fn unreachable(message: impl Into<String>) -> Self {
        Self::new(HealthState::Unreachable, message)
    }

    /// Set the response time
    pub fn with_response_time(mut self, response_time_ms: u64) -> Self {
        self.response_time_ms = response_time_ms;
        self
    }

    /// Add a detail entry
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    /// Whether the reported state is healthy
    pub fn is_healthy(&self) -> bool {
        self.state.is_healthy()
    }
}
