//! Provider Manager
//!
//! Application-facing façade over named backend instances: lifecycle,
//! active-instance selection and switching, health polling and
//! per-instance performance records.

pub mod health;
pub mod performance;
mod provider_manager;

pub use health::{HealthCheckTask, HealthRecord, Instances};
pub use performance::{PerformanceMonitor, PerformanceRecord};
pub use provider_manager::{ManagerPhase, ProviderManager};
