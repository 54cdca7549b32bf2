//! Configuration types module

pub mod app;
pub mod factory;
pub mod logging;
pub mod manager;

// Re-export main types
pub use app::AppConfig;
pub use factory::FactoryConfig;
pub use logging::LoggingConfig;
pub use manager::{
    FallbackConfig, HealthCheckConfig, HybridConfig, ManagerConfig, ProviderConfig,
};
