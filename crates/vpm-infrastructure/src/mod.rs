//! # Infrastructure Layer
//!
//! Orchestration around the backend registry: building instances, wrapping
//! them, composing them and managing their lifecycle.
//!
//! ## Module Categories
//!
//! ### Orchestration
//! | Module | Description |
//! |--------|-------------|
//! | [`factory`] | Validated, auto-configured backend construction |
//! | [`monitoring`] | Call-recording decorator |
//! | [`routing`] | Fallback chain and hybrid router |
//! | [`manager`] | Named instances, active selection, health polling |
//!
//! ### Configuration
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Layered TOML/environment configuration |
//! | [`constants`] | Centralized configuration constants |
//!
//! ### Observability
//! | Module | Description |
//! |--------|-------------|
//! | [`logging`] | Structured logging with tracing |

pub mod config;
pub mod constants;
pub mod error_ext;
pub mod factory;
pub mod logging;
pub mod manager;
pub mod monitoring;
pub mod routing;
pub mod utils;

// Re-export commonly used types
pub use error_ext::ErrorContext;
pub use factory::ProviderFactory;
pub use manager::ProviderManager;
pub use monitoring::{MonitoredProvider, ProviderMetrics};
pub use routing::{FallbackChain, FallbackPolicy, HybridRouter, HybridStrategy};
pub use utils::TimedOperation;
