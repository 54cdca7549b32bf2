//! Configuration management
//!
//! Layered loading (defaults, TOML file, environment) into [`AppConfig`].

pub mod loader;
pub mod types;

pub use loader::{ConfigBuilder, ConfigLoader};
pub use types::*;
