//! Application ports
//!
//! - **registry/** - Backend registration, descriptors and discovery

/// Backend registry
pub mod registry;

pub use registry::*;
