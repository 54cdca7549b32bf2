//! # Domain Layer
//!
//! Core types shared by every layer of the Vector Provider Manager.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`error`] | Error taxonomy and `Result` alias |
//! | [`value_objects`] | Vector, query, collection, health and cost payloads |
//! | [`ports`] | Capability contract every backend implements |
//! | [`constants`] | Capability tags, categories and shared defaults |

/// Domain constants
pub mod constants;
/// Error handling types
pub mod error;
/// Port interfaces
pub mod ports;
/// Value objects
pub mod value_objects;

pub use error::{Error, Result};
pub use ports::providers::{VectorProvider, VectorProviderAdmin};
pub use value_objects::*;
