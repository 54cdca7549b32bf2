//! Application Layer - Vector Provider Manager
//!
//! Holds the backend registry: the catalog mapping a backend type
//! identifier to its static descriptor and constructor.
//!
//! ## Ports
//!
//! - `ports::registry::*`: [`ProviderRegistry`], [`ProviderDescriptor`],
//!   the `VECTOR_PROVIDERS` linkme slice and compatibility queries
//!
//! ## Dependencies
//!
//! This crate depends only on:
//! - `vpm-domain`: capability contract, value objects, errors
//! - Pure Rust libraries for concurrency, serialization and registration

pub mod ports;

pub use ports::*;
