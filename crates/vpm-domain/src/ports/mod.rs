//! Domain Port Interfaces
//!
//! Ports define the contracts that external layers implement. Backends in
//! `vpm-providers` (and any third-party crate) implement the provider ports;
//! `vpm-infrastructure` composes them.

/// External service provider ports
pub mod providers;

pub use providers::{VectorProvider, VectorProviderAdmin};
