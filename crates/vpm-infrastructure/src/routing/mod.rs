//! Provider Routing
//!
//! Composite backends that present several instances as one.
//!
//! ## Components
//!
//! - [`FallbackChain`] - ordered failover across members
//! - [`HybridRouter`] - role-keyed members selected per call by strategy

mod chain;
mod hybrid;

pub use chain::{FallbackAttempt, FallbackChain, FallbackPolicy};
pub use hybrid::{HybridRouter, HybridStrategy};
