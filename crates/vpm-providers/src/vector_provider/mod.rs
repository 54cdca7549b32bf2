//! Vector Provider Implementations
//!
//! | Provider | Type | Description |
//! |----------|------|-------------|
//! | NullVectorProvider | Testing | No-op stub |
//! | InMemoryVectorProvider | Local | In-memory storage (non-persistent, JSON backup) |

#[cfg(feature = "provider-memory")]
pub mod in_memory;
#[cfg(feature = "provider-null")]
pub mod null;

#[cfg(feature = "provider-memory")]
pub use in_memory::{InMemoryVectorProvider, MemorySettings, in_memory_descriptor};
#[cfg(feature = "provider-null")]
pub use null::{NullVectorProvider, null_descriptor};
