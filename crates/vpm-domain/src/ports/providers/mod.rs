//! External Provider Ports
//!
//! | Port | Description |
//! |------|-------------|
//! | VectorProviderAdmin | Lifecycle, health and descriptive metadata |
//! | VectorProvider | Vector storage, similarity search, collections, indexes, metadata |

/// Vector provider port
pub mod vector_provider;

pub use vector_provider::{VectorProvider, VectorProviderAdmin};
