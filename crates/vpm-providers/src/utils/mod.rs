//! Provider Utilities
//!
//! Shared utilities used by provider implementations.

mod similarity;

pub use similarity::{ScoredCandidate, score_vectors, top_k};
