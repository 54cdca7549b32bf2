//! Vector, query and search result payloads
//!
//! These types pass through the orchestration layer untouched. Identifiers
//! are unique within a collection and embeddings are fixed-length per
//! collection; enforcing that is the backend's job.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::{DEFAULT_COLLECTION, DEFAULT_TOP_K};

/// Free-form metadata bag attached to vectors
pub type Metadata = HashMap<String, Value>;

/// A stored vector with its identifier and metadata
///
/// ## Example
///
/// ```rust
/// use vpm_domain::value_objects::VectorData;
///
/// let item = VectorData::new("doc-1", vec![0.1, 0.2, 0.3])
///     .with_collection("docs")
///     .with_metadata("lang", "en");
/// assert_eq!(item.collection, "docs");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VectorData {
    /// Caller-supplied identifier, unique within the collection
    pub id: String,
    /// Embedding values
    pub vector: Vec<f32>,
    /// Arbitrary metadata
    #[serde(default)]
    pub metadata: Metadata,
    /// Collection the vector belongs to
    pub collection: String,
    /// Optional namespace tag
    #[serde(default)]
    pub namespace: Option<String>,
    /// Creation time
    pub timestamp: DateTime<Utc>,
    /// Optional time to live in seconds
    #[serde(default)]
    pub ttl_secs: Option<u64>,
}

impl VectorData {
    /// Create a vector in the default collection
    pub fn new(id: impl Into<String>, vector: Vec<f32>) -> Self {
        Self {
            id: id.into(),
            vector,
            metadata: Metadata::new(),
            collection: DEFAULT_COLLECTION.to_string(),
            namespace: None,
            timestamp: Utc::now(),
            ttl_secs: None,
        }
    }

    /// Set the collection
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    /// Set the namespace
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Add a metadata entry
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Set the time to live
    pub fn with_ttl(mut self, ttl_secs: u64) -> Self {
        self.ttl_secs = Some(ttl_secs);
        self
    }

    /// Whether the TTL has elapsed at `now`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.ttl_secs.is_some_and(|ttl| {
            let age = now.signed_duration_since(self.timestamp).num_seconds();
            age >= 0 && age.unsigned_abs() >= ttl
        })
    }
}

/// A similarity query
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct VectorQuery {
    /// Query embedding
    pub vector: Vec<f32>,
    /// Collection to search
    pub collection: String,
    /// Restrict to a namespace
    #[serde(default)]
    pub namespace: Option<String>,
    /// Number of results wanted
    pub top_k: usize,
    /// Minimum score a result must reach
    #[serde(default)]
    pub threshold: Option<f32>,
    /// Return stored embeddings alongside results
    #[serde(default)]
    pub include_vector: bool,
    /// Metadata equality filters
    #[serde(default)]
    pub filters: Metadata,
}

impl VectorQuery {
    /// Create a query against the default collection
    pub fn new(vector: Vec<f32>) -> Self {
        Self {
            vector,
            collection: DEFAULT_COLLECTION.to_string(),
            top_k: DEFAULT_TOP_K,
            ..Default::default()
        }
    }

    /// Set the collection
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    /// Set the namespace
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Set the number of results
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Set the score threshold
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = Some(threshold);
        self
    }

    /// Add a metadata equality filter
    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }

    /// Request stored embeddings in the results
    pub fn including_vectors(mut self) -> Self {
        self.include_vector = true;
        self
    }

    /// `top_k`, or the default when left at zero
    pub fn effective_top_k(&self) -> usize {
        if self.top_k == 0 { DEFAULT_TOP_K } else { self.top_k }
    }

    /// Whether a stored vector passes the namespace and metadata filters
    pub fn accepts(&self, item: &VectorData) -> bool {
        if let Some(namespace) = &self.namespace {
            if item.namespace.as_ref() != Some(namespace) {
                return false;
            }
        }
        filters_match(&self.filters, &item.metadata)
    }
}

/// Every filter key is present in `metadata` with an equal value
pub fn filters_match(filters: &Metadata, metadata: &Metadata) -> bool {
    filters
        .iter()
        .all(|(key, expected)| metadata.get(key) == Some(expected))
}

/// One ranked hit of a similarity search
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimilarityResult {
    /// Identifier of the matched vector
    pub id: String,
    /// Similarity score, higher is better
    pub score: f32,
    /// Distance under the collection metric, lower is closer
    pub distance: f32,
    /// Metadata of the matched vector
    #[serde(default)]
    pub metadata: Metadata,
    /// Stored embedding, when requested
    #[serde(default)]
    pub vector: Option<Vec<f32>>,
}

/// Result set of a search call
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SearchResults {
    /// Ranked hits
    pub results: Vec<SimilarityResult>,
    /// Number of candidates that passed the filters
    pub total: usize,
    /// Time spent by the backend in milliseconds
    pub duration_ms: u64,
    /// Namespace the query was restricted to
    #[serde(default)]
    pub namespace: Option<String>,
}
