//! Collection and index descriptors

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::vector::Metadata;
use crate::error::Error;

/// Similarity metric of a collection or index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    /// Cosine similarity
    #[default]
    Cosine,
    /// Euclidean (L2) distance
    Euclidean,
    /// Inner product
    DotProduct,
}

impl DistanceMetric {
    /// Canonical lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cosine => "cosine",
            Self::Euclidean => "euclidean",
            Self::DotProduct => "dot_product",
        }
    }
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DistanceMetric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cosine" => Ok(Self::Cosine),
            "euclidean" | "l2" => Ok(Self::Euclidean),
            "dot_product" | "dot" | "ip" => Ok(Self::DotProduct),
            other => Err(Error::invalid_argument(format!(
                "Unknown distance metric '{other}'"
            ))),
        }
    }
}

/// Parameters for creating a collection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CollectionConfig {
    /// Collection name
    pub name: String,
    /// Embedding dimensionality
    pub dimension: usize,
    /// Similarity metric
    #[serde(default)]
    pub metric: DistanceMetric,
    /// Human-readable description
    #[serde(default)]
    pub description: Option<String>,
    /// Backend-specific properties
    #[serde(default)]
    pub properties: Metadata,
    /// Replica count (backend-defined meaning)
    #[serde(default = "default_one")]
    pub replicas: u32,
    /// Shard count (backend-defined meaning)
    #[serde(default = "default_one")]
    pub shards: u32,
}

fn default_one() -> u32 {
    1
}

impl CollectionConfig {
    /// Create a cosine collection config
    pub fn new(name: impl Into<String>, dimension: usize) -> Self {
        Self {
            name: name.into(),
            dimension,
            metric: DistanceMetric::default(),
            description: None,
            properties: Metadata::new(),
            replicas: 1,
            shards: 1,
        }
    }

    /// Set the metric
    pub fn with_metric(mut self, metric: DistanceMetric) -> Self {
        self.metric = metric;
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Descriptor of an existing collection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CollectionInfo {
    /// Collection name
    pub name: String,
    /// Embedding dimensionality
    pub dimension: usize,
    /// Similarity metric
    pub metric: DistanceMetric,
    /// Number of stored vectors
    pub vector_count: u64,
    /// Approximate storage footprint in bytes
    pub size_bytes: u64,
    /// Backend-reported status
    pub status: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

/// Parameters for creating an index
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexConfig {
    /// Index name
    pub name: String,
    /// Index kind (e.g. `flat`, `hnsw`, `ivf_flat`)
    pub index_type: String,
    /// Similarity metric
    #[serde(default)]
    pub metric: DistanceMetric,
    /// Backend-specific parameters
    #[serde(default)]
    pub parameters: Metadata,
}

impl IndexConfig {
    /// Create an index config
    pub fn new(name: impl Into<String>, index_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            index_type: index_type.into(),
            metric: DistanceMetric::default(),
            parameters: Metadata::new(),
        }
    }
}

/// Descriptor of an existing index
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexInfo {
    /// Index name
    pub name: String,
    /// Index kind
    pub index_type: String,
    /// Build state reported by the backend
    pub state: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
}
