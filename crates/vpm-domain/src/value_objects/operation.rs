//! Operation kinds used for routing decisions

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Kind of a data-plane or admin operation
///
/// Each contract method maps onto one kind; collection and index methods
/// share a kind per family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Store,
    Retrieve,
    Update,
    Delete,
    Search,
    Similar,
    BatchSimilar,
    Collection,
    Index,
    Metadata,
    Stats,
    Optimize,
    Backup,
    Restore,
}

impl Operation {
    /// All operation kinds
    pub const ALL: [Operation; 14] = [
        Self::Store,
        Self::Retrieve,
        Self::Update,
        Self::Delete,
        Self::Search,
        Self::Similar,
        Self::BatchSimilar,
        Self::Collection,
        Self::Index,
        Self::Metadata,
        Self::Stats,
        Self::Optimize,
        Self::Backup,
        Self::Restore,
    ];

    /// Canonical lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Store => "store",
            Self::Retrieve => "retrieve",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Search => "search",
            Self::Similar => "similar",
            Self::BatchSimilar => "batch_similar",
            Self::Collection => "collection",
            Self::Index => "index",
            Self::Metadata => "metadata",
            Self::Stats => "stats",
            Self::Optimize => "optimize",
            Self::Backup => "backup",
            Self::Restore => "restore",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| Error::invalid_argument(format!("Unknown operation '{s}'")))
    }
}
