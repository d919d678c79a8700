//! Cluster entity: one group of sentences within an experiment polarity.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Polarity;

/// A persisted sentence cluster.
///
/// Owned by exactly one experiment; `cluster_number` is unique within
/// (experiment_id, polarity) but need not stay contiguous after merges.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cluster {
    /// Store-assigned document id, injected after retrieval.
    #[serde(skip)]
    pub id: Uuid,
    /// Owning experiment.
    pub experiment_id: Uuid,
    /// Which review side this cluster groups.
    pub polarity: Polarity,
    /// Display name, defaults to `cluster_<number>` until renamed.
    pub name: String,
    /// Ordinal within (experiment, polarity).
    pub cluster_number: usize,
    /// Number of sentences currently assigned to this cluster.
    pub sentence_count: usize,
}

impl Cluster {
    /// Create cluster metadata with the default name.
    pub fn new(
        experiment_id: Uuid,
        polarity: Polarity,
        cluster_number: usize,
        sentence_count: usize,
    ) -> Self {
        Self {
            id: Uuid::nil(),
            experiment_id,
            polarity,
            name: format!("cluster_{cluster_number}"),
            cluster_number,
            sentence_count,
        }
    }

    /// Lightweight reference for embedding on the experiment document.
    pub fn to_ref(&self) -> ClusterRef {
        ClusterRef {
            cluster_id: self.id,
            name: self.name.clone(),
            cluster_number: self.cluster_number,
            sentence_count: self.sentence_count,
        }
    }
}

/// Cluster reference embedded in the experiment document for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterRef {
    pub cluster_id: Uuid,
    pub name: String,
    pub cluster_number: usize,
    pub sentence_count: usize,
}
