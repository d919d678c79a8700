//! Topic entity: one distilled topic label within a cluster.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted topic.
///
/// Owned by exactly one cluster; `topic_number` and `name` are unique within
/// the cluster. Duplicate distilled names are disambiguated before
/// persistence by suffixing an ordinal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    /// Store-assigned document id, injected after retrieval.
    #[serde(skip)]
    pub id: Uuid,
    /// Owning experiment.
    pub experiment_id: Uuid,
    /// Owning cluster.
    pub cluster_id: Uuid,
    /// Topic label, unique within the cluster.
    pub name: String,
    /// Ordinal within the cluster.
    pub topic_number: usize,
}

impl Topic {
    /// Create topic metadata.
    pub fn new(
        experiment_id: Uuid,
        cluster_id: Uuid,
        name: impl Into<String>,
        topic_number: usize,
    ) -> Self {
        Self {
            id: Uuid::nil(),
            experiment_id,
            cluster_id,
            name: name.into(),
            topic_number,
        }
    }
}
