//! Experiment entity: one clustering run over a category.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ClusterRef;

/// A persisted clustering experiment.
///
/// Exactly one non-deleted experiment may exist per category at a time; the
/// repository enforces this with a pre-check before creation, not a store
/// constraint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Experiment {
    /// Store-assigned document id, injected after retrieval.
    #[serde(skip)]
    pub id: Uuid,
    /// Category this experiment covers.
    pub category: String,
    /// Clustering algorithm name (canonical, e.g. `kmeans`).
    pub cluster_method: String,
    /// Embedding representation name (e.g. `sent2vec_vec`).
    pub embedding_method: String,
    /// Embedding model name.
    pub embedding_model: String,
    /// Topics requested per cluster.
    pub topics_per_cluster: usize,
    /// Requested cluster count for the positive side.
    pub clusters_pos_count: usize,
    /// Requested cluster count for the negative side.
    pub clusters_con_count: usize,
    /// Extracted positive sentence count.
    pub pos_sentences: usize,
    /// Extracted negative sentence count.
    pub con_sentences: usize,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Salient noun lemmas for the positive side.
    pub salient_terms_pos: BTreeSet<String>,
    /// Salient noun lemmas for the negative side.
    pub salient_terms_con: BTreeSet<String>,
    /// References to the positive clusters, in cluster_number order.
    pub clusters_pos: Vec<ClusterRef>,
    /// References to the negative clusters, in cluster_number order.
    pub clusters_con: Vec<ClusterRef>,
}

impl Experiment {
    /// Build a fresh experiment shell before clustering results exist.
    ///
    /// Salient terms and cluster references are filled in by the finalizing
    /// step of the pipeline.
    #[allow(clippy::too_many_arguments)]
    pub fn shell(
        category: impl Into<String>,
        cluster_method: impl Into<String>,
        embedding_method: impl Into<String>,
        embedding_model: impl Into<String>,
        topics_per_cluster: usize,
        clusters_pos_count: usize,
        clusters_con_count: usize,
        pos_sentences: usize,
        con_sentences: usize,
    ) -> Self {
        Self {
            id: Uuid::nil(),
            category: category.into(),
            cluster_method: cluster_method.into(),
            embedding_method: embedding_method.into(),
            embedding_model: embedding_model.into(),
            topics_per_cluster,
            clusters_pos_count,
            clusters_con_count,
            pos_sentences,
            con_sentences,
            created_at: Utc::now(),
            salient_terms_pos: BTreeSet::new(),
            salient_terms_con: BTreeSet::new(),
            clusters_pos: Vec::new(),
            clusters_con: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_starts_empty() {
        let exp = Experiment::shell(
            "phones",
            "kmeans",
            "sent2vec_vec",
            "fasttext-cc",
            3,
            8,
            8,
            120,
            80,
        );

        assert_eq!(exp.category, "phones");
        assert!(exp.salient_terms_pos.is_empty());
        assert!(exp.clusters_con.is_empty());
        assert_eq!(exp.pos_sentences, 120);
    }

    #[test]
    fn test_serialization_roundtrip() {
        let mut exp = Experiment::shell(
            "phones",
            "kmeans",
            "sent2vec_dist",
            "fasttext-cc",
            2,
            4,
            4,
            10,
            5,
        );
        exp.salient_terms_pos.insert("battery".into());

        let json = serde_json::to_value(&exp).unwrap();
        assert!(json.get("id").is_none());

        let back: Experiment = serde_json::from_value(json).unwrap();
        assert_eq!(back.category, exp.category);
        assert!(back.salient_terms_pos.contains("battery"));
    }
}
