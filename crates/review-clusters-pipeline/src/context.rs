//! Process-wide model context.
//!
//! The tagger, embedding backend, and topic model are heavyweight
//! collaborators constructed once at startup and passed into the orchestrator
//! explicitly. No runtime mutation, no hidden singletons.

use std::sync::Arc;

use review_clusters_core::stubs::{FrequencyTopicModel, HashEmbeddingBackend, WhitespaceTagger};
use review_clusters_core::traits::{EmbeddingBackend, Tagger, TopicModel};

/// Shared model collaborators for pipeline runs.
#[derive(Clone)]
pub struct PipelineContext {
    pub tagger: Arc<dyn Tagger>,
    pub embedder: Arc<dyn EmbeddingBackend>,
    pub topic_model: Arc<dyn TopicModel>,
    /// Seed for clustering reproducibility.
    pub seed: u64,
}

impl PipelineContext {
    pub fn new(
        tagger: Arc<dyn Tagger>,
        embedder: Arc<dyn EmbeddingBackend>,
        topic_model: Arc<dyn TopicModel>,
        seed: u64,
    ) -> Self {
        Self {
            tagger,
            embedder,
            topic_model,
            seed,
        }
    }

    /// Context wired entirely with deterministic stub collaborators.
    pub fn stub(seed: u64) -> Self {
        Self::new(
            Arc::new(WhitespaceTagger::new()),
            Arc::new(HashEmbeddingBackend::new()),
            Arc::new(FrequencyTopicModel),
            seed,
        )
    }
}
