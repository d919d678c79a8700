//! Sentence batch clustering over a pluggable embedding backend.

use tracing::debug;

use crate::error::EngineResult;
use crate::traits::EmbeddingBackend;

use super::error::ClusteringError;
use super::kmeans::KMeans;
use super::method::{ClusterMethod, EmbeddingMethod};

/// One clustering request: a batch of lemma sequences and the parsed method
/// selection.
///
/// Methods arrive already parsed; name validation happened before any
/// sentence retrieval (fail-fast contract).
#[derive(Debug)]
pub struct ClusterRequest<'a> {
    /// One lemma sequence per sentence.
    pub lemma_sequences: &'a [Vec<String>],
    /// Requested partition count.
    pub cluster_count: usize,
    pub embedding_method: EmbeddingMethod,
    pub cluster_method: ClusterMethod,
}

/// Converts a sentence batch into vectors and partitions it.
///
/// Returns one label per input sentence, each in `[0, cluster_count)`; fewer
/// distinct labels appear if the clustering collapses.
pub struct EmbeddingClusterer<'a> {
    backend: &'a dyn EmbeddingBackend,
    seed: u64,
}

impl<'a> EmbeddingClusterer<'a> {
    /// Create a clusterer over a shared embedding backend.
    pub fn new(backend: &'a dyn EmbeddingBackend, seed: u64) -> Self {
        Self { backend, seed }
    }

    /// Cluster a batch of sentences.
    ///
    /// # Errors
    ///
    /// - `InvalidConfig` when `cluster_count` exceeds the sentence count
    /// - `PipelineFailure` for internal clustering faults
    pub fn cluster(&self, request: &ClusterRequest<'_>) -> EngineResult<Vec<usize>> {
        let vectors: Vec<Vec<f32>> = request
            .lemma_sequences
            .iter()
            .map(|lemmas| self.backend.embed(lemmas))
            .collect::<EngineResult<_>>()?;

        // Hold the backend to its advertised width before clustering.
        let expected = self.backend.dimensions();
        for vector in &vectors {
            if vector.len() != expected {
                return Err(ClusteringError::DimensionMismatch {
                    expected,
                    actual: vector.len(),
                }
                .into());
            }
        }

        let representation = match request.embedding_method {
            EmbeddingMethod::SentenceVectors => vectors,
            EmbeddingMethod::DistanceMatrix => distance_matrix(&vectors),
            EmbeddingMethod::SimilarityMatrix => similarity_matrix(&vectors),
        };

        debug!(
            sentences = request.lemma_sequences.len(),
            clusters = request.cluster_count,
            method = %request.embedding_method,
            model = self.backend.model_id(),
            "clustering sentence batch"
        );

        let labels = match request.cluster_method {
            ClusterMethod::KMeans => KMeans::new(request.cluster_count)
                .with_seed(self.seed)
                .fit_predict(&representation)?,
        };

        Ok(labels)
    }
}

/// Pairwise euclidean distance rows: sentence i is represented by its
/// distances to every sentence in the batch.
fn distance_matrix(vectors: &[Vec<f32>]) -> Vec<Vec<f32>> {
    vectors
        .iter()
        .map(|a| {
            vectors
                .iter()
                .map(|b| {
                    a.iter()
                        .zip(b)
                        .map(|(x, y)| (x - y).powi(2))
                        .sum::<f32>()
                        .sqrt()
                })
                .collect()
        })
        .collect()
}

/// Pairwise cosine similarity rows.
fn similarity_matrix(vectors: &[Vec<f32>]) -> Vec<Vec<f32>> {
    let norms: Vec<f32> = vectors
        .iter()
        .map(|v| v.iter().map(|x| x * x).sum::<f32>().sqrt())
        .collect();

    vectors
        .iter()
        .enumerate()
        .map(|(i, a)| {
            vectors
                .iter()
                .enumerate()
                .map(|(j, b)| {
                    let denom = norms[i] * norms[j];
                    if denom == 0.0 {
                        0.0
                    } else {
                        a.iter().zip(b).map(|(x, y)| x * y).sum::<f32>() / denom
                    }
                })
                .collect()
        })
        .collect()
}
