//! Deterministic hash-based embedding backend.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::error::EngineResult;
use crate::traits::EmbeddingBackend;

const STUB_DIMENSIONS: usize = 64;

/// Embedding backend that hashes lemmas into a fixed-width bag-of-words
/// vector.
///
/// The same lemma sequence always maps to the same vector, and sequences
/// sharing lemmas land near each other, which is all the clustering tests
/// need. Vectors are L2-normalized; an empty sequence embeds to the zero
/// vector.
#[derive(Debug, Default, Clone, Copy)]
pub struct HashEmbeddingBackend;

impl HashEmbeddingBackend {
    pub fn new() -> Self {
        Self
    }
}

impl EmbeddingBackend for HashEmbeddingBackend {
    fn embed(&self, lemmas: &[String]) -> EngineResult<Vec<f32>> {
        let mut vector = vec![0.0f32; STUB_DIMENSIONS];

        for lemma in lemmas {
            let mut hasher = DefaultHasher::new();
            lemma.hash(&mut hasher);
            let h = hasher.finish();

            let index = (h % STUB_DIMENSIONS as u64) as usize;
            let sign = if h & (1 << 63) == 0 { 1.0 } else { -1.0 };
            vector[index] += sign;
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in vector.iter_mut() {
                *x /= norm;
            }
        }

        Ok(vector)
    }

    fn dimensions(&self) -> usize {
        STUB_DIMENSIONS
    }

    fn model_id(&self) -> &str {
        "stub-hash"
    }
}
