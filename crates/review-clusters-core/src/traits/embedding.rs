//! Sentence embedding backend contract.

use crate::error::EngineResult;

/// Sentence embedding collaborator.
///
/// Embeds a lemma sequence into a fixed-dimension vector. Like the tagger,
/// implementations carry a one-time model-load cost and no runtime mutation;
/// construct once and pass into the pipeline context.
pub trait EmbeddingBackend: Send + Sync {
    /// Embed one sentence given as its ordered lemma sequence.
    fn embed(&self, lemmas: &[String]) -> EngineResult<Vec<f32>>;

    /// Output vector dimension.
    fn dimensions(&self) -> usize;

    /// Model identifier, recorded on the experiment document.
    fn model_id(&self) -> &str;
}
