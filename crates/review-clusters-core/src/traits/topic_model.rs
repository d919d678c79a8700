//! Topic model contract.

/// Terms describing one fitted topic, in descending salience order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicTerms {
    pub terms: Vec<String>,
}

/// Per-cluster topic modeling collaborator.
///
/// Fits on the lemma documents of one cluster bucket and returns up to
/// `topic_count` topics. Implementations must tolerate tiny inputs; the
/// distiller substitutes a default topic name when the fit degenerates.
pub trait TopicModel: Send + Sync {
    /// Fit topics over the given lemma documents.
    ///
    /// May return fewer than `topic_count` topics (degenerate input); must
    /// not fail on small inputs.
    fn fit(&self, docs: &[Vec<String>], topic_count: usize) -> Vec<TopicTerms>;
}
