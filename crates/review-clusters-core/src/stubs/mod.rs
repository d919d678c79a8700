//! Deterministic in-process collaborators for tests and development.
//!
//! The real deployment wires external taggers and embedding services behind
//! the same traits; these stand-ins keep the pipeline runnable and
//! reproducible without any of that.

mod embedding_stub;
mod tagger_stub;
mod topic_model_stub;

pub use embedding_stub::HashEmbeddingBackend;
pub use tagger_stub::WhitespaceTagger;
pub use topic_model_stub::FrequencyTopicModel;
