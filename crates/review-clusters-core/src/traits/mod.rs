//! Collaborator contracts the engine depends on.
//!
//! The concrete document store, morphological tagger, embedding backend and
//! topic model are external collaborators; the engine only specifies the
//! traits it calls on them. Deterministic stub implementations for tests
//! live in [`crate::stubs`].

mod embedding;
mod store;
mod tagger;
mod topic_model;

pub use embedding::EmbeddingBackend;
pub use store::{DocumentStore, QueryFilter, StoredDocument, WriteOutcome, WriteReceipt};
pub use tagger::Tagger;
pub use topic_model::{TopicModel, TopicTerms};
