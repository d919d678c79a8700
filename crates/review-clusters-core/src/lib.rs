//! Review Clusters Core Library
//!
//! Provides domain types, traits, and the in-process algorithms for the
//! review clustering and topic lifecycle engine.
//!
//! # Architecture
//!
//! This crate defines:
//! - Domain types (`Experiment`, `Cluster`, `Topic`, `Sentence`, `Review`)
//! - Collaborator traits (`DocumentStore`, `Tagger`, `EmbeddingBackend`, `TopicModel`)
//! - Error types and result alias (`EngineError`, `EngineResult`)
//! - Sentence extraction from raw reviews (`SentenceExtractor`)
//! - Embedding-based clustering (`EmbeddingClusterer`, `KMeans`)
//! - Topic distillation and naming (`TopicDistiller`)
//! - Deterministic stub collaborators for tests and development
//!
//! # Example
//!
//! ```
//! use review_clusters_core::extract::SentenceExtractor;
//! use review_clusters_core::stubs::WhitespaceTagger;
//! use review_clusters_core::types::{Polarity, Review};
//!
//! let tagger = WhitespaceTagger;
//! let extractor = SentenceExtractor::new(&tagger);
//!
//! let review = Review {
//!     id: uuid::Uuid::new_v4(),
//!     product_name: "AcmePhone".to_string(),
//!     category: "phones".to_string(),
//!     pros: vec!["Battery lasts long".to_string(), "Good".to_string()],
//!     cons: vec![],
//! };
//!
//! // Single-token segments are filtered out.
//! let drafts = extractor.extract(&review, Polarity::Pos);
//! assert_eq!(drafts.len(), 1);
//! ```

pub mod clustering;
pub mod distill;
pub mod error;
pub mod extract;
pub mod stubs;
pub mod traits;
pub mod types;

// Re-exports for convenience
pub use clustering::{ClusterMethod, EmbeddingClusterer, EmbeddingMethod, EmbeddingModel, KMeans};
pub use distill::{ClusterBucket, DistilledTopics, TopicDistiller};
pub use error::{EngineError, EngineResult};
pub use extract::SentenceExtractor;
pub use traits::{DocumentStore, EmbeddingBackend, Tagger, TopicModel};
pub use types::{Cluster, Experiment, Polarity, Review, Sentence, SentenceDraft, Topic};
