//! Review Clusters Storage Library
//!
//! Document-store backends and the experiment repository.
//!
//! # Architecture
//!
//! - [`MemoryDocumentStore`]: in-process `DocumentStore` implementation that
//!   reproduces the production store's consistency contract (realtime point
//!   reads, refresh-gated queries)
//! - [`ExperimentRepository`]: persistence and lifecycle manager for the
//!   experiment/cluster/topic/sentence graph (creates, renames, merges,
//!   transfers, cascading deletes)
//! - [`indices::index_names`]: the index name registry shared by both

pub mod indices;
pub mod memory_store;
pub mod repository;

pub use indices::index_names;
pub use memory_store::MemoryDocumentStore;
pub use repository::ExperimentRepository;
