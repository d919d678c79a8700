//! Embedding-based sentence clustering.
//!
//! Method and model names arrive as strings from callers; they are parsed
//! into closed enums up front so an unrecognized name fails before any
//! expensive embedding or store I/O happens.

mod clusterer;
mod error;
mod kmeans;
mod method;

pub use clusterer::{ClusterRequest, EmbeddingClusterer};
pub use error::ClusteringError;
pub use kmeans::KMeans;
pub use method::{ClusterMethod, EmbeddingMethod, EmbeddingModel};
