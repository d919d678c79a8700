//! Error types for clustering operations.

use thiserror::Error;

use crate::error::EngineError;

/// Errors that can occur while partitioning sentence vectors.
#[derive(Debug, Error)]
pub enum ClusteringError {
    /// No input vectors.
    #[error("Empty input: nothing to cluster")]
    EmptyInput,

    /// More clusters requested than data points available.
    #[error("Invalid cluster count: requested {requested}, have {n_items} items")]
    InvalidClusterCount { requested: usize, n_items: usize },

    /// Input vectors disagree on dimension.
    #[error("Dimension mismatch: expected {expected}, actual {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

impl From<ClusteringError> for EngineError {
    fn from(err: ClusteringError) -> Self {
        match err {
            // A caller-visible sizing problem, not an internal fault.
            ClusteringError::InvalidClusterCount { .. } => {
                EngineError::invalid_config(err.to_string())
            }
            _ => EngineError::pipeline(err.to_string()),
        }
    }
}
