//! Error types for review-clusters-core.

use thiserror::Error;
use uuid::Uuid;

/// Top-level error type for the clustering and topic lifecycle engine.
///
/// Every operation surfaces failures as a structured (kind, message) pair;
/// [`EngineError::kind`] returns the stable kind name for callers that need
/// to dispatch on it (an HTTP layer mapping kinds to status codes, for
/// example).
#[derive(Debug, Error)]
pub enum EngineError {
    /// Unrecognized method/model name or a missing required field.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// An active (non-deleted) experiment already exists for the category.
    #[error("An active experiment already exists for category '{category}'")]
    DuplicateExperiment { category: String },

    /// A referenced experiment/cluster/topic/sentence id does not resolve.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: Uuid },

    /// A store write was not acknowledged as created/updated.
    #[error("Persistence error: {message}")]
    PersistenceError { message: String },

    /// Morphological tagging failed for a single sentence.
    ///
    /// Non-fatal: extraction drops the sentence and continues.
    #[error("Tagging failed: {message}")]
    TaggingFailure { message: String },

    /// Unexpected failure at orchestration level.
    #[error("Pipeline failure: {message}")]
    PipelineFailure { message: String },
}

impl EngineError {
    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a DuplicateExperiment error.
    pub fn duplicate_experiment(category: impl Into<String>) -> Self {
        Self::DuplicateExperiment {
            category: category.into(),
        }
    }

    /// Create a NotFound error for the given entity kind.
    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        Self::NotFound { entity, id }
    }

    /// Create a PersistenceError.
    pub fn persistence(message: impl Into<String>) -> Self {
        Self::PersistenceError {
            message: message.into(),
        }
    }

    /// Create a per-sentence TaggingFailure.
    pub fn tagging(message: impl Into<String>) -> Self {
        Self::TaggingFailure {
            message: message.into(),
        }
    }

    /// Create a PipelineFailure wrapping an unexpected error.
    pub fn pipeline(message: impl Into<String>) -> Self {
        Self::PipelineFailure {
            message: message.into(),
        }
    }

    /// Stable kind name for structured error surfacing.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "invalid_config",
            Self::DuplicateExperiment { .. } => "duplicate_experiment",
            Self::NotFound { .. } => "not_found",
            Self::PersistenceError { .. } => "persistence_error",
            Self::TaggingFailure { .. } => "tagging_failure",
            Self::PipelineFailure { .. } => "pipeline_failure",
        }
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::persistence(format!("document serialization failed: {err}"))
    }
}

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
