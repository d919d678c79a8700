//! Review Clusters Pipeline Library
//!
//! End-to-end orchestration of the clustering and topic lifecycle engine:
//! validates a run request, fetches reviews, extracts sentences, clusters
//! each polarity, distills topics, and persists the resulting
//! experiment/cluster/topic/sentence graph. Also exposes the lifecycle
//! editing operations (rename, merge, transfer, delete).

use review_clusters_core::error::{EngineError, EngineResult};
use tracing_subscriber::EnvFilter;

pub mod config;
pub mod context;
pub mod orchestrator;

pub use config::{EngineSettings, RunConfig};
pub use context::PipelineContext;
pub use orchestrator::{ClusterPipelineOrchestrator, PeekSummary, RunState, RunSummary};

/// Initialize process-wide tracing from the configured filter directive.
///
/// `RUST_LOG` overrides the configured level. Call once at startup; a second
/// call fails because the global subscriber is already set.
pub fn init_tracing(settings: &EngineSettings) -> EngineResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.logging.level))
        .map_err(|e| EngineError::invalid_config(format!("bad logging filter: {e}")))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| EngineError::invalid_config(format!("tracing init failed: {e}")))
}
