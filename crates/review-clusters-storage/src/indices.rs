//! Index name registry.
//!
//! One index per entity kind; every store access names its index through
//! these constants so a rename stays a one-line change.

/// Canonical index names.
pub mod index_names {
    /// Raw product reviews (pipeline input).
    pub const REVIEW: &str = "review";
    /// Experiment documents.
    pub const EXPERIMENT: &str = "experiment";
    /// Cluster documents.
    pub const CLUSTER: &str = "experiment_cluster";
    /// Topic documents.
    pub const TOPIC: &str = "experiment_topic";
    /// Sentence documents.
    pub const SENTENCE: &str = "experiment_sentence";

    /// Every index the engine writes, for bulk refresh.
    pub const ALL: [&str; 5] = [REVIEW, EXPERIMENT, CLUSTER, TOPIC, SENTENCE];
}
