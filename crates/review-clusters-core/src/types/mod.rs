//! Domain types for the review clustering engine.

mod cluster;
mod experiment;
mod polarity;
mod review;
mod sentence;
mod topic;
mod word;

pub use cluster::{Cluster, ClusterRef};
pub use experiment::Experiment;
pub use polarity::Polarity;
pub use review::Review;
pub use sentence::{Sentence, SentenceDraft};
pub use topic::Topic;
pub use word::WordToken;
