//! Closed name registries for embedding and clustering method selection.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// How sentences are represented before partitioning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddingMethod {
    /// Pairwise euclidean distance matrix rows.
    DistanceMatrix,
    /// Pairwise cosine similarity matrix rows.
    SimilarityMatrix,
    /// Raw sentence vectors.
    SentenceVectors,
}

impl EmbeddingMethod {
    /// Parse a method name.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for an unrecognized name.
    pub fn parse(name: &str) -> EngineResult<Self> {
        match name {
            "sent2vec_dist" => Ok(Self::DistanceMatrix),
            "sent2vec_sim" => Ok(Self::SimilarityMatrix),
            "sent2vec_vec" => Ok(Self::SentenceVectors),
            other => Err(EngineError::invalid_config(format!(
                "unknown embedding method '{other}'"
            ))),
        }
    }

    /// Canonical name, as persisted on the experiment document.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DistanceMatrix => "sent2vec_dist",
            Self::SimilarityMatrix => "sent2vec_sim",
            Self::SentenceVectors => "sent2vec_vec",
        }
    }
}

impl fmt::Display for EmbeddingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Partitioning algorithm.
///
/// K-means is the only supported strategy today; the enum keeps the contract
/// open for others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClusterMethod {
    KMeans,
}

impl ClusterMethod {
    /// Parse a method name.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for an unrecognized name.
    pub fn parse(name: &str) -> EngineResult<Self> {
        match name {
            "kmeans" => Ok(Self::KMeans),
            other => Err(EngineError::invalid_config(format!(
                "unknown cluster method '{other}'"
            ))),
        }
    }

    /// Canonical name, as persisted on the experiment document.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::KMeans => "kmeans",
        }
    }
}

impl fmt::Display for ClusterMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Known embedding model names.
///
/// The model itself is an external collaborator; this registry only guards
/// against typos before a run starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmbeddingModel {
    /// Pretrained fastText common-crawl sentence model.
    FasttextCc,
    /// Deterministic hashing model for tests and development.
    StubHash,
}

impl EmbeddingModel {
    /// Parse a model name.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for an unrecognized name.
    pub fn parse(name: &str) -> EngineResult<Self> {
        match name {
            "fasttext-cc" => Ok(Self::FasttextCc),
            "stub-hash" => Ok(Self::StubHash),
            other => Err(EngineError::invalid_config(format!(
                "unknown embedding model '{other}'"
            ))),
        }
    }

    /// Canonical name, as persisted on the experiment document.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FasttextCc => "fasttext-cc",
            Self::StubHash => "stub-hash",
        }
    }
}

impl fmt::Display for EmbeddingModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedding_method_parse_roundtrip() {
        for name in ["sent2vec_dist", "sent2vec_sim", "sent2vec_vec"] {
            let method = EmbeddingMethod::parse(name).unwrap();
            assert_eq!(method.as_str(), name);
        }
    }

    #[test]
    fn test_unknown_names_fail_fast() {
        assert!(EmbeddingMethod::parse("word2vec").is_err());
        assert!(ClusterMethod::parse("dbscan").is_err());
        assert!(EmbeddingModel::parse("bert-base").is_err());

        let err = ClusterMethod::parse("dbscan").unwrap_err();
        assert_eq!(err.kind(), "invalid_config");
        assert!(err.to_string().contains("dbscan"));

        println!("[PASS] test_unknown_names_fail_fast - {}", err);
    }

    #[test]
    fn test_cluster_method_parse() {
        assert_eq!(ClusterMethod::parse("kmeans").unwrap(), ClusterMethod::KMeans);
        assert_eq!(ClusterMethod::KMeans.to_string(), "kmeans");
    }

    #[test]
    fn test_embedding_model_parse() {
        assert_eq!(
            EmbeddingModel::parse("fasttext-cc").unwrap(),
            EmbeddingModel::FasttextCc
        );
        assert_eq!(EmbeddingModel::StubHash.as_str(), "stub-hash");
    }
}
