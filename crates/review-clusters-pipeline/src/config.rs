//! Configuration for pipeline runs and the engine process.

use serde::{Deserialize, Serialize};
use std::path::Path;

use review_clusters_core::clustering::{ClusterMethod, EmbeddingMethod, EmbeddingModel};
use review_clusters_core::error::{EngineError, EngineResult};

/// Parameters of a single "create experiment" request.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RunConfig {
    /// Category to cluster. A product or shop name also works; review lookup
    /// falls back to product matching when the category yields nothing.
    pub category: String,
    /// Embedding representation name (e.g. `sent2vec_vec`).
    pub embedding_method: String,
    /// Clustering algorithm name (e.g. `kmeans`).
    pub cluster_method: String,
    /// Embedding model name (e.g. `stub-hash`).
    pub embedding_model: String,
    pub topics_per_cluster: usize,
    pub clusters_pos_count: usize,
    pub clusters_con_count: usize,
}

/// Method names resolved into their closed registries.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedMethods {
    pub embedding_method: EmbeddingMethod,
    pub cluster_method: ClusterMethod,
    pub embedding_model: EmbeddingModel,
}

impl RunConfig {
    /// Validate the request and resolve its method names.
    ///
    /// Runs before any review retrieval so an unrecognized name never costs
    /// store I/O.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` for an empty category, a zero count, or an
    /// unrecognized method/model name.
    pub fn validate(&self) -> EngineResult<ResolvedMethods> {
        if self.category.trim().is_empty() {
            return Err(EngineError::invalid_config("category must not be empty"));
        }
        if self.topics_per_cluster == 0 {
            return Err(EngineError::invalid_config(
                "topics_per_cluster must be greater than 0",
            ));
        }
        if self.clusters_pos_count == 0 || self.clusters_con_count == 0 {
            return Err(EngineError::invalid_config(
                "cluster counts must be greater than 0",
            ));
        }

        Ok(ResolvedMethods {
            embedding_method: EmbeddingMethod::parse(&self.embedding_method)?,
            cluster_method: ClusterMethod::parse(&self.cluster_method)?,
            embedding_model: EmbeddingModel::parse(&self.embedding_model)?,
        })
    }
}

/// Process-wide engine settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EngineSettings {
    #[serde(default)]
    pub logging: LoggingSettings,
    #[serde(default)]
    pub pipeline: PipelineSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingSettings {
    /// Tracing filter directive (e.g. `info`, `review_clusters_pipeline=debug`).
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PipelineSettings {
    /// RNG seed for clustering reproducibility.
    pub seed: u64,
    /// Default topics per cluster when a request omits it.
    pub default_topics_per_cluster: usize,
    /// Default cluster count per polarity when a request omits it.
    pub default_cluster_count: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            seed: 42,
            default_topics_per_cluster: 3,
            default_cluster_count: 8,
        }
    }
}

impl EngineSettings {
    /// Load settings from files and environment.
    ///
    /// Configuration is loaded in order:
    /// 1. config/default.toml (base settings)
    /// 2. config/{REVIEW_CLUSTERS_ENV}.toml (environment-specific)
    /// 3. Environment variables with REVIEW_CLUSTERS_ prefix
    pub fn load() -> EngineResult<Self> {
        let env =
            std::env::var("REVIEW_CLUSTERS_ENV").unwrap_or_else(|_| "development".to_string());

        let builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(config::Environment::with_prefix("REVIEW_CLUSTERS").separator("__"));

        let settings: EngineSettings = builder
            .build()
            .map_err(|e| EngineError::invalid_config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| EngineError::invalid_config(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a TOML file.
    pub fn from_file(path: &Path) -> EngineResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            EngineError::invalid_config(format!(
                "failed to read config file {}: {e}",
                path.display()
            ))
        })?;

        let settings: EngineSettings = toml::from_str(&content)
            .map_err(|e| EngineError::invalid_config(format!("failed to parse config file: {e}")))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate settings values.
    pub fn validate(&self) -> EngineResult<()> {
        if self.pipeline.default_topics_per_cluster == 0 {
            return Err(EngineError::invalid_config(
                "pipeline.default_topics_per_cluster must be greater than 0",
            ));
        }
        if self.pipeline.default_cluster_count == 0 {
            return Err(EngineError::invalid_config(
                "pipeline.default_cluster_count must be greater than 0",
            ));
        }
        Ok(())
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            logging: LoggingSettings::default(),
            pipeline: PipelineSettings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn run_config() -> RunConfig {
        RunConfig {
            category: "phones".into(),
            embedding_method: "sent2vec_vec".into(),
            cluster_method: "kmeans".into(),
            embedding_model: "stub-hash".into(),
            topics_per_cluster: 3,
            clusters_pos_count: 8,
            clusters_con_count: 8,
        }
    }

    #[test]
    fn test_run_config_resolves_methods() {
        let resolved = run_config().validate().unwrap();
        assert_eq!(resolved.embedding_method, EmbeddingMethod::SentenceVectors);
        assert_eq!(resolved.cluster_method, ClusterMethod::KMeans);
        assert_eq!(resolved.embedding_model, EmbeddingModel::StubHash);

        println!("[PASS] test_run_config_resolves_methods");
    }

    #[test]
    fn test_run_config_rejects_bad_input() {
        let mut config = run_config();
        config.category = "  ".into();
        assert_eq!(config.validate().unwrap_err().kind(), "invalid_config");

        let mut config = run_config();
        config.embedding_method = "word2vec".into();
        assert_eq!(config.validate().unwrap_err().kind(), "invalid_config");

        let mut config = run_config();
        config.topics_per_cluster = 0;
        assert_eq!(config.validate().unwrap_err().kind(), "invalid_config");
    }

    #[test]
    fn test_settings_defaults_validate() {
        let settings = EngineSettings::default();
        settings.validate().unwrap();
        assert_eq!(settings.logging.level, "info");
        assert_eq!(settings.pipeline.seed, 42);
    }

    #[test]
    fn test_settings_from_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[logging]\nlevel = \"debug\"\n\n[pipeline]\nseed = 7\ndefault_topics_per_cluster = 2\ndefault_cluster_count = 4\n"
        )
        .unwrap();

        let settings = EngineSettings::from_file(file.path()).unwrap();
        assert_eq!(settings.logging.level, "debug");
        assert_eq!(settings.pipeline.seed, 7);
        assert_eq!(settings.pipeline.default_cluster_count, 4);

        println!("[PASS] test_settings_from_toml_file");
    }

    #[test]
    fn test_settings_reject_zero_defaults() {
        let mut settings = EngineSettings::default();
        settings.pipeline.default_cluster_count = 0;
        assert_eq!(settings.validate().unwrap_err().kind(), "invalid_config");
    }
}
