//! End-to-end pipeline orchestration for one "create experiment" request,
//! plus the editing operations exposed on the persisted graph.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

use tracing::{error, info, warn};
use uuid::Uuid;

use review_clusters_core::clustering::{ClusterRequest, EmbeddingClusterer};
use review_clusters_core::distill::{ClusterBucket, TopicDistiller};
use review_clusters_core::error::{EngineError, EngineResult};
use review_clusters_core::extract::SentenceExtractor;
use review_clusters_core::traits::DocumentStore;
use review_clusters_core::types::{
    Cluster, ClusterRef, Experiment, Polarity, Review, Sentence, SentenceDraft, Topic,
};
use review_clusters_storage::ExperimentRepository;

use crate::config::{ResolvedMethods, RunConfig};
use crate::context::PipelineContext;

/// Pipeline run state, in execution order.
///
/// `Failed` is terminal and reachable from every step; completed sub-steps
/// are not rolled back (compensating cleanup is `delete_experiment`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Validating,
    FetchingReviews,
    ExtractingSentences,
    SavingExperiment,
    ClusteringPos,
    ClusteringCon,
    DistillingTopics,
    Finalizing,
    Done,
    Failed,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Validating => "validating",
            Self::FetchingReviews => "fetching_reviews",
            Self::ExtractingSentences => "extracting_sentences",
            Self::SavingExperiment => "saving_experiment",
            Self::ClusteringPos => "clustering_pos",
            Self::ClusteringCon => "clustering_con",
            Self::DistillingTopics => "distilling_topics",
            Self::Finalizing => "finalizing",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Outcome of an extraction dry-run over a category's reviews.
#[derive(Debug, Clone)]
pub struct PeekSummary {
    pub category: String,
    pub pos_sentences: usize,
    pub con_sentences: usize,
}

/// Outcome of a successful pipeline run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub experiment_id: Uuid,
    pub category: String,
    pub pos_sentences: usize,
    pub con_sentences: usize,
    pub pos_clusters: usize,
    pub con_clusters: usize,
    pub topics_created: usize,
}

/// Per-polarity intermediate state between clustering and distillation.
struct PolarityWork {
    polarity: Polarity,
    drafts: Vec<SentenceDraft>,
    /// One cluster label per draft, parallel to `drafts`.
    labels: Vec<usize>,
    /// Persisted clusters keyed by label.
    clusters: BTreeMap<usize, Cluster>,
    /// Distillation input keyed by label.
    buckets: BTreeMap<usize, ClusterBucket>,
}

impl PolarityWork {
    fn empty(polarity: Polarity) -> Self {
        Self {
            polarity,
            drafts: Vec::new(),
            labels: Vec::new(),
            clusters: BTreeMap::new(),
            buckets: BTreeMap::new(),
        }
    }
}

/// Sequences extraction, clustering, distillation, and persistence for a
/// category, and exposes the lifecycle editing operations.
pub struct ClusterPipelineOrchestrator {
    repository: ExperimentRepository,
    context: PipelineContext,
}

impl ClusterPipelineOrchestrator {
    pub fn new(store: Arc<dyn DocumentStore>, context: PipelineContext) -> Self {
        Self {
            repository: ExperimentRepository::new(store),
            context,
        }
    }

    /// The underlying repository, for callers that need direct access.
    pub fn repository(&self) -> &ExperimentRepository {
        &self.repository
    }

    /// Execute one full clustering run for the requested category.
    ///
    /// Any failure aborts the run; documents persisted by completed sub-steps
    /// remain and can be cleaned up with [`Self::delete_experiment`].
    pub async fn run(&self, config: &RunConfig) -> EngineResult<RunSummary> {
        match self.run_inner(config).await {
            Ok(summary) => {
                info!(
                    state = %RunState::Done,
                    experiment_id = %summary.experiment_id,
                    category = %summary.category,
                    pos_sentences = summary.pos_sentences,
                    con_sentences = summary.con_sentences,
                    "pipeline run complete"
                );
                Ok(summary)
            }
            Err(err) => {
                error!(
                    state = %RunState::Failed,
                    category = %config.category,
                    kind = err.kind(),
                    error = %err,
                    "pipeline run failed"
                );
                Err(err)
            }
        }
    }

    async fn run_inner(&self, config: &RunConfig) -> EngineResult<RunSummary> {
        let mut state = RunState::Validating;
        let methods = config.validate()?;
        if self
            .repository
            .find_experiment_by_category(&config.category)
            .await?
            .is_some()
        {
            return Err(EngineError::duplicate_experiment(&config.category));
        }

        advance(&mut state, RunState::FetchingReviews);
        let reviews = self.fetch_reviews(&config.category).await?;

        advance(&mut state, RunState::ExtractingSentences);
        let extractor = SentenceExtractor::new(self.context.tagger.as_ref());
        let mut pos_drafts = Vec::new();
        let mut con_drafts = Vec::new();
        for review in &reviews {
            pos_drafts.extend(extractor.extract(review, Polarity::Pos));
            con_drafts.extend(extractor.extract(review, Polarity::Con));
        }
        if pos_drafts.is_empty() && con_drafts.is_empty() {
            return Err(EngineError::invalid_config(format!(
                "no usable sentences in reviews for '{}'",
                config.category
            )));
        }

        advance(&mut state, RunState::SavingExperiment);
        let mut experiment = Experiment::shell(
            &config.category,
            methods.cluster_method.as_str(),
            methods.embedding_method.as_str(),
            methods.embedding_model.as_str(),
            config.topics_per_cluster,
            config.clusters_pos_count,
            config.clusters_con_count,
            pos_drafts.len(),
            con_drafts.len(),
        );
        experiment.id = self.repository.save_experiment(&experiment).await?;

        advance(&mut state, RunState::ClusteringPos);
        let pos_work = self
            .cluster_polarity(
                experiment.id,
                Polarity::Pos,
                pos_drafts,
                config.clusters_pos_count,
                &methods,
            )
            .await?;

        advance(&mut state, RunState::ClusteringCon);
        let con_work = self
            .cluster_polarity(
                experiment.id,
                Polarity::Con,
                con_drafts,
                config.clusters_con_count,
                &methods,
            )
            .await?;

        advance(&mut state, RunState::DistillingTopics);
        let mut topics_created = 0;
        let (pos_terms, pos_refs, count) = self
            .distill_polarity(experiment.id, &pos_work, config.topics_per_cluster)
            .await?;
        topics_created += count;
        let (con_terms, con_refs, count) = self
            .distill_polarity(experiment.id, &con_work, config.topics_per_cluster)
            .await?;
        topics_created += count;

        advance(&mut state, RunState::Finalizing);
        experiment.salient_terms_pos = pos_terms;
        experiment.salient_terms_con = con_terms;
        experiment.clusters_pos = pos_refs;
        experiment.clusters_con = con_refs;
        self.repository.update_experiment(&experiment).await?;
        self.repository.refresh_indices().await?;

        advance(&mut state, RunState::Done);
        Ok(RunSummary {
            experiment_id: experiment.id,
            category: experiment.category,
            pos_sentences: experiment.pos_sentences,
            con_sentences: experiment.con_sentences,
            pos_clusters: pos_work.clusters.len(),
            con_clusters: con_work.clusters.len(),
            topics_created,
        })
    }

    /// Fetch reviews by category, falling back to product-name lookup when
    /// the category matches nothing (the name may be a product or shop).
    async fn fetch_reviews(&self, category: &str) -> EngineResult<Vec<Review>> {
        let reviews = self.repository.fetch_reviews_by_category(category).await?;
        if !reviews.is_empty() {
            return Ok(reviews);
        }

        warn!(category, "no reviews by category, retrying as product name");
        let reviews = self.repository.fetch_reviews_by_product(category).await?;
        if reviews.is_empty() {
            return Err(EngineError::invalid_config(format!(
                "no reviews found for '{category}'"
            )));
        }
        Ok(reviews)
    }

    /// Cluster one polarity's drafts and persist the cluster metadata.
    async fn cluster_polarity(
        &self,
        experiment_id: Uuid,
        polarity: Polarity,
        drafts: Vec<SentenceDraft>,
        cluster_count: usize,
        methods: &ResolvedMethods,
    ) -> EngineResult<PolarityWork> {
        if drafts.is_empty() {
            warn!(%polarity, "no sentences for polarity, skipping clustering");
            return Ok(PolarityWork::empty(polarity));
        }

        let lemma_sequences: Vec<Vec<String>> =
            drafts.iter().map(|d| d.lemmas.clone()).collect();
        let clusterer = EmbeddingClusterer::new(self.context.embedder.as_ref(), self.context.seed);
        let labels = clusterer.cluster(&ClusterRequest {
            lemma_sequences: &lemma_sequences,
            cluster_count,
            embedding_method: methods.embedding_method,
            cluster_method: methods.cluster_method,
        })?;

        let mut members: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for (i, &label) in labels.iter().enumerate() {
            members.entry(label).or_default().push(i);
        }

        let mut clusters = BTreeMap::new();
        let mut buckets = BTreeMap::new();
        for (&label, indices) in &members {
            let mut cluster = Cluster::new(experiment_id, polarity, label, indices.len());
            cluster.id = self.repository.save_cluster(&cluster).await?;

            let bucket = ClusterBucket {
                cluster_id: cluster.id,
                lemma_docs: indices.iter().map(|&i| drafts[i].lemmas.clone()).collect(),
                noun_lemmas: indices
                    .iter()
                    .flat_map(|&i| drafts[i].noun_lemmas.iter().cloned())
                    .collect(),
            };

            clusters.insert(label, cluster);
            buckets.insert(label, bucket);
        }

        info!(
            %polarity,
            sentences = drafts.len(),
            clusters = clusters.len(),
            "polarity clustered"
        );
        Ok(PolarityWork {
            polarity,
            drafts,
            labels,
            clusters,
            buckets,
        })
    }

    /// Distill topics for one polarity, persist them, and stamp every
    /// sentence with its final cluster/topic membership.
    ///
    /// Returns the polarity's salient terms, its cluster references for the
    /// experiment document, and the number of topics created.
    async fn distill_polarity(
        &self,
        experiment_id: Uuid,
        work: &PolarityWork,
        topics_per_cluster: usize,
    ) -> EngineResult<(BTreeSet<String>, Vec<ClusterRef>, usize)> {
        if work.drafts.is_empty() {
            return Ok((BTreeSet::new(), Vec::new(), 0));
        }

        let distiller = TopicDistiller::new(self.context.topic_model.as_ref());
        let distilled = distiller.distill(&work.buckets, topics_per_cluster);

        let mut topics_created = 0;
        let mut first_topics: HashMap<usize, Uuid> = HashMap::new();
        for (&label, names) in &distilled.per_cluster {
            let cluster = work
                .clusters
                .get(&label)
                .ok_or_else(|| EngineError::pipeline(format!("no cluster for label {label}")))?;

            for (number, name) in names.iter().enumerate() {
                let topic_id = self
                    .repository
                    .save_topic(&Topic::new(experiment_id, cluster.id, name, number))
                    .await?;
                topics_created += 1;
                if number == 0 {
                    first_topics.insert(label, topic_id);
                }
            }
        }

        // Every sentence starts on its cluster's first topic; finer-grained
        // assignment happens through the editing operations.
        for (draft, &label) in work.drafts.iter().zip(&work.labels) {
            let cluster = work
                .clusters
                .get(&label)
                .ok_or_else(|| EngineError::pipeline(format!("no cluster for label {label}")))?;
            let topic_id = first_topics
                .get(&label)
                .copied()
                .ok_or_else(|| EngineError::pipeline(format!("no topic for label {label}")))?;

            self.repository
                .save_sentence(&Sentence::from_draft(
                    draft,
                    experiment_id,
                    cluster.id,
                    topic_id,
                ))
                .await?;
        }

        // Barrier per polarity: downstream reads must see this batch.
        self.repository.refresh_indices().await?;

        let refs = work.clusters.values().map(Cluster::to_ref).collect();
        info!(
            polarity = %work.polarity,
            topics = topics_created,
            sentences = work.drafts.len(),
            "polarity distilled and persisted"
        );
        Ok((distilled.salient_terms, refs, topics_created))
    }

    // ------------------------------------------------------------------
    // Editing operations
    // ------------------------------------------------------------------

    /// All experiments, after a consistency barrier.
    pub async fn list_experiments(&self) -> EngineResult<Vec<Experiment>> {
        self.repository.list_experiments().await
    }

    /// Extraction dry-run: fetch a category's reviews (with the product-name
    /// fallback), extract both polarities, and report what a run would
    /// cluster. Persists nothing.
    pub async fn peek_sentences(&self, category: &str) -> EngineResult<PeekSummary> {
        let reviews = self.fetch_reviews(category).await?;
        let extractor = SentenceExtractor::new(self.context.tagger.as_ref());

        let mut counts = [0usize; 2];
        for (count, polarity) in counts.iter_mut().zip(Polarity::BOTH) {
            *count = reviews
                .iter()
                .map(|review| extractor.extract(review, polarity).len())
                .sum();
        }

        Ok(PeekSummary {
            category: category.to_string(),
            pos_sentences: counts[0],
            con_sentences: counts[1],
        })
    }

    /// Persisted sentences for a category, after a consistency barrier.
    pub async fn stored_sentences(&self, category: &str) -> EngineResult<Vec<Sentence>> {
        self.repository.sentences_by_category(category).await
    }

    /// Rename a cluster. See [`ExperimentRepository::rename_cluster`].
    pub async fn rename_cluster(&self, id: Uuid, name: &str) -> EngineResult<()> {
        self.repository.rename_cluster(id, name).await
    }

    /// Rename a topic. See [`ExperimentRepository::rename_topic`].
    pub async fn rename_topic(&self, id: Uuid, name: &str) -> EngineResult<()> {
        self.repository.rename_topic(id, name).await
    }

    /// Merge one cluster into another. See
    /// [`ExperimentRepository::merge_cluster`].
    pub async fn merge_cluster(
        &self,
        from_id: Uuid,
        to_id: Uuid,
        topic_mapping: &HashMap<Uuid, Uuid>,
    ) -> EngineResult<()> {
        self.repository.merge_cluster(from_id, to_id, topic_mapping).await
    }

    /// Merge one topic into another. See
    /// [`ExperimentRepository::merge_topic`].
    pub async fn merge_topic(
        &self,
        from_topic_id: Uuid,
        to_cluster_id: Uuid,
        to_topic_number: usize,
        to_topic_id: Uuid,
    ) -> EngineResult<()> {
        self.repository
            .merge_topic(from_topic_id, to_cluster_id, to_topic_number, to_topic_id)
            .await
    }

    /// Reassign one sentence. See
    /// [`ExperimentRepository::transfer_sentence`].
    pub async fn transfer_sentence(
        &self,
        cluster_id: Uuid,
        sentence_id: Uuid,
        topic_number: usize,
        topic_id: Uuid,
    ) -> EngineResult<()> {
        self.repository
            .transfer_sentence(cluster_id, sentence_id, topic_number, topic_id)
            .await
    }

    /// Delete an experiment with full cascade, returning the remaining
    /// experiment list.
    pub async fn delete_experiment(&self, id: Uuid) -> EngineResult<Vec<Experiment>> {
        self.repository.delete_experiment(id).await
    }
}

fn advance(state: &mut RunState, next: RunState) {
    info!(from = %state, to = %next, "pipeline state transition");
    *state = next;
}
