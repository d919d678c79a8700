//! Experiment repository: persistence and lifecycle manager for the
//! experiment/cluster/topic/sentence graph.
//!
//! The store lacks multi-document transactions, so the editing operations
//! compensate with an idempotent retry contract: every reassignment write is
//! safe to repeat, and a replayed merge fails with `NotFound` once the source
//! document is gone instead of corrupting the target.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

use review_clusters_core::error::{EngineError, EngineResult};
use review_clusters_core::traits::{
    DocumentStore, QueryFilter, StoredDocument, WriteOutcome, WriteReceipt,
};
use review_clusters_core::types::{Cluster, ClusterRef, Experiment, Review, Sentence, Topic};

use crate::indices::index_names;

/// Persistence and lifecycle manager for clustering experiments.
///
/// All entity documents are insert-only creates stamped with store-assigned
/// ids; consistency between a write batch and a dependent query requires an
/// explicit [`ExperimentRepository::refresh_indices`] barrier.
pub struct ExperimentRepository {
    store: Arc<dyn DocumentStore>,
}

impl ExperimentRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// The underlying store handle.
    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    // ------------------------------------------------------------------
    // Creates
    // ------------------------------------------------------------------

    /// Persist a new experiment.
    ///
    /// Precondition: no active experiment exists for the category, checked by
    /// querying the store immediately before creation. The check-then-act
    /// window is accepted under the single-writer assumption.
    ///
    /// # Errors
    ///
    /// - `DuplicateExperiment` when the category already has an experiment
    /// - `PersistenceError` when the insert is not acknowledged as created
    pub async fn save_experiment(&self, experiment: &Experiment) -> EngineResult<Uuid> {
        self.store.refresh(index_names::EXPERIMENT).await?;
        let existing = self
            .store
            .query(
                index_names::EXPERIMENT,
                &QueryFilter::new().term("category", experiment.category.as_str()),
            )
            .await?;
        if !existing.is_empty() {
            return Err(EngineError::duplicate_experiment(&experiment.category));
        }

        let receipt = self
            .store
            .index(index_names::EXPERIMENT, serde_json::to_value(experiment)?)
            .await?;
        let id = ack_created(receipt, index_names::EXPERIMENT)?;

        info!(category = %experiment.category, experiment_id = %id, "experiment created");
        Ok(id)
    }

    /// Persist cluster metadata, returning the store-assigned id.
    pub async fn save_cluster(&self, cluster: &Cluster) -> EngineResult<Uuid> {
        let receipt = self
            .store
            .index(index_names::CLUSTER, serde_json::to_value(cluster)?)
            .await?;
        ack_created(receipt, index_names::CLUSTER)
    }

    /// Persist topic metadata, returning the store-assigned id.
    pub async fn save_topic(&self, topic: &Topic) -> EngineResult<Uuid> {
        let receipt = self
            .store
            .index(index_names::TOPIC, serde_json::to_value(topic)?)
            .await?;
        ack_created(receipt, index_names::TOPIC)
    }

    /// Persist a stamped sentence document, returning the store-assigned id.
    pub async fn save_sentence(&self, sentence: &Sentence) -> EngineResult<Uuid> {
        let receipt = self
            .store
            .index(index_names::SENTENCE, serde_json::to_value(sentence)?)
            .await?;
        ack_created(receipt, index_names::SENTENCE)
    }

    /// Seed a raw review document. Primarily for ingestion tooling and tests.
    pub async fn save_review(&self, review: &Review) -> EngineResult<Uuid> {
        let receipt = self
            .store
            .index(index_names::REVIEW, serde_json::to_value(review)?)
            .await?;
        ack_created(receipt, index_names::REVIEW)
    }

    /// Consistency barrier: make every prior write visible to queries.
    pub async fn refresh_indices(&self) -> EngineResult<()> {
        for index in index_names::ALL {
            self.store.refresh(index).await?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// Fetch one experiment by id.
    pub async fn get_experiment(&self, id: Uuid) -> EngineResult<Experiment> {
        let doc = self
            .store
            .get(index_names::EXPERIMENT, id)
            .await?
            .ok_or_else(|| EngineError::not_found("experiment", id))?;
        decode_experiment(StoredDocument { id, source: doc })
    }

    /// All experiments, after a refresh barrier.
    pub async fn list_experiments(&self) -> EngineResult<Vec<Experiment>> {
        self.store.refresh(index_names::EXPERIMENT).await?;
        let hits = self
            .store
            .query(index_names::EXPERIMENT, &QueryFilter::new())
            .await?;
        hits.into_iter().map(decode_experiment).collect()
    }

    /// The active experiment for a category, if one exists.
    pub async fn find_experiment_by_category(
        &self,
        category: &str,
    ) -> EngineResult<Option<Experiment>> {
        self.store.refresh(index_names::EXPERIMENT).await?;
        let hits = self
            .store
            .query(
                index_names::EXPERIMENT,
                &QueryFilter::new().term("category", category),
            )
            .await?;
        hits.into_iter().next().map(decode_experiment).transpose()
    }

    /// Reviews matching a category name.
    pub async fn fetch_reviews_by_category(&self, category: &str) -> EngineResult<Vec<Review>> {
        self.store.refresh(index_names::REVIEW).await?;
        let hits = self
            .store
            .query(
                index_names::REVIEW,
                &QueryFilter::new().term("category", category),
            )
            .await?;
        hits.into_iter().map(decode_review).collect()
    }

    /// Reviews matching a product name. Fallback lookup when a category name
    /// turns out to be a product or shop name.
    pub async fn fetch_reviews_by_product(&self, product_name: &str) -> EngineResult<Vec<Review>> {
        self.store.refresh(index_names::REVIEW).await?;
        let hits = self
            .store
            .query(
                index_names::REVIEW,
                &QueryFilter::new().term("product_name", product_name),
            )
            .await?;
        hits.into_iter().map(decode_review).collect()
    }

    /// Persisted sentences for a category, after a refresh barrier.
    pub async fn sentences_by_category(&self, category: &str) -> EngineResult<Vec<Sentence>> {
        self.store.refresh(index_names::SENTENCE).await?;
        let hits = self
            .store
            .query(
                index_names::SENTENCE,
                &QueryFilter::new().term("category_name", category),
            )
            .await?;
        hits.into_iter().map(decode_sentence).collect()
    }

    // ------------------------------------------------------------------
    // Updates
    // ------------------------------------------------------------------

    /// Replace an experiment document's mutable fields with the given state.
    pub async fn update_experiment(&self, experiment: &Experiment) -> EngineResult<()> {
        let outcome = self
            .store
            .update(
                index_names::EXPERIMENT,
                experiment.id,
                serde_json::to_value(experiment)?,
            )
            .await?;
        ack_updated(outcome, "experiment", experiment.id)
    }

    /// Rename a cluster, updating its reference on the owning experiment.
    ///
    /// # Errors
    ///
    /// `NotFound` if the cluster id does not resolve.
    pub async fn rename_cluster(&self, id: Uuid, name: &str) -> EngineResult<()> {
        let cluster = self.get_cluster(id).await?;
        let outcome = self
            .store
            .update(index_names::CLUSTER, id, json!({ "name": name }))
            .await?;
        ack_updated(outcome, "cluster", id)?;

        self.patch_cluster_ref(cluster.experiment_id, id, |cluster_ref| {
            cluster_ref.name = name.to_string();
        })
        .await?;

        debug!(cluster_id = %id, name, "cluster renamed");
        Ok(())
    }

    /// Rename a topic.
    ///
    /// # Errors
    ///
    /// `NotFound` if the topic id does not resolve.
    pub async fn rename_topic(&self, id: Uuid, name: &str) -> EngineResult<()> {
        let outcome = self
            .store
            .update(index_names::TOPIC, id, json!({ "name": name }))
            .await?;
        ack_updated(outcome, "topic", id)?;

        debug!(topic_id = %id, name, "topic renamed");
        Ok(())
    }

    /// Merge cluster `from_id` into `to_id`.
    ///
    /// Topics of the source cluster listed in `topic_mapping` have their
    /// sentences relocated to the mapped target topic and are then deleted;
    /// unmapped topics are adopted by the target cluster under fresh topic
    /// numbers. The source cluster is deleted last, so a replay of a
    /// partially-completed merge repeats only idempotent writes, and a replay
    /// after completion fails with `NotFound` leaving the target unchanged.
    ///
    /// # Errors
    ///
    /// - `NotFound` when either cluster id does not resolve
    /// - `InvalidConfig` when the clusters differ in experiment or polarity
    pub async fn merge_cluster(
        &self,
        from_id: Uuid,
        to_id: Uuid,
        topic_mapping: &HashMap<Uuid, Uuid>,
    ) -> EngineResult<()> {
        let from = self.get_cluster(from_id).await?;
        let to = self.get_cluster(to_id).await?;

        if from.experiment_id != to.experiment_id {
            return Err(EngineError::invalid_config(
                "cannot merge clusters from different experiments",
            ));
        }
        if from.polarity != to.polarity {
            return Err(EngineError::invalid_config(
                "cannot merge clusters of different polarity",
            ));
        }

        self.store.refresh(index_names::TOPIC).await?;
        self.store.refresh(index_names::SENTENCE).await?;

        let source_topics = self.topics_of_cluster(from_id).await?;
        let target_topics = self.topics_of_cluster(to_id).await?;
        let mut next_number = target_topics
            .iter()
            .map(|t| t.topic_number + 1)
            .max()
            .unwrap_or(0);
        let mut taken_names: BTreeSet<String> =
            target_topics.into_iter().map(|t| t.name).collect();

        for topic in source_topics {
            match topic_mapping.get(&topic.id) {
                Some(&target_topic_id) => {
                    // Verify the mapped target before moving anything onto it.
                    let target = self.get_topic(target_topic_id).await?;
                    if target.cluster_id != to_id {
                        return Err(EngineError::invalid_config(format!(
                            "mapped topic {target_topic_id} does not belong to cluster {to_id}"
                        )));
                    }
                    self.relocate_topic_sentences(topic.id, to_id, target_topic_id)
                        .await?;
                    let outcome = self.store.delete(index_names::TOPIC, topic.id).await?;
                    ack_updated(outcome, "topic", topic.id)?;
                }
                None => {
                    // Topic names stay unique within the target cluster:
                    // suffix a colliding name with its new topic number.
                    let name = if taken_names.contains(&topic.name) {
                        format!("{}_{next_number}", topic.name)
                    } else {
                        topic.name.clone()
                    };
                    taken_names.insert(name.clone());

                    let outcome = self
                        .store
                        .update(
                            index_names::TOPIC,
                            topic.id,
                            json!({
                                "cluster_id": to_id,
                                "topic_number": next_number,
                                "name": name,
                            }),
                        )
                        .await?;
                    ack_updated(outcome, "topic", topic.id)?;
                    next_number += 1;

                    self.repoint_sentence_cluster(topic.id, to_id).await?;
                }
            }
        }

        // Sweep any sentence still pointing at the source cluster. Safe to
        // repeat, covers replays that died between topic batches.
        let leftovers = self
            .store
            .query(
                index_names::SENTENCE,
                &QueryFilter::new().term("cluster_id", from_id.to_string()),
            )
            .await?;
        for hit in leftovers {
            let outcome = self
                .store
                .update(
                    index_names::SENTENCE,
                    hit.id,
                    json!({ "cluster_id": to_id }),
                )
                .await?;
            ack_updated(outcome, "sentence", hit.id)?;
        }

        let merged_count = to.sentence_count + from.sentence_count;
        let outcome = self
            .store
            .update(
                index_names::CLUSTER,
                to_id,
                json!({ "sentence_count": merged_count }),
            )
            .await?;
        ack_updated(outcome, "cluster", to_id)?;

        let outcome = self.store.delete(index_names::CLUSTER, from_id).await?;
        ack_updated(outcome, "cluster", from_id)?;

        // Keep the experiment's embedded references consistent.
        self.remove_cluster_ref(from.experiment_id, from_id).await?;
        self.patch_cluster_ref(to.experiment_id, to_id, |cluster_ref| {
            cluster_ref.sentence_count = merged_count;
        })
        .await?;

        info!(
            from_cluster = %from_id,
            to_cluster = %to_id,
            sentences = merged_count,
            "clusters merged"
        );
        Ok(())
    }

    /// Merge one topic into another, relocating its sentences.
    ///
    /// `to_cluster_id` and `to_topic_number` must describe the target topic;
    /// a mismatch is rejected before any sentence moves.
    ///
    /// # Errors
    ///
    /// - `NotFound` when either topic id does not resolve
    /// - `InvalidConfig` when the target address does not match the target
    ///   topic, or the merge would cross experiments or polarities
    pub async fn merge_topic(
        &self,
        from_topic_id: Uuid,
        to_cluster_id: Uuid,
        to_topic_number: usize,
        to_topic_id: Uuid,
    ) -> EngineResult<()> {
        let from = self.get_topic(from_topic_id).await?;
        let to = self.get_topic(to_topic_id).await?;

        if to.cluster_id != to_cluster_id || to.topic_number != to_topic_number {
            return Err(EngineError::invalid_config(format!(
                "topic {to_topic_id} is not topic {to_topic_number} of cluster {to_cluster_id}"
            )));
        }

        // Sentences must never land in a cluster of another experiment or
        // polarity.
        let from_cluster = self.get_cluster(from.cluster_id).await?;
        let to_cluster = self.get_cluster(to_cluster_id).await?;
        if from_cluster.experiment_id != to_cluster.experiment_id {
            return Err(EngineError::invalid_config(
                "cannot merge topics across experiments",
            ));
        }
        if from_cluster.polarity != to_cluster.polarity {
            return Err(EngineError::invalid_config(
                "cannot merge topics across polarities",
            ));
        }

        self.store.refresh(index_names::SENTENCE).await?;
        let moved = self
            .relocate_topic_sentences(from_topic_id, to_cluster_id, to_topic_id)
            .await?;

        let outcome = self.store.delete(index_names::TOPIC, from_topic_id).await?;
        ack_updated(outcome, "topic", from_topic_id)?;

        // Sentence counts only shift when the merge crosses clusters.
        if from.cluster_id != to_cluster_id {
            self.shift_sentence_count(from.cluster_id, -(moved as i64)).await?;
            self.shift_sentence_count(to_cluster_id, moved as i64).await?;
        }

        info!(
            from_topic = %from_topic_id,
            to_topic = %to_topic_id,
            sentences = moved,
            "topics merged"
        );
        Ok(())
    }

    /// Reassign a single sentence's cluster/topic membership.
    ///
    /// `topic_number` must match the target topic's ordinal within
    /// `cluster_id`, and the target cluster must belong to the sentence's
    /// experiment and polarity; any mismatch is rejected without touching
    /// the sentence.
    pub async fn transfer_sentence(
        &self,
        cluster_id: Uuid,
        sentence_id: Uuid,
        topic_number: usize,
        topic_id: Uuid,
    ) -> EngineResult<()> {
        let sentence = self.get_sentence(sentence_id).await?;
        let target = self.get_cluster(cluster_id).await?;
        let topic = self.get_topic(topic_id).await?;

        if topic.cluster_id != cluster_id || topic.topic_number != topic_number {
            return Err(EngineError::invalid_config(format!(
                "topic {topic_id} is not topic {topic_number} of cluster {cluster_id}"
            )));
        }
        if target.experiment_id != sentence.experiment_id {
            return Err(EngineError::invalid_config(
                "cannot transfer a sentence into another experiment's cluster",
            ));
        }
        if target.polarity != sentence.polarity {
            return Err(EngineError::invalid_config(
                "cannot transfer a sentence into a cluster of the opposite polarity",
            ));
        }

        let outcome = self
            .store
            .update(
                index_names::SENTENCE,
                sentence_id,
                json!({
                    "cluster_id": cluster_id,
                    "topic_id": topic_id,
                }),
            )
            .await?;
        ack_updated(outcome, "sentence", sentence_id)?;

        if sentence.cluster_id != cluster_id {
            self.shift_sentence_count(sentence.cluster_id, -1).await?;
            self.shift_sentence_count(cluster_id, 1).await?;
        }

        debug!(sentence_id = %sentence_id, cluster_id = %cluster_id, topic_id = %topic_id, "sentence transferred");
        Ok(())
    }

    /// Delete an experiment and cascade to every owned cluster, topic, and
    /// sentence. Returns the refreshed experiment list for display.
    pub async fn delete_experiment(&self, id: Uuid) -> EngineResult<Vec<Experiment>> {
        // Resolve first so a bad id fails before any deletion.
        let experiment = self.get_experiment(id).await?;

        for index in [index_names::CLUSTER, index_names::TOPIC, index_names::SENTENCE] {
            self.store.refresh(index).await?;
            let owned = self
                .store
                .query(index, &QueryFilter::new().term("experiment_id", id.to_string()))
                .await?;
            for hit in owned {
                let outcome = self.store.delete(index, hit.id).await?;
                // A concurrent replay may have removed it already.
                if outcome == WriteOutcome::NotFound {
                    debug!(index, doc_id = %hit.id, "cascade target already gone");
                }
            }
        }

        let outcome = self.store.delete(index_names::EXPERIMENT, id).await?;
        ack_updated(outcome, "experiment", id)?;

        info!(experiment_id = %id, category = %experiment.category, "experiment deleted");
        self.list_experiments().await
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    async fn get_cluster(&self, id: Uuid) -> EngineResult<Cluster> {
        let doc = self
            .store
            .get(index_names::CLUSTER, id)
            .await?
            .ok_or_else(|| EngineError::not_found("cluster", id))?;
        decode_cluster(StoredDocument { id, source: doc })
    }

    async fn get_topic(&self, id: Uuid) -> EngineResult<Topic> {
        let doc = self
            .store
            .get(index_names::TOPIC, id)
            .await?
            .ok_or_else(|| EngineError::not_found("topic", id))?;
        decode_topic(StoredDocument { id, source: doc })
    }

    async fn get_sentence(&self, id: Uuid) -> EngineResult<Sentence> {
        let doc = self
            .store
            .get(index_names::SENTENCE, id)
            .await?
            .ok_or_else(|| EngineError::not_found("sentence", id))?;
        decode_sentence(StoredDocument { id, source: doc })
    }

    async fn topics_of_cluster(&self, cluster_id: Uuid) -> EngineResult<Vec<Topic>> {
        let hits = self
            .store
            .query(
                index_names::TOPIC,
                &QueryFilter::new().term("cluster_id", cluster_id.to_string()),
            )
            .await?;
        hits.into_iter().map(decode_topic).collect()
    }

    /// Move every sentence of a topic to a new cluster/topic pair. Returns
    /// the number of sentences moved.
    async fn relocate_topic_sentences(
        &self,
        topic_id: Uuid,
        to_cluster_id: Uuid,
        to_topic_id: Uuid,
    ) -> EngineResult<usize> {
        let hits = self
            .store
            .query(
                index_names::SENTENCE,
                &QueryFilter::new().term("topic_id", topic_id.to_string()),
            )
            .await?;
        let moved = hits.len();
        for hit in hits {
            let outcome = self
                .store
                .update(
                    index_names::SENTENCE,
                    hit.id,
                    json!({
                        "cluster_id": to_cluster_id,
                        "topic_id": to_topic_id,
                    }),
                )
                .await?;
            ack_updated(outcome, "sentence", hit.id)?;
        }
        Ok(moved)
    }

    /// Point a topic's sentences at a new cluster, keeping their topic.
    async fn repoint_sentence_cluster(&self, topic_id: Uuid, to_cluster_id: Uuid) -> EngineResult<()> {
        let hits = self
            .store
            .query(
                index_names::SENTENCE,
                &QueryFilter::new().term("topic_id", topic_id.to_string()),
            )
            .await?;
        for hit in hits {
            let outcome = self
                .store
                .update(
                    index_names::SENTENCE,
                    hit.id,
                    json!({ "cluster_id": to_cluster_id }),
                )
                .await?;
            ack_updated(outcome, "sentence", hit.id)?;
        }
        Ok(())
    }

    async fn shift_sentence_count(&self, cluster_id: Uuid, delta: i64) -> EngineResult<()> {
        let cluster = self.get_cluster(cluster_id).await?;
        let count = (cluster.sentence_count as i64 + delta).max(0) as usize;
        let outcome = self
            .store
            .update(
                index_names::CLUSTER,
                cluster_id,
                json!({ "sentence_count": count }),
            )
            .await?;
        ack_updated(outcome, "cluster", cluster_id)?;

        self.patch_cluster_ref(cluster.experiment_id, cluster_id, |cluster_ref| {
            cluster_ref.sentence_count = count;
        })
        .await
    }

    /// Apply a mutation to the embedded cluster reference on the experiment
    /// document. Missing references are tolerated (experiment finalization
    /// may not have run yet).
    async fn patch_cluster_ref(
        &self,
        experiment_id: Uuid,
        cluster_id: Uuid,
        mutate: impl FnOnce(&mut ClusterRef),
    ) -> EngineResult<()> {
        let mut experiment = self.get_experiment(experiment_id).await?;
        let cluster_ref = experiment
            .clusters_pos
            .iter_mut()
            .chain(experiment.clusters_con.iter_mut())
            .find(|r| r.cluster_id == cluster_id);

        if let Some(cluster_ref) = cluster_ref {
            mutate(cluster_ref);
            self.update_experiment(&experiment).await?;
        }
        Ok(())
    }

    async fn remove_cluster_ref(&self, experiment_id: Uuid, cluster_id: Uuid) -> EngineResult<()> {
        let mut experiment = self.get_experiment(experiment_id).await?;
        let before = experiment.clusters_pos.len() + experiment.clusters_con.len();
        experiment.clusters_pos.retain(|r| r.cluster_id != cluster_id);
        experiment.clusters_con.retain(|r| r.cluster_id != cluster_id);

        if experiment.clusters_pos.len() + experiment.clusters_con.len() != before {
            self.update_experiment(&experiment).await?;
        }
        Ok(())
    }
}

// ----------------------------------------------------------------------
// Acknowledgment and decode helpers
// ----------------------------------------------------------------------

fn ack_created(receipt: WriteReceipt, index: &str) -> EngineResult<Uuid> {
    match receipt.outcome {
        WriteOutcome::Created => Ok(receipt.id),
        other => Err(EngineError::persistence(format!(
            "insert into '{index}' not acknowledged as created: {other:?}"
        ))),
    }
}

fn ack_updated(outcome: WriteOutcome, entity: &'static str, id: Uuid) -> EngineResult<()> {
    match outcome {
        WriteOutcome::Updated => Ok(()),
        WriteOutcome::NotFound => Err(EngineError::not_found(entity, id)),
        WriteOutcome::Created => Err(EngineError::persistence(format!(
            "{entity} {id} write unexpectedly acknowledged as created"
        ))),
    }
}

fn decode_experiment(doc: StoredDocument) -> EngineResult<Experiment> {
    inject_id(doc, |experiment: &mut Experiment, id| experiment.id = id)
}

fn decode_cluster(doc: StoredDocument) -> EngineResult<Cluster> {
    inject_id(doc, |cluster: &mut Cluster, id| cluster.id = id)
}

fn decode_topic(doc: StoredDocument) -> EngineResult<Topic> {
    inject_id(doc, |topic: &mut Topic, id| topic.id = id)
}

fn decode_sentence(doc: StoredDocument) -> EngineResult<Sentence> {
    inject_id(doc, |sentence: &mut Sentence, id| sentence.id = id)
}

fn decode_review(doc: StoredDocument) -> EngineResult<Review> {
    inject_id(doc, |review: &mut Review, id| review.id = id)
}

/// Deserialize a document body and stamp the store-assigned id back on.
fn inject_id<T, F>(doc: StoredDocument, set_id: F) -> EngineResult<T>
where
    T: serde::de::DeserializeOwned,
    F: FnOnce(&mut T, Uuid),
{
    let mut entity: T = serde_json::from_value::<T>(doc.source)?;
    set_id(&mut entity, doc.id);
    Ok(entity)
}
