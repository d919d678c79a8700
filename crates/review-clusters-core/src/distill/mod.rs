//! Per-cluster topic distillation and salient-term selection.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::debug;
use uuid::Uuid;

use crate::traits::{TopicModel, TopicTerms};

/// Salient terms kept per polarity.
const SALIENT_TERM_LIMIT: usize = 10;

/// Terms joined into one topic name.
const TERMS_PER_TOPIC_NAME: usize = 3;

/// Sentences currently assigned to one cluster label during a pipeline run.
#[derive(Debug, Clone, Default)]
pub struct ClusterBucket {
    /// Persisted cluster id this bucket maps to.
    pub cluster_id: Uuid,
    /// Lemma documents, one per sentence.
    pub lemma_docs: Vec<Vec<String>>,
    /// Noun lemmas across the bucket's sentences (with repetition).
    pub noun_lemmas: Vec<String>,
}

/// Output of one distillation pass over a polarity's cluster buckets.
#[derive(Debug, Clone)]
pub struct DistilledTopics {
    /// Deduplicated topic names per cluster label.
    pub per_cluster: BTreeMap<usize, Vec<String>>,
    /// Nouns judged representative across all buckets of the polarity.
    pub salient_terms: BTreeSet<String>,
}

/// Runs the topic model per cluster bucket and names the results.
///
/// Degenerate buckets (fewer than two sentences, or a fit that produces no
/// usable terms) yield the single default name `topic_0` instead of failing.
pub struct TopicDistiller<'a> {
    model: &'a dyn TopicModel,
}

impl<'a> TopicDistiller<'a> {
    /// Create a distiller over a shared topic model.
    pub fn new(model: &'a dyn TopicModel) -> Self {
        Self { model }
    }

    /// Distill topics for every bucket of one polarity.
    ///
    /// Topic names within a cluster are unique on return: duplicates are
    /// suffixed with their ordinal and the result written back into the list.
    pub fn distill(
        &self,
        buckets: &BTreeMap<usize, ClusterBucket>,
        topics_per_cluster: usize,
    ) -> DistilledTopics {
        let mut per_cluster = BTreeMap::new();

        for (&label, bucket) in buckets {
            let mut names = if bucket.lemma_docs.len() < 2 {
                // Too few sentences for a meaningful fit.
                vec!["topic_0".to_string()]
            } else {
                let topics = self.model.fit(&bucket.lemma_docs, topics_per_cluster);
                if topics.is_empty() {
                    vec!["topic_0".to_string()]
                } else {
                    topics
                        .iter()
                        .enumerate()
                        .map(|(i, t)| topic_name(i, t))
                        .collect()
                }
            };

            dedup_topic_names(&mut names);
            debug!(cluster = label, topics = names.len(), "distilled cluster topics");
            per_cluster.insert(label, names);
        }

        DistilledTopics {
            per_cluster,
            salient_terms: select_salient_terms(buckets.values()),
        }
    }
}

/// Name a topic from its highest-salience terms, or fall back to a synthetic
/// `topic_<n>` when the fit produced none.
fn topic_name(index: usize, topic: &TopicTerms) -> String {
    if topic.terms.is_empty() {
        format!("topic_{index}")
    } else {
        topic.terms[..topic.terms.len().min(TERMS_PER_TOPIC_NAME)].join(" ")
    }
}

/// Disambiguate duplicate names in place by suffixing the list index.
///
/// Topic names are unique per cluster; the deduplicated name is written back
/// into the list so the persisted documents carry the suffixed form.
pub fn dedup_topic_names(names: &mut [String]) {
    let mut seen: BTreeSet<String> = BTreeSet::new();
    for (i, name) in names.iter_mut().enumerate() {
        if !seen.insert(name.clone()) {
            *name = format!("{name}_{i}");
            seen.insert(name.clone());
        }
    }
}

/// Pick the most frequent noun lemmas across all buckets of one polarity.
///
/// Frequency-ranked, ties broken alphabetically for determinism.
fn select_salient_terms<'b>(buckets: impl Iterator<Item = &'b ClusterBucket>) -> BTreeSet<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for bucket in buckets {
        for noun in &bucket.noun_lemmas {
            *counts.entry(noun.as_str()).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));

    ranked
        .into_iter()
        .take(SALIENT_TERM_LIMIT)
        .map(|(term, _)| term.to_string())
        .collect()
}
