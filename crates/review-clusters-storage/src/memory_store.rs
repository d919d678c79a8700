//! In-memory document store with refresh-gated query visibility.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use tracing::trace;
use uuid::Uuid;

use review_clusters_core::error::{EngineError, EngineResult};
use review_clusters_core::traits::{
    DocumentStore, QueryFilter, StoredDocument, WriteOutcome, WriteReceipt,
};

#[derive(Debug, Default)]
struct IndexState {
    docs: HashMap<Uuid, Value>,
    /// Ids visible to queries. Inserts join this set only on refresh;
    /// updates to already-visible docs are visible immediately (visibility
    /// is presence-level, not version-level).
    visible: HashSet<Uuid>,
}

/// Keyed-document store held entirely in process memory.
///
/// Models the consistency contract of the production document store: point
/// reads by id are realtime, queries only see documents whose index has been
/// refreshed since their insertion. Deletes take effect immediately for both.
///
/// # Example
///
/// ```
/// use review_clusters_core::traits::{DocumentStore, QueryFilter};
/// use review_clusters_storage::MemoryDocumentStore;
/// use serde_json::json;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let store = MemoryDocumentStore::new();
/// let receipt = store.index("experiment", json!({"category": "phones"})).await.unwrap();
///
/// // Realtime by id, invisible to queries until refresh.
/// assert!(store.get("experiment", receipt.id).await.unwrap().is_some());
/// assert!(store.query("experiment", &QueryFilter::new()).await.unwrap().is_empty());
///
/// store.refresh("experiment").await.unwrap();
/// assert_eq!(store.query("experiment", &QueryFilter::new()).await.unwrap().len(), 1);
/// # });
/// ```
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    indices: RwLock<HashMap<String, IndexState>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total document count in one index, refreshed or not. Test helper.
    pub fn len(&self, index: &str) -> usize {
        self.indices
            .read()
            .get(index)
            .map(|state| state.docs.len())
            .unwrap_or(0)
    }

    /// Whether an index holds no documents at all.
    pub fn is_empty(&self, index: &str) -> bool {
        self.len(index) == 0
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, index: &str, id: Uuid) -> EngineResult<Option<Value>> {
        Ok(self
            .indices
            .read()
            .get(index)
            .and_then(|state| state.docs.get(&id))
            .cloned())
    }

    async fn query(&self, index: &str, filter: &QueryFilter) -> EngineResult<Vec<StoredDocument>> {
        let indices = self.indices.read();
        let Some(state) = indices.get(index) else {
            return Ok(Vec::new());
        };

        let mut hits: Vec<StoredDocument> = state
            .visible
            .iter()
            .filter_map(|id| state.docs.get(id).map(|doc| (id, doc)))
            .filter(|(_, doc)| filter.matches(doc))
            .map(|(&id, doc)| StoredDocument {
                id,
                source: doc.clone(),
            })
            .collect();

        // HashSet iteration order is arbitrary; keep results stable.
        hits.sort_by_key(|hit| hit.id);
        trace!(index, terms = filter.terms().len(), hits = hits.len(), "query executed");
        Ok(hits)
    }

    async fn index(&self, index: &str, doc: Value) -> EngineResult<WriteReceipt> {
        if !doc.is_object() {
            return Err(EngineError::persistence(format!(
                "index '{index}' rejected non-object document"
            )));
        }

        let id = Uuid::new_v4();
        let mut indices = self.indices.write();
        indices.entry(index.to_string()).or_default().docs.insert(id, doc);

        trace!(index, %id, "document indexed");
        Ok(WriteReceipt {
            id,
            outcome: WriteOutcome::Created,
        })
    }

    async fn update(&self, index: &str, id: Uuid, patch: Value) -> EngineResult<WriteOutcome> {
        let mut indices = self.indices.write();
        let Some(doc) = indices
            .get_mut(index)
            .and_then(|state| state.docs.get_mut(&id))
        else {
            return Ok(WriteOutcome::NotFound);
        };

        match (doc.as_object_mut(), patch.as_object()) {
            (Some(target), Some(fields)) => {
                for (key, value) in fields {
                    target.insert(key.clone(), value.clone());
                }
            }
            _ => {
                return Err(EngineError::persistence(format!(
                    "index '{index}' rejected non-object patch for {id}"
                )));
            }
        }

        trace!(index, %id, "document updated");
        Ok(WriteOutcome::Updated)
    }

    async fn delete(&self, index: &str, id: Uuid) -> EngineResult<WriteOutcome> {
        let mut indices = self.indices.write();
        let Some(state) = indices.get_mut(index) else {
            return Ok(WriteOutcome::NotFound);
        };

        if state.docs.remove(&id).is_none() {
            return Ok(WriteOutcome::NotFound);
        }
        state.visible.remove(&id);

        trace!(index, %id, "document deleted");
        Ok(WriteOutcome::Updated)
    }

    async fn refresh(&self, index: &str) -> EngineResult<()> {
        let mut indices = self.indices.write();
        if let Some(state) = indices.get_mut(index) {
            state.visible = state.docs.keys().copied().collect();
        }
        trace!(index, "index refreshed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_get_is_realtime_query_waits_for_refresh() {
        let store = MemoryDocumentStore::new();
        let receipt = store
            .index("experiment", json!({"category": "phones"}))
            .await
            .unwrap();
        assert_eq!(receipt.outcome, WriteOutcome::Created);

        assert!(store.get("experiment", receipt.id).await.unwrap().is_some());
        assert!(store
            .query("experiment", &QueryFilter::new())
            .await
            .unwrap()
            .is_empty());

        store.refresh("experiment").await.unwrap();
        let hits = store.query("experiment", &QueryFilter::new()).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, receipt.id);

        println!("[PASS] test_get_is_realtime_query_waits_for_refresh");
    }

    #[tokio::test]
    async fn test_query_filters_on_fields() {
        let store = MemoryDocumentStore::new();
        store
            .index("experiment", json!({"category": "phones"}))
            .await
            .unwrap();
        store
            .index("experiment", json!({"category": "laptops"}))
            .await
            .unwrap();
        store.refresh("experiment").await.unwrap();

        let hits = store
            .query("experiment", &QueryFilter::new().term("category", "phones"))
            .await
            .unwrap();

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].source["category"], "phones");
    }

    #[tokio::test]
    async fn test_update_merges_and_is_visible_without_refresh() {
        let store = MemoryDocumentStore::new();
        let receipt = store
            .index("experiment_cluster", json!({"name": "cluster_0", "sentence_count": 4}))
            .await
            .unwrap();
        store.refresh("experiment_cluster").await.unwrap();

        let outcome = store
            .update("experiment_cluster", receipt.id, json!({"name": "battery"}))
            .await
            .unwrap();
        assert_eq!(outcome, WriteOutcome::Updated);

        // Merged in place: untouched fields survive, queries see the new value.
        let hits = store
            .query("experiment_cluster", &QueryFilter::new().term("name", "battery"))
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].source["sentence_count"], 4);

        println!("[PASS] test_update_merges_and_is_visible_without_refresh");
    }

    #[tokio::test]
    async fn test_update_missing_doc_reports_not_found() {
        let store = MemoryDocumentStore::new();
        let outcome = store
            .update("experiment", Uuid::new_v4(), json!({"a": 1}))
            .await
            .unwrap();
        assert_eq!(outcome, WriteOutcome::NotFound);
    }

    #[tokio::test]
    async fn test_delete_takes_effect_immediately() {
        let store = MemoryDocumentStore::new();
        let receipt = store
            .index("experiment_topic", json!({"name": "battery"}))
            .await
            .unwrap();
        store.refresh("experiment_topic").await.unwrap();

        let outcome = store.delete("experiment_topic", receipt.id).await.unwrap();
        assert_eq!(outcome, WriteOutcome::Updated);

        assert!(store.get("experiment_topic", receipt.id).await.unwrap().is_none());
        assert!(store
            .query("experiment_topic", &QueryFilter::new())
            .await
            .unwrap()
            .is_empty());

        let again = store.delete("experiment_topic", receipt.id).await.unwrap();
        assert_eq!(again, WriteOutcome::NotFound);
    }

    #[tokio::test]
    async fn test_non_object_document_rejected() {
        let store = MemoryDocumentStore::new();
        let err = store.index("experiment", json!(42)).await.unwrap_err();
        assert_eq!(err.kind(), "persistence_error");
    }

    #[tokio::test]
    async fn test_refresh_unknown_index_is_noop() {
        let store = MemoryDocumentStore::new();
        store.refresh("nope").await.unwrap();
        assert!(store.is_empty("nope"));
    }
}
