//! Keyed-document store abstraction.
//!
//! The engine treats the store as an opaque, eventually-consistent document
//! repository: read-your-writes is NOT automatic, and callers must issue
//! [`DocumentStore::refresh`] after a batch of writes before any query that
//! depends on them. Point reads by id are realtime.

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::error::EngineResult;

/// Outcome of a single-document write.
///
/// Any store response outside these three is surfaced as
/// [`EngineError::PersistenceError`](crate::error::EngineError).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// A new document was created.
    Created,
    /// An existing document was updated in place.
    Updated,
    /// The addressed document does not exist.
    NotFound,
}

/// Receipt for an insert, carrying the store-assigned id.
#[derive(Debug, Clone)]
pub struct WriteReceipt {
    /// Store-assigned document id.
    pub id: Uuid,
    /// Write outcome; inserts are expected to report `Created`.
    pub outcome: WriteOutcome,
}

/// A document returned from a query, with its store id alongside the body.
#[derive(Debug, Clone)]
pub struct StoredDocument {
    pub id: Uuid,
    pub source: Value,
}

/// Exact-match filter over top-level document fields.
///
/// # Example
///
/// ```
/// use review_clusters_core::traits::QueryFilter;
/// use serde_json::json;
///
/// let filter = QueryFilter::new()
///     .term("category", "phones")
///     .term("polarity", "pos");
///
/// assert!(filter.matches(&json!({"category": "phones", "polarity": "pos", "n": 1})));
/// assert!(!filter.matches(&json!({"category": "phones", "polarity": "con"})));
/// ```
#[derive(Debug, Clone, Default)]
pub struct QueryFilter {
    terms: Vec<(String, Value)>,
}

impl QueryFilter {
    /// An empty filter matching every document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `field == value`.
    #[must_use]
    pub fn term(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.terms.push((field.into(), value.into()));
        self
    }

    /// The required (field, value) pairs.
    pub fn terms(&self) -> &[(String, Value)] {
        &self.terms
    }

    /// Whether a document body satisfies every term.
    pub fn matches(&self, doc: &Value) -> bool {
        self.terms
            .iter()
            .all(|(field, value)| doc.get(field) == Some(value))
    }
}

/// Keyed-document repository contract.
///
/// All results distinguish created/updated/not-found; consistency between
/// writes and subsequent queries is only guaranteed after `refresh`.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch one document by id. Realtime (sees unrefreshed writes).
    async fn get(&self, index: &str, id: Uuid) -> EngineResult<Option<Value>>;

    /// Query documents matching the filter. Only sees refreshed writes.
    async fn query(&self, index: &str, filter: &QueryFilter) -> EngineResult<Vec<StoredDocument>>;

    /// Insert a new document, returning the store-assigned id.
    async fn index(&self, index: &str, doc: Value) -> EngineResult<WriteReceipt>;

    /// Shallow-merge `patch` into an existing document.
    async fn update(&self, index: &str, id: Uuid, patch: Value) -> EngineResult<WriteOutcome>;

    /// Delete one document by id.
    async fn delete(&self, index: &str, id: Uuid) -> EngineResult<WriteOutcome>;

    /// Make all writes to `index` visible to subsequent queries.
    async fn refresh(&self, index: &str) -> EngineResult<()>;
}
