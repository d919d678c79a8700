//! Raw product review as stored in the document store.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Polarity;

/// A scraped product review with pros/cons sentence lists.
///
/// Reviews are produced by an external scraping subsystem; the engine only
/// reads them. The `id` is store-assigned and not part of the document body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    /// Store-assigned document id, injected after retrieval.
    #[serde(skip)]
    pub id: Uuid,
    /// Product the review belongs to.
    pub product_name: String,
    /// Category (or shop) the product was scraped under.
    pub category: String,
    /// Positive sentences, one raw string per list item.
    pub pros: Vec<String>,
    /// Negative sentences, one raw string per list item.
    pub cons: Vec<String>,
}

impl Review {
    /// The raw sentence list for one polarity.
    pub fn side(&self, polarity: Polarity) -> &[String] {
        match polarity {
            Polarity::Pos => &self.pros,
            Polarity::Con => &self.cons,
        }
    }
}
