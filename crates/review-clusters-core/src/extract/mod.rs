//! Sentence extraction from raw reviews.
//!
//! Turns a review's pros/cons lists into normalized, tagged sentence drafts.
//! Pure transformation with no side effects; per-sentence tagging failures
//! drop only that sentence.

use tracing::{debug, warn};

use crate::traits::Tagger;
use crate::types::{Polarity, Review, SentenceDraft};

/// Extracts tagged sentence drafts from reviews.
///
/// Filter policy, per sentence:
/// - tagging yields no segment: skip
/// - tagging yields more than one segment (compound/multi-sentence string):
///   skip — single-sentence assumption, a deliberate simplification
/// - the single segment has fewer than two tokens: skip (too short to
///   cluster meaningfully)
///
/// # Example
///
/// ```
/// use review_clusters_core::extract::SentenceExtractor;
/// use review_clusters_core::stubs::WhitespaceTagger;
/// use review_clusters_core::types::{Polarity, Review};
/// use uuid::Uuid;
///
/// let tagger = WhitespaceTagger::new();
/// let extractor = SentenceExtractor::new(&tagger);
/// let review = Review {
///     id: Uuid::new_v4(),
///     product_name: "Phone X".into(),
///     category: "phones".into(),
///     pros: vec!["Battery lasts long".into(), "Good".into()],
///     cons: vec![],
/// };
///
/// let drafts = extractor.extract(&review, Polarity::Pos);
/// assert_eq!(drafts.len(), 1); // single-token "Good" is dropped
/// ```
pub struct SentenceExtractor<'a> {
    tagger: &'a dyn Tagger,
}

impl<'a> SentenceExtractor<'a> {
    /// Create an extractor over a shared tagger.
    pub fn new(tagger: &'a dyn Tagger) -> Self {
        Self { tagger }
    }

    /// Extract drafts for one polarity of one review.
    ///
    /// Emitted drafts preserve the order of the source list; their
    /// `position_in_review` is the index in that list, so gaps mark dropped
    /// sentences.
    pub fn extract(&self, review: &Review, polarity: Polarity) -> Vec<SentenceDraft> {
        let mut drafts = Vec::new();

        for (index, raw) in review.side(polarity).iter().enumerate() {
            let segments = match self.tagger.pos_tag(raw) {
                Ok(segments) => segments,
                Err(err) => {
                    warn!(
                        review_id = %review.id,
                        position = index,
                        error = %err,
                        "tagging failed, dropping sentence"
                    );
                    continue;
                }
            };

            if segments.is_empty() {
                continue;
            }
            if segments.len() > 1 {
                // Compound string; out of scope for the single-sentence model.
                debug!(review_id = %review.id, position = index, "multi-segment sentence dropped");
                continue;
            }

            let tokens = &segments[0];
            if tokens.len() < 2 {
                continue;
            }

            drafts.push(SentenceDraft {
                review_id: review.id,
                text: raw.clone(),
                lemmas: tokens.iter().map(|t| t.lemma.clone()).collect(),
                noun_lemmas: tokens
                    .iter()
                    .filter(|t| t.is_noun())
                    .map(|t| t.lemma.clone())
                    .collect(),
                position_in_review: index,
                polarity,
                product_name: review.product_name.clone(),
                category_name: review.category.clone(),
            });
        }

        drafts
    }
}
