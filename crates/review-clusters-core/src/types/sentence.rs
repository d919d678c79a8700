//! Sentence entities: in-memory drafts and persisted documents.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Polarity;

/// An extracted sentence before it has been clustered or persisted.
///
/// Drafts carry tagging byproducts (noun lemmas) that the distiller consumes
/// but that are not part of the persisted sentence document.
#[derive(Debug, Clone)]
pub struct SentenceDraft {
    /// Source review.
    pub review_id: Uuid,
    /// Original sentence text.
    pub text: String,
    /// Ordered lemma sequence of the sentence tokens.
    pub lemmas: Vec<String>,
    /// Lemmas of noun tokens only, for salient-term selection.
    pub noun_lemmas: Vec<String>,
    /// Index within the source pros/cons list.
    pub position_in_review: usize,
    /// Which side of the review the sentence came from.
    pub polarity: Polarity,
    /// Product metadata carried for later filtering and display.
    pub product_name: String,
    /// Category metadata carried for later filtering and display.
    pub category_name: String,
}

/// A persisted sentence, owned by exactly one cluster and one topic.
///
/// Membership is mutable: transfer and merge operations reassign
/// `cluster_id`/`topic_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sentence {
    /// Store-assigned document id, injected after retrieval.
    #[serde(skip)]
    pub id: Uuid,
    pub review_id: Uuid,
    pub experiment_id: Uuid,
    pub cluster_id: Uuid,
    pub topic_id: Uuid,
    pub polarity: Polarity,
    /// Original sentence text.
    pub text: String,
    /// Ordered lemma sequence of the sentence tokens.
    pub lemma_sequence: Vec<String>,
    /// Index within the source pros/cons list.
    pub position_in_review: usize,
    pub product_name: String,
    pub category_name: String,
}

impl Sentence {
    /// Stamp a draft with its final experiment/cluster/topic membership.
    pub fn from_draft(
        draft: &SentenceDraft,
        experiment_id: Uuid,
        cluster_id: Uuid,
        topic_id: Uuid,
    ) -> Self {
        Self {
            id: Uuid::nil(),
            review_id: draft.review_id,
            experiment_id,
            cluster_id,
            topic_id,
            polarity: draft.polarity,
            text: draft.text.clone(),
            lemma_sequence: draft.lemmas.clone(),
            position_in_review: draft.position_in_review,
            product_name: draft.product_name.clone(),
            category_name: draft.category_name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> SentenceDraft {
        SentenceDraft {
            review_id: Uuid::new_v4(),
            text: "Battery lasts long".into(),
            lemmas: vec!["battery".into(), "last".into(), "long".into()],
            noun_lemmas: vec!["battery".into()],
            position_in_review: 0,
            polarity: Polarity::Pos,
            product_name: "Phone X".into(),
            category_name: "phones".into(),
        }
    }

    #[test]
    fn test_from_draft_stamps_membership() {
        let experiment_id = Uuid::new_v4();
        let cluster_id = Uuid::new_v4();
        let topic_id = Uuid::new_v4();

        let sentence = Sentence::from_draft(&draft(), experiment_id, cluster_id, topic_id);

        assert_eq!(sentence.experiment_id, experiment_id);
        assert_eq!(sentence.cluster_id, cluster_id);
        assert_eq!(sentence.topic_id, topic_id);
        assert_eq!(sentence.lemma_sequence, vec!["battery", "last", "long"]);
        assert_eq!(sentence.polarity, Polarity::Pos);
    }

    #[test]
    fn test_sentence_document_shape() {
        let sentence = Sentence::from_draft(&draft(), Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let json = serde_json::to_value(&sentence).unwrap();

        assert!(json.get("id").is_none());
        assert_eq!(json["polarity"], "pos");
        assert_eq!(json["position_in_review"], 0);
    }
}
