//! Term-frequency topic model stub.

use std::collections::HashMap;

use crate::traits::{TopicModel, TopicTerms};

/// Topic model that ranks terms by corpus frequency and deals them
/// round-robin across the requested topics.
///
/// Term one of topic one is the most frequent term overall, term one of topic
/// two the second most frequent, and so on. Ties break alphabetically, so the
/// fit is fully deterministic. Topics that receive no terms are dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct FrequencyTopicModel;

impl TopicModel for FrequencyTopicModel {
    fn fit(&self, docs: &[Vec<String>], topic_count: usize) -> Vec<TopicTerms> {
        if docs.is_empty() || topic_count == 0 {
            return Vec::new();
        }

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for doc in docs {
            for term in doc {
                *counts.entry(term.as_str()).or_insert(0) += 1;
            }
        }

        let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));

        let mut topics = vec![TopicTerms { terms: Vec::new() }; topic_count];
        for (i, (term, _)) in ranked.into_iter().enumerate() {
            topics[i % topic_count].terms.push(term.to_string());
        }

        topics.retain(|t| !t.terms.is_empty());
        topics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_most_frequent_term_leads_first_topic() {
        let docs = vec![
            doc(&["battery", "last", "long"]),
            doc(&["battery", "life", "good"]),
            doc(&["battery", "charge"]),
        ];

        let topics = FrequencyTopicModel.fit(&docs, 2);

        assert_eq!(topics.len(), 2);
        assert_eq!(topics[0].terms[0], "battery");

        println!("[PASS] test_most_frequent_term_leads_first_topic - {:?}", topics[0].terms);
    }

    #[test]
    fn test_fewer_terms_than_topics_drops_empty_topics() {
        let docs = vec![doc(&["battery"]), doc(&["battery"])];
        let topics = FrequencyTopicModel.fit(&docs, 4);

        assert_eq!(topics.len(), 1);
        assert_eq!(topics[0].terms, vec!["battery"]);
    }

    #[test]
    fn test_fit_is_deterministic() {
        let docs = vec![doc(&["a", "b"]), doc(&["b", "c"]), doc(&["c", "a"])];

        let first = FrequencyTopicModel.fit(&docs, 3);
        let second = FrequencyTopicModel.fit(&docs, 3);

        let render = |topics: &[TopicTerms]| {
            topics
                .iter()
                .map(|t| t.terms.join(" "))
                .collect::<Vec<_>>()
        };
        assert_eq!(render(&first), render(&second));
    }

    #[test]
    fn test_empty_corpus_yields_no_topics() {
        assert!(FrequencyTopicModel.fit(&[], 3).is_empty());
        assert!(FrequencyTopicModel.fit(&[doc(&["a"])], 0).is_empty());
    }
}
