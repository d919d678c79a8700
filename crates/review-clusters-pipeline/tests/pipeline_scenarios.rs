//! End-to-end pipeline scenarios against the in-memory document store.

use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use review_clusters_core::types::Review;
use review_clusters_pipeline::{ClusterPipelineOrchestrator, PipelineContext, RunConfig};
use review_clusters_storage::MemoryDocumentStore;

fn review(product: &str, category: &str, pros: &[&str], cons: &[&str]) -> Review {
    Review {
        id: Uuid::nil(),
        product_name: product.to_string(),
        category: category.to_string(),
        pros: pros.iter().map(|s| s.to_string()).collect(),
        cons: cons.iter().map(|s| s.to_string()).collect(),
    }
}

fn run_config(category: &str, clusters: usize, topics: usize) -> RunConfig {
    RunConfig {
        category: category.to_string(),
        embedding_method: "sent2vec_vec".to_string(),
        cluster_method: "kmeans".to_string(),
        embedding_model: "stub-hash".to_string(),
        topics_per_cluster: topics,
        clusters_pos_count: clusters,
        clusters_con_count: clusters,
    }
}

async fn orchestrator_with_reviews(reviews: Vec<Review>) -> ClusterPipelineOrchestrator {
    let store = Arc::new(MemoryDocumentStore::new());
    let orchestrator = ClusterPipelineOrchestrator::new(store, PipelineContext::stub(42));
    for review in &reviews {
        orchestrator.repository().save_review(review).await.unwrap();
    }
    orchestrator
}

/// Two reviews, each with one valid pro sentence and one single-token pro
/// ("Good"): exactly 2 drafts survive extraction, one cluster holds both,
/// and even 2 sentences yield a topic per cluster.
#[tokio::test]
async fn test_two_review_single_cluster_scenario() {
    let orchestrator = orchestrator_with_reviews(vec![
        review("Phone A", "phones", &["Battery lasts long", "Good"], &["Camera is blurry"]),
        review("Phone B", "phones", &["Battery life great", "Good"], &["Camera photos bad"]),
    ])
    .await;

    let summary = orchestrator.run(&run_config("phones", 1, 1)).await.unwrap();

    assert_eq!(summary.pos_sentences, 2, "single-token pros dropped");
    assert_eq!(summary.con_sentences, 2);
    assert_eq!(summary.pos_clusters, 1);
    assert_eq!(summary.con_clusters, 1);
    assert_eq!(summary.topics_created, 2);

    let experiments = orchestrator.list_experiments().await.unwrap();
    assert_eq!(experiments.len(), 1);
    let experiment = &experiments[0];
    assert_eq!(experiment.id, summary.experiment_id);
    assert_eq!(experiment.clusters_pos.len(), 1);
    assert_eq!(experiment.clusters_pos[0].sentence_count, 2);
    assert_eq!(experiment.clusters_pos[0].name, "cluster_0");
    assert!(experiment.salient_terms_pos.contains("battery"));

    let sentences = orchestrator.stored_sentences("phones").await.unwrap();
    assert_eq!(sentences.len(), 4);
    for sentence in &sentences {
        assert_eq!(sentence.experiment_id, summary.experiment_id);
        assert_ne!(sentence.cluster_id, Uuid::nil());
        assert_ne!(sentence.topic_id, Uuid::nil());
    }

    println!("[PASS] test_two_review_single_cluster_scenario - {:?}", summary);
}

#[tokio::test]
async fn test_peek_sentences_dry_run_persists_nothing() {
    let store = Arc::new(MemoryDocumentStore::new());
    let orchestrator =
        ClusterPipelineOrchestrator::new(store.clone(), PipelineContext::stub(42));
    orchestrator
        .repository()
        .save_review(&review(
            "Phone A",
            "phones",
            &["Battery lasts long", "Good"],
            &["Camera is blurry"],
        ))
        .await
        .unwrap();

    let peek = orchestrator.peek_sentences("phones").await.unwrap();
    assert_eq!(peek.category, "phones");
    assert_eq!(peek.pos_sentences, 1, "single-token pro dropped");
    assert_eq!(peek.con_sentences, 1);

    // Only the seeded review exists; the dry-run wrote nothing.
    assert_eq!(store.len(review_clusters_storage::index_names::REVIEW), 1);
    for index in [
        review_clusters_storage::index_names::EXPERIMENT,
        review_clusters_storage::index_names::CLUSTER,
        review_clusters_storage::index_names::TOPIC,
        review_clusters_storage::index_names::SENTENCE,
    ] {
        assert!(store.is_empty(index), "dry-run persisted into '{index}'");
    }

    // The product-name fallback applies to peeks too.
    let peek = orchestrator.peek_sentences("Phone A").await.unwrap();
    assert_eq!(peek.pos_sentences, 1);

    println!("[PASS] test_peek_sentences_dry_run_persists_nothing");
}

#[tokio::test]
async fn test_second_run_for_same_category_is_duplicate() {
    let orchestrator = orchestrator_with_reviews(vec![review(
        "Phone A",
        "phones",
        &["Battery lasts long", "Screen is bright"],
        &["Camera is blurry"],
    )])
    .await;

    orchestrator.run(&run_config("phones", 1, 1)).await.unwrap();

    let err = orchestrator.run(&run_config("phones", 1, 1)).await.unwrap_err();
    assert_eq!(err.kind(), "duplicate_experiment");
    assert_eq!(orchestrator.list_experiments().await.unwrap().len(), 1);

    println!("[PASS] test_second_run_for_same_category_is_duplicate");
}

#[tokio::test]
async fn test_unknown_method_fails_before_any_write() {
    let orchestrator = orchestrator_with_reviews(vec![review(
        "Phone A",
        "phones",
        &["Battery lasts long"],
        &[],
    )])
    .await;

    let mut config = run_config("phones", 1, 1);
    config.embedding_method = "word2vec".to_string();

    let err = orchestrator.run(&config).await.unwrap_err();
    assert_eq!(err.kind(), "invalid_config");
    assert!(orchestrator.list_experiments().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_category_falls_back_to_product_name() {
    let orchestrator = orchestrator_with_reviews(vec![review(
        "AcmePhone",
        "phones",
        &["Battery lasts long", "Screen is bright"],
        &["Camera is blurry", "Speaker sounds tinny"],
    )])
    .await;

    // "AcmePhone" is a product name, not a category.
    let summary = orchestrator.run(&run_config("AcmePhone", 1, 1)).await.unwrap();
    assert_eq!(summary.pos_sentences, 2);
    assert_eq!(summary.category, "AcmePhone");

    println!("[PASS] test_category_falls_back_to_product_name");
}

#[tokio::test]
async fn test_merge_topic_moves_sentences_between_clusters() {
    let orchestrator = orchestrator_with_reviews(vec![
        review("Phone A", "phones", &["Battery lasts long", "Battery drains overnight"], &[]),
        review("Phone B", "phones", &["Camera takes sharp photos", "Camera focus works fast"], &[]),
    ])
    .await;

    let summary = orchestrator.run(&run_config("phones", 2, 1)).await.unwrap();
    assert_eq!(summary.pos_clusters, 2);

    let sentences = orchestrator.stored_sentences("phones").await.unwrap();
    let mut by_topic: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    let mut topic_cluster: HashMap<Uuid, Uuid> = HashMap::new();
    for sentence in &sentences {
        by_topic.entry(sentence.topic_id).or_default().push(sentence.id);
        topic_cluster.insert(sentence.topic_id, sentence.cluster_id);
    }
    assert_eq!(by_topic.len(), 2);

    let mut topics: Vec<Uuid> = by_topic.keys().copied().collect();
    topics.sort();
    let (from_topic, to_topic) = (topics[0], topics[1]);
    let to_cluster = topic_cluster[&to_topic];

    orchestrator.merge_topic(from_topic, to_cluster, 0, to_topic).await.unwrap();

    let sentences = orchestrator.stored_sentences("phones").await.unwrap();
    for sentence in &sentences {
        assert_eq!(sentence.topic_id, to_topic);
        assert_eq!(sentence.cluster_id, to_cluster);
    }

    println!("[PASS] test_merge_topic_moves_sentences_between_clusters");
}

#[tokio::test]
async fn test_merge_cluster_second_call_is_not_found() {
    let orchestrator = orchestrator_with_reviews(vec![
        review("Phone A", "phones", &["Battery lasts long", "Battery drains overnight"], &[]),
        review("Phone B", "phones", &["Camera takes sharp photos", "Camera focus works fast"], &[]),
    ])
    .await;

    let summary = orchestrator.run(&run_config("phones", 2, 1)).await.unwrap();

    let experiment = &orchestrator.list_experiments().await.unwrap()[0];
    let from = experiment.clusters_pos[0].cluster_id;
    let to = experiment.clusters_pos[1].cluster_id;

    orchestrator.merge_cluster(from, to, &HashMap::new()).await.unwrap();

    let sentences = orchestrator.stored_sentences("phones").await.unwrap();
    assert!(sentences.iter().all(|s| s.cluster_id == to));

    // Replay: source cluster is gone, target's sentence set unchanged.
    let err = orchestrator.merge_cluster(from, to, &HashMap::new()).await.unwrap_err();
    assert_eq!(err.kind(), "not_found");
    let after = orchestrator.stored_sentences("phones").await.unwrap();
    assert_eq!(after.len(), sentences.len());
    assert!(after.iter().all(|s| s.cluster_id == to));

    let experiment = &orchestrator.list_experiments().await.unwrap()[0];
    assert_eq!(experiment.clusters_pos.len(), 1);
    assert_eq!(experiment.clusters_pos[0].cluster_id, to);
    assert_eq!(experiment.clusters_pos[0].sentence_count, summary.pos_sentences);

    println!("[PASS] test_merge_cluster_second_call_is_not_found");
}

#[tokio::test]
async fn test_delete_experiment_cascade_leaves_nothing() {
    let orchestrator = orchestrator_with_reviews(vec![review(
        "Phone A",
        "phones",
        &["Battery lasts long", "Screen is bright"],
        &["Camera is blurry", "Speaker sounds tinny"],
    )])
    .await;

    let summary = orchestrator.run(&run_config("phones", 1, 2)).await.unwrap();

    let remaining = orchestrator.delete_experiment(summary.experiment_id).await.unwrap();
    assert!(remaining.is_empty());
    assert!(orchestrator.stored_sentences("phones").await.unwrap().is_empty());

    // A fresh run for the category now succeeds.
    orchestrator.run(&run_config("phones", 1, 2)).await.unwrap();

    println!("[PASS] test_delete_experiment_cascade_leaves_nothing");
}

#[tokio::test]
async fn test_rename_operations_roundtrip() {
    let orchestrator = orchestrator_with_reviews(vec![review(
        "Phone A",
        "phones",
        &["Battery lasts long", "Battery drains overnight"],
        &[],
    )])
    .await;

    orchestrator.run(&run_config("phones", 1, 1)).await.unwrap();

    let experiment = &orchestrator.list_experiments().await.unwrap()[0];
    let cluster_id = experiment.clusters_pos[0].cluster_id;

    orchestrator.rename_cluster(cluster_id, "battery life").await.unwrap();
    let experiment = &orchestrator.list_experiments().await.unwrap()[0];
    assert_eq!(experiment.clusters_pos[0].name, "battery life");

    let sentences = orchestrator.stored_sentences("phones").await.unwrap();
    orchestrator.rename_topic(sentences[0].topic_id, "drain issues").await.unwrap();

    let err = orchestrator.rename_cluster(Uuid::new_v4(), "x").await.unwrap_err();
    assert_eq!(err.kind(), "not_found");

    println!("[PASS] test_rename_operations_roundtrip");
}

#[tokio::test]
async fn test_transfer_sentence_between_clusters() {
    let orchestrator = orchestrator_with_reviews(vec![
        review("Phone A", "phones", &["Battery lasts long", "Battery drains overnight"], &[]),
        review("Phone B", "phones", &["Camera takes sharp photos", "Camera focus works fast"], &[]),
    ])
    .await;

    orchestrator.run(&run_config("phones", 2, 1)).await.unwrap();

    let sentences = orchestrator.stored_sentences("phones").await.unwrap();
    let moving = &sentences[0];
    let target = sentences
        .iter()
        .find(|s| s.cluster_id != moving.cluster_id)
        .expect("two clusters expected");

    orchestrator
        .transfer_sentence(target.cluster_id, moving.id, 0, target.topic_id)
        .await
        .unwrap();

    let sentences = orchestrator.stored_sentences("phones").await.unwrap();
    let moved = sentences.iter().find(|s| s.id == moving.id).unwrap();
    assert_eq!(moved.cluster_id, target.cluster_id);
    assert_eq!(moved.topic_id, target.topic_id);

    println!("[PASS] test_transfer_sentence_between_clusters");
}
