//! Tests for the vector store and similarity search

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use proptest::prelude::*;

use super::*;
use crate::core::config::EmbeddingConfig;

fn test_config(dimension: usize) -> EmbeddingConfig {
    EmbeddingConfig {
        dimension,
        timeout_ms: 2_000,
    }
}

fn test_store(dimension: usize) -> VectorStore {
    VectorStore::new(test_config(dimension), Arc::new(HashingEmbedder::new(dimension)))
}

/// Embedder that always fails, for loud-failure tests
struct BrokenEmbedder;

#[async_trait]
impl Embedder for BrokenEmbedder {
    fn dim(&self) -> usize {
        8
    }

    async fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbedderError> {
        Err(EmbedderError::Unavailable {
            reason: "model failed to load".into(),
        })
    }
}

/// Embedder that hangs past any reasonable deadline
struct HangingEmbedder;

#[async_trait]
impl Embedder for HangingEmbedder {
    fn dim(&self) -> usize {
        8
    }

    async fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbedderError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(vec![0.0; 8])
    }
}

// ============================================================================
// Cosine similarity
// ============================================================================

#[test]
fn test_cosine_identical_vectors() {
    let v = vec![0.5, -0.3, 0.8];
    assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
}

#[test]
fn test_cosine_orthogonal_vectors() {
    let a = vec![1.0, 0.0];
    let b = vec![0.0, 1.0];
    assert!(cosine_similarity(&a, &b).abs() < 1e-6);
}

#[test]
fn test_cosine_opposite_vectors() {
    let a = vec![1.0, 2.0];
    let b = vec![-1.0, -2.0];
    assert!((cosine_similarity(&a, &b) + 1.0).abs() < 1e-6);
}

#[test]
fn test_cosine_zero_norm_is_zero() {
    let zero = vec![0.0, 0.0, 0.0];
    let v = vec![1.0, 2.0, 3.0];
    assert_eq!(cosine_similarity(&zero, &v), 0.0);
    assert_eq!(cosine_similarity(&v, &zero), 0.0);
    assert_eq!(cosine_similarity(&zero, &zero), 0.0);
}

#[test]
fn test_cosine_symmetric_over_random_vectors() {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..50 {
        let a: Vec<f32> = (0..16).map(|_| rng.gen_range(-1.0f32..1.0)).collect();
        let b: Vec<f32> = (0..16).map(|_| rng.gen_range(-1.0f32..1.0)).collect();
        let ab = cosine_similarity(&a, &b);
        let ba = cosine_similarity(&b, &a);
        assert!((ab - ba).abs() < 1e-6, "asymmetric: {ab} vs {ba}");
    }
}

proptest! {
    #[test]
    fn prop_cosine_in_unit_range(
        a in prop::collection::vec(-100.0f32..100.0, 4),
        b in prop::collection::vec(-100.0f32..100.0, 4),
    ) {
        let score = cosine_similarity(&a, &b);
        prop_assert!(score >= -1.0 - 1e-5 && score <= 1.0 + 1e-5, "score {score}");
    }
}

// ============================================================================
// Store
// ============================================================================

#[tokio::test]
async fn test_store_returns_well_formed_unique_ids() {
    let store = test_store(64);
    let mut ids = std::collections::HashSet::new();

    for i in 0..20 {
        let id = store
            .store("PAT-1", &format!("note number {i}"), VectorMetadata::default())
            .await
            .unwrap();
        assert!(id.starts_with("VEC-"), "id: {id}");
        let hex = &id[4..];
        assert_eq!(hex.len(), 10);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
        assert!(ids.insert(id), "duplicate id");
    }
    assert_eq!(store.count().await, 20);
}

#[tokio::test]
async fn test_store_redacts_source_text() {
    let store = test_store(64);
    store
        .store(
            "PAT-1",
            "Name: John Smith\nchest pain overnight",
            VectorMetadata::default(),
        )
        .await
        .unwrap();

    let records = store.search("PAT-1", 10).await;
    assert_eq!(records.len(), 1);
    assert!(!records[0].metadata.text.contains("John Smith"));
    assert!(records[0].metadata.text.contains("[REDACTED:NAME]"));
    assert!(records[0].metadata.text.contains("chest pain overnight"));
}

#[tokio::test]
async fn test_search_is_insertion_order_filter() {
    let store = test_store(64);
    let a = store
        .store("PAT-1", "first note", VectorMetadata::default())
        .await
        .unwrap();
    let b = store
        .store("PAT-1", "second note", VectorMetadata::default())
        .await
        .unwrap();
    store
        .store("PAT-2", "other patient", VectorMetadata::default())
        .await
        .unwrap();

    let records = store.search("PAT-1", 10).await;
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].vector_id, a);
    assert_eq!(records[1].vector_id, b);

    let limited = store.search("PAT-1", 1).await;
    assert_eq!(limited.len(), 1);
    assert_eq!(limited[0].vector_id, a);
}

#[tokio::test]
async fn test_search_similar_ranked_and_restricted() {
    let store = test_store(64);
    store
        .store("PAT-1", "chest pain radiating to left arm", VectorMetadata::default())
        .await
        .unwrap();
    store
        .store("PAT-1", "ankle sprain from hiking", VectorMetadata::default())
        .await
        .unwrap();
    store
        .store("PAT-2", "chest pain and dyspnea", VectorMetadata::default())
        .await
        .unwrap();

    let results = store
        .search_similar("PAT-1", "chest pain", 10)
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.record.patient_id == "PAT-1"));
    // non-increasing scores
    assert!(results[0].score >= results[1].score);
    // the cardiac note must outrank the ankle note for a cardiac query
    assert!(results[0].record.metadata.text.contains("chest pain"));
}

#[tokio::test]
async fn test_search_similar_respects_top_k() {
    let store = test_store(64);
    for i in 0..5 {
        store
            .store("PAT-1", &format!("note {i}"), VectorMetadata::default())
            .await
            .unwrap();
    }

    let results = store.search_similar("PAT-1", "note", 3).await.unwrap();
    assert_eq!(results.len(), 3);
}

#[tokio::test]
async fn test_search_similar_ties_keep_insertion_order() {
    let store = test_store(64);
    let a = store
        .store("PAT-1", "identical text", VectorMetadata::default())
        .await
        .unwrap();
    let b = store
        .store("PAT-1", "identical text", VectorMetadata::default())
        .await
        .unwrap();

    let results = store
        .search_similar("PAT-1", "identical text", 10)
        .await
        .unwrap();
    assert_eq!(results[0].record.vector_id, a);
    assert_eq!(results[1].record.vector_id, b);
}

#[tokio::test]
async fn test_search_similar_unknown_patient_is_empty() {
    let store = test_store(64);
    store
        .store("PAT-1", "some note", VectorMetadata::default())
        .await
        .unwrap();
    let results = store.search_similar("PAT-404", "note", 5).await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn test_embedder_failure_is_loud_and_stores_nothing() {
    let store = VectorStore::new(test_config(8), Arc::new(BrokenEmbedder));
    let err = store
        .store("PAT-1", "text", VectorMetadata::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        VectorError::Embedding(EmbedderError::Unavailable { .. })
    ));
    assert_eq!(store.count().await, 0);
}

#[tokio::test]
async fn test_embedder_timeout_surfaces_distinctly() {
    let config = EmbeddingConfig {
        dimension: 8,
        timeout_ms: 50,
    };
    let store = VectorStore::new(config, Arc::new(HangingEmbedder));
    let err = store
        .store("PAT-1", "text", VectorMetadata::default())
        .await
        .unwrap_err();
    assert!(matches!(err, VectorError::Timeout { timeout_ms: 50 }));
}

#[tokio::test]
async fn test_dimension_mismatch_rejected() {
    // Store configured for 16, embedder emits 64
    let store = VectorStore::new(test_config(16), Arc::new(HashingEmbedder::new(64)));
    let err = store
        .store("PAT-1", "text", VectorMetadata::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        VectorError::InvalidDimension {
            expected: 16,
            actual: 64
        }
    ));
}

#[tokio::test]
async fn test_hashing_embedder_clamps_zero_dimension() {
    let embedder = HashingEmbedder::new(0);
    assert_eq!(embedder.dim(), 1);
    let v = embedder.embed("chest pain").await.unwrap();
    assert_eq!(v.len(), 1);
}

#[tokio::test]
async fn test_hashing_embedder_deterministic() {
    let embedder = HashingEmbedder::new(64);
    let a = embedder.embed("chest pain radiating").await.unwrap();
    let b = embedder.embed("chest pain radiating").await.unwrap();
    assert_eq!(a, b);

    let norm: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() < 1e-5);
}
