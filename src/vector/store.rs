//! Embedding store with linear-scan similarity search
//!
//! Records are append-only: re-embedding a patient adds a new record and
//! orphans the old one unless an external process prunes it. Search cost
//! is O(n) in the number of records for a patient, accepted at
//! per-patient scale.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::core::config::EmbeddingConfig;
use crate::redact::redact;

use super::embedder::Embedder;
use super::error::{VectorError, VectorResult};

/// Bounded metadata carried by every embedding record, plus the source
/// text the embedding was computed from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VectorMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploaded_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blood_pressure: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub past_history: Option<String>,
    /// Source text, set by the store after it has crossed the redaction
    /// boundary
    pub text: String,
}

/// Persisted unit of {id, owning patient, embedding, metadata}.
/// Immutable once appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingRecord {
    /// Globally unique id, `VEC-` + 10 hex chars
    pub vector_id: String,
    /// Owning patient; a soft reference, eventually consistent with the
    /// document store, not transactionally enforced
    pub patient_id: String,
    /// Fixed-length embedding
    pub embedding: Vec<f32>,
    /// Bounded metadata plus source text
    pub metadata: VectorMetadata,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

/// A record annotated with its similarity score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredRecord {
    pub record: EmbeddingRecord,
    pub score: f32,
}

/// Cosine similarity of two equal-length vectors. A zero-norm vector on
/// either side scores 0 by definition.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

/// In-process embedding store over an injected embedder capability
pub struct VectorStore {
    config: EmbeddingConfig,
    embedder: Arc<dyn Embedder>,
    records: Arc<RwLock<Vec<EmbeddingRecord>>>,
}

impl VectorStore {
    pub fn new(config: EmbeddingConfig, embedder: Arc<dyn Embedder>) -> Self {
        Self {
            config,
            embedder,
            records: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &EmbeddingConfig {
        &self.config
    }

    /// Number of records in the store
    pub async fn count(&self) -> usize {
        self.records.read().await.len()
    }

    /// Embed and persist a text for a patient, returning the minted id.
    ///
    /// The text is redacted at this boundary before anything else happens;
    /// callers that already redacted see no difference (redaction is
    /// idempotent), and a caller that forgot cannot persist identifiers.
    /// Embedding failure or timeout fails the whole call with nothing
    /// stored.
    pub async fn store(
        &self,
        patient_id: &str,
        text: &str,
        mut metadata: VectorMetadata,
    ) -> VectorResult<String> {
        let cleaned = redact(text);
        let embedding = self.embed_with_timeout(&cleaned).await?;

        let vector_id = format!("VEC-{}", &Uuid::new_v4().simple().to_string()[..10]);
        metadata.text = cleaned;

        let record = EmbeddingRecord {
            vector_id: vector_id.clone(),
            patient_id: patient_id.to_string(),
            embedding,
            metadata,
            created_at: Utc::now(),
        };

        let mut records = self.records.write().await;
        if records.iter().any(|r| r.vector_id == vector_id) {
            return Err(VectorError::DuplicateId { vector_id });
        }
        records.push(record);

        debug!(patient_id, %vector_id, "stored embedding record");
        Ok(vector_id)
    }

    /// Records for a patient in insertion order, a plain filter rather
    /// than a similarity ranking.
    pub async fn search(&self, patient_id: &str, top_k: usize) -> Vec<EmbeddingRecord> {
        self.records
            .read()
            .await
            .iter()
            .filter(|r| r.patient_id == patient_id)
            .take(top_k)
            .cloned()
            .collect()
    }

    /// Embed `query_text` and rank the patient's records by cosine
    /// similarity, descending, ties keeping insertion order. Returns at
    /// most `top_k` records annotated with their scores.
    pub async fn search_similar(
        &self,
        patient_id: &str,
        query_text: &str,
        top_k: usize,
    ) -> VectorResult<Vec<ScoredRecord>> {
        let query = self.embed_with_timeout(query_text).await?;

        let records = self.records.read().await;
        let mut scored: Vec<ScoredRecord> = records
            .iter()
            .filter(|r| r.patient_id == patient_id)
            .map(|r| ScoredRecord {
                score: cosine_similarity(&query, &r.embedding),
                record: r.clone(),
            })
            .collect();

        // Stable sort: equal scores keep insertion order
        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(top_k);

        debug!(
            patient_id,
            results = scored.len(),
            "similarity search complete"
        );
        Ok(scored)
    }

    /// Run the embedder under the configured deadline and validate its
    /// output dimension.
    async fn embed_with_timeout(&self, text: &str) -> VectorResult<Vec<f32>> {
        let timeout = Duration::from_millis(self.config.timeout_ms);
        let embedding = tokio::time::timeout(timeout, self.embedder.embed(text))
            .await
            .map_err(|_| VectorError::Timeout {
                timeout_ms: self.config.timeout_ms,
            })??;

        if embedding.len() != self.config.dimension {
            return Err(VectorError::InvalidDimension {
                expected: self.config.dimension,
                actual: embedding.len(),
            });
        }

        Ok(embedding)
    }
}
