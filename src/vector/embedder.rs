//! Embedding capability
//!
//! The embedder is an opaque capability behind a trait seam: text in,
//! fixed-length vector out, deterministic for identical input within
//! process lifetime. Failures are reported distinctly and never degraded
//! to a zero vector.

use async_trait::async_trait;

use super::error::EmbedderError;

/// Text embedding capability
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Output dimension of every vector this embedder produces
    fn dim(&self) -> usize;

    /// Embed a single text into a fixed-length vector
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedderError>;
}

/// Deterministic local embedder: a fold-hashed bag-of-words projected into
/// a fixed dimension and L2-normalized. No model runtime, no vocabulary;
/// good enough for per-patient scale similarity and for tests.
pub struct HashingEmbedder {
    dimension: usize,
}

impl HashingEmbedder {
    /// A zero dimension is clamped to 1; the bucket mapping needs a
    /// non-zero modulus.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    /// Fold hash over token bytes, mapped into the vector dimension
    fn token_bucket(&self, token: &str) -> usize {
        let hash: u64 = token
            .bytes()
            .fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));
        (hash % self.dimension as u64) as usize
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(384)
    }
}

#[async_trait]
impl Embedder for HashingEmbedder {
    fn dim(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedderError> {
        let mut vector = vec![0.0f32; self.dimension];

        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let bucket = self.token_bucket(&token.to_lowercase());
            vector[bucket] += 1.0;
        }

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut vector {
                *x /= norm;
            }
        }

        Ok(vector)
    }
}
