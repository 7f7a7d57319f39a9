//! Embedding store and similarity retrieval
//!
//! Vectors are produced by an injected `Embedder` capability, persisted as
//! append-only records, and retrieved per patient by cosine similarity
//! with a linear scan.

mod embedder;
mod error;
mod store;

#[cfg(test)]
mod tests;

pub use embedder::{Embedder, HashingEmbedder};
pub use error::{EmbedderError, VectorError, VectorResult};
pub use store::{cosine_similarity, EmbeddingRecord, ScoredRecord, VectorMetadata, VectorStore};
