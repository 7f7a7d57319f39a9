//! Vector store and embedder error types

use thiserror::Error;

/// Result type for vector operations
pub type VectorResult<T> = Result<T, VectorError>;

/// Errors from the embedding capability
#[derive(Error, Debug)]
pub enum EmbedderError {
    /// The model backing the embedder is not available
    #[error("Embedding model not available: {reason}")]
    Unavailable { reason: String },

    /// The embedder ran but failed to produce a vector
    #[error("Embedding generation failed: {reason}")]
    Failed { reason: String },
}

/// Vector store specific errors
#[derive(Error, Debug)]
pub enum VectorError {
    /// Embedding failure; fails the whole operation, nothing partial is kept
    #[error("Embedding error: {0}")]
    Embedding(#[from] EmbedderError),

    /// The embedder exceeded the configured deadline
    #[error("Embedder timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// Embedder output does not match the configured dimension
    #[error("Invalid vector dimension: expected {expected}, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },

    /// A minted id collided with an existing record
    #[error("Duplicate vector id: {vector_id}")]
    DuplicateId { vector_id: String },
}

impl VectorError {
    /// Check if the error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            VectorError::Timeout { .. } | VectorError::Embedding(EmbedderError::Failed { .. })
        )
    }
}
