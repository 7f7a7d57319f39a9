//! Configuration for the vault core
//!
//! Plain serde structs with defaults; no file loading here. Hosts decide
//! where configuration comes from and hand it in.

use serde::{Deserialize, Serialize};

/// Main vault configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultConfig {
    /// Embedding settings
    pub embedding: EmbeddingConfig,

    /// Retrieval settings
    pub search: SearchConfig,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            embedding: EmbeddingConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

/// Embedding capability settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Vector dimension (must match the embedder's output)
    pub dimension: usize,

    /// Timeout for a single embedder call, in milliseconds.
    /// An embedder that hangs past this surfaces a distinct timeout error.
    pub timeout_ms: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            dimension: 384, // all-MiniLM-L6-v2 output dimension
            timeout_ms: 10_000,
        }
    }
}

/// Retrieval settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Default number of records returned by similarity search
    pub default_top_k: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { default_top_k: 3 }
    }
}

impl VaultConfig {
    /// Override the embedding dimension
    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.embedding.dimension = dimension;
        self
    }

    /// Override the embedder timeout
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.embedding.timeout_ms = timeout_ms;
        self
    }

    /// Override the default top_k
    pub fn with_default_top_k(mut self, top_k: usize) -> Self {
        self.search.default_top_k = top_k;
        self
    }
}
