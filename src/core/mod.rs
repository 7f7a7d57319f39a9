//! Core types shared across the vault: errors, configuration, domain model.

pub mod config;
pub mod error;
pub mod types;

pub use config::{EmbeddingConfig, SearchConfig, VaultConfig};
pub use error::{Result, VaultError};
pub use types::{ClinicalDocument, DocumentStatus};
