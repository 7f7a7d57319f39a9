//! MedVault - PHI-safe clinical record vault
//!
//! This crate provides the core functionality for MedVault including:
//! - Rule-based PHI redaction with labeled placeholder tokens
//! - PHI span detection for review tooling
//! - Sanitized, append-only audit trail with query/export surface
//! - In-process vector store with cosine similarity retrieval
//! - Heuristic clinical metadata extraction
//! - Deterministic, non-diagnostic answer and risk engines

pub mod answer;
pub mod audit;
pub mod core;
pub mod docs;
pub mod extract;
pub mod logging;
pub mod redact;
pub mod service;
pub mod vector;

// Re-export commonly used items
pub use crate::core::config::VaultConfig;
pub use crate::core::error::{Result, VaultError};
pub use crate::core::types::{ClinicalDocument, DocumentStatus};
pub use answer::{generate_answer, ClinicalAnswer};
pub use audit::{AuditDetail, AuditTrail};
pub use redact::{detect_phi, redact, redaction_count};
pub use service::VaultService;
pub use vector::{VectorError, VectorStore};
