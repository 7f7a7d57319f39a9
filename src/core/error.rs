//! Error types for medvault
//!
//! One top-level taxonomy for the composition layer; subsystems with their
//! own failure modes (the vector store) keep a local enum and convert in.

use thiserror::Error;

use crate::audit::AuditStoreError;
use crate::vector::VectorError;

/// Result type alias for vault operations
pub type Result<T> = std::result::Result<T, VaultError>;

/// Main error type for vault operations
#[derive(Error, Debug)]
pub enum VaultError {
    /// A required field was missing or malformed at a call boundary
    #[error("Validation failed: {reason}")]
    Validation { reason: String },

    /// A referenced clinical document does not exist
    #[error("Patient record not found: {patient_id}")]
    NotFound { patient_id: String },

    /// An external capability (embedder, backing store) failed
    #[error("Capability error: {0}")]
    Capability(#[from] VectorError),

    /// The backing audit log store failed an append
    #[error("Capability error: {0}")]
    AuditStore(#[from] AuditStoreError),

    /// A freshly minted vector id collided with an existing one.
    /// Should not occur with the id scheme in use.
    #[error("Duplicate vector id: {vector_id}")]
    Conflict { vector_id: String },
}

impl VaultError {
    /// Validation error from anything printable
    pub fn validation(reason: impl Into<String>) -> Self {
        VaultError::Validation {
            reason: reason.into(),
        }
    }

    /// Check if the error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            VaultError::Capability(e) => e.is_retryable(),
            // A log-store outage is transient from the caller's view
            VaultError::AuditStore(_) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_display() {
        let err = VaultError::validation("event, actor and role are required");
        assert!(err.to_string().contains("event, actor and role"));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_capability_conversion() {
        let err: VaultError = VectorError::Timeout { timeout_ms: 5000 }.into();
        assert!(err.is_retryable());
        assert!(err.to_string().contains("5000"));
    }

    #[test]
    fn test_not_found_display() {
        let err = VaultError::NotFound {
            patient_id: "PAT-1a2b3c4d".to_string(),
        };
        assert!(err.to_string().contains("PAT-1a2b3c4d"));
    }
}
