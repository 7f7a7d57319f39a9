//! Shared domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::extract::ExtractedMetadata;

/// Lifecycle status of a clinical document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    /// Raw narrative received, nothing derived yet
    Uploaded,
    /// Cleaned text persisted and embedded into the vector store
    Embedded,
}

/// A clinical narrative and what the vault has derived from it.
///
/// Raw text is ephemeral from the vault's point of view: once the document
/// is embedded only the cleaned (redacted) text crosses any boundary.
/// Documents are never deleted by this core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClinicalDocument {
    /// External patient key, `PAT-` + 8 hex chars when minted here
    pub patient_id: String,

    /// Original narrative as uploaded
    pub raw_text: String,

    /// Redacted narrative, set when the document is embedded
    pub cleaned_text: Option<String>,

    /// Id of the most recent embedding for this document
    pub vector_id: Option<String>,

    /// Lifecycle status
    pub status: DocumentStatus,

    /// Heuristically extracted non-identifying fields
    pub extracted: ExtractedMetadata,

    /// Actor that uploaded the narrative
    pub uploaded_by: String,

    /// Creation time, captured at upload
    pub created_at: DateTime<Utc>,
}

impl ClinicalDocument {
    /// Create a freshly uploaded document
    pub fn new(
        patient_id: impl Into<String>,
        raw_text: impl Into<String>,
        uploaded_by: impl Into<String>,
        extracted: ExtractedMetadata,
    ) -> Self {
        Self {
            patient_id: patient_id.into(),
            raw_text: raw_text.into(),
            cleaned_text: None,
            vector_id: None,
            status: DocumentStatus::Uploaded,
            extracted,
            uploaded_by: uploaded_by.into(),
            created_at: Utc::now(),
        }
    }

    /// The text an embedding should be computed from: cleaned when present,
    /// raw otherwise (the store redacts at its own boundary regardless).
    pub fn embeddable_text(&self) -> &str {
        self.cleaned_text.as_deref().unwrap_or(&self.raw_text)
    }
}
