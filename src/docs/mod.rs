//! Clinical document store
//!
//! The document store is an external collaborator specified by its
//! contract; the in-memory implementation backs tests and single-process
//! deployments. Documents are created on upload, moved to Embedded once a
//! vector exists, and never deleted by this core.

#[cfg(test)]
mod tests;

use parking_lot::RwLock;

use crate::core::error::{Result, VaultError};
use crate::core::types::{ClinicalDocument, DocumentStatus};

/// Document store contract
pub trait DocumentStore: Send + Sync {
    /// Insert a freshly uploaded document
    fn insert(&self, document: ClinicalDocument) -> Result<()>;

    /// Find a document by patient id
    fn find_by_id(&self, patient_id: &str) -> Option<ClinicalDocument>;

    /// Latest document in the given status, by creation time
    fn latest_by_status(&self, status: DocumentStatus) -> Option<ClinicalDocument>;

    /// Transition a document to Embedded, recording the cleaned text and
    /// the vector id. `NotFound` when the patient has no document.
    fn mark_embedded(
        &self,
        patient_id: &str,
        cleaned_text: &str,
        vector_id: &str,
    ) -> Result<()>;

    /// Number of documents in the given status
    fn count_by_status(&self, status: DocumentStatus) -> usize;
}

/// In-memory document store
#[derive(Default)]
pub struct InMemoryDocumentStore {
    documents: RwLock<Vec<ClinicalDocument>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn insert(&self, document: ClinicalDocument) -> Result<()> {
        self.documents.write().push(document);
        Ok(())
    }

    fn find_by_id(&self, patient_id: &str) -> Option<ClinicalDocument> {
        self.documents
            .read()
            .iter()
            .rev()
            .find(|d| d.patient_id == patient_id)
            .cloned()
    }

    fn latest_by_status(&self, status: DocumentStatus) -> Option<ClinicalDocument> {
        self.documents
            .read()
            .iter()
            .filter(|d| d.status == status)
            .max_by_key(|d| d.created_at)
            .cloned()
    }

    fn mark_embedded(
        &self,
        patient_id: &str,
        cleaned_text: &str,
        vector_id: &str,
    ) -> Result<()> {
        let mut documents = self.documents.write();
        let doc = documents
            .iter_mut()
            .rev()
            .find(|d| d.patient_id == patient_id)
            .ok_or_else(|| VaultError::NotFound {
                patient_id: patient_id.to_string(),
            })?;

        doc.cleaned_text = Some(cleaned_text.to_string());
        doc.vector_id = Some(vector_id.to_string());
        doc.status = DocumentStatus::Embedded;
        Ok(())
    }

    fn count_by_status(&self, status: DocumentStatus) -> usize {
        self.documents
            .read()
            .iter()
            .filter(|d| d.status == status)
            .count()
    }
}
