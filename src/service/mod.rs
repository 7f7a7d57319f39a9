//! Composition layer
//!
//! `VaultService` wires the document store, vector store and audit trail
//! into the operations the outer surface exposes. Every sensitive
//! operation writes an audit entry through the fail-open path; an audit
//! backend outage degrades to a telemetry warning, never a failed call.


use std::sync::Arc;

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::answer::risk::{analyze_risk, RiskAnalysis};
use crate::answer::{generate_answer, ClinicalAnswer};
use crate::audit::{events, AuditDetail, AuditTrail, StructuredDetail};
use crate::core::config::VaultConfig;
use crate::core::error::{Result, VaultError};
use crate::core::types::{ClinicalDocument, DocumentStatus};
use crate::docs::DocumentStore;
use crate::extract::extract_metadata;
use crate::redact::redact;
use crate::vector::{VectorError, VectorMetadata, VectorStore};

/// Receipt for a stored upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub patient_id: String,
    pub status: DocumentStatus,
}

/// Receipt for an embed or re-embed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedReceipt {
    pub patient_id: String,
    pub vector_id: String,
}

/// One retrieved match, score reported as an integer percent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryMatch {
    pub vector_id: String,
    pub score_percent: i32,
}

/// Answer plus its provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResponse {
    pub answer: ClinicalAnswer,
    /// Vector ids the context was drawn from
    pub sources: Vec<String>,
    pub matches: Vec<QueryMatch>,
    /// Patients whose records contributed to the context
    pub patients_used: Vec<String>,
}

/// Point-in-time counters for the admin dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardCounts {
    pub uploaded: usize,
    pub embedded: usize,
    pub vectors: usize,
    pub audit_entries: usize,
}

/// The vault's operation surface over injected stores
pub struct VaultService {
    config: VaultConfig,
    documents: Arc<dyn DocumentStore>,
    vectors: Arc<VectorStore>,
    audit: AuditTrail,
}

impl VaultService {
    pub fn new(
        config: VaultConfig,
        documents: Arc<dyn DocumentStore>,
        vectors: Arc<VectorStore>,
        audit: AuditTrail,
    ) -> Self {
        Self {
            config,
            documents,
            vectors,
            audit,
        }
    }

    pub fn audit(&self) -> &AuditTrail {
        &self.audit
    }

    /// Store a raw clinical narrative and mint a patient id.
    pub fn upload(&self, text: &str, actor: &str, role: &str) -> Result<UploadReceipt> {
        if text.trim().is_empty() {
            return Err(VaultError::validation("text is required"));
        }

        let patient_id = format!("PAT-{}", &Uuid::new_v4().simple().to_string()[..8]);
        let extracted = extract_metadata(text, Utc::now().year());
        let document = ClinicalDocument::new(&patient_id, text, actor, extracted);
        self.documents.insert(document)?;

        self.audit.record_or_warn(
            events::RECORD_UPLOADED,
            actor,
            role,
            Some(&patient_id),
            AuditDetail::Structured(StructuredDetail {
                status: Some("success".to_string()),
                ..Default::default()
            }),
        );

        info!(%patient_id, "clinical narrative uploaded");
        Ok(UploadReceipt {
            patient_id,
            status: DocumentStatus::Uploaded,
        })
    }

    /// Redact, embed and index a patient's narrative.
    pub async fn embed_patient(
        &self,
        patient_id: &str,
        actor: &str,
        role: &str,
    ) -> Result<EmbedReceipt> {
        let document = self.find_document(patient_id)?;
        let cleaned = redact(&document.raw_text);
        let vector_id = self
            .embed_text(&document, &cleaned, role)
            .await?;

        self.documents
            .mark_embedded(patient_id, &cleaned, &vector_id)?;

        self.audit.record_or_warn(
            events::VECTOR_EMBEDDED,
            actor,
            role,
            Some(patient_id),
            AuditDetail::Structured(StructuredDetail {
                vector_id: Some(vector_id.clone()),
                status: Some("success".to_string()),
                ..Default::default()
            }),
        );

        info!(patient_id, %vector_id, "patient narrative embedded");
        Ok(EmbedReceipt {
            patient_id: patient_id.to_string(),
            vector_id,
        })
    }

    /// Re-embed an already processed patient, refreshing vector metadata.
    /// Works from the cleaned text when present, the raw text otherwise.
    pub async fn reembed_patient(
        &self,
        patient_id: &str,
        actor: &str,
        role: &str,
    ) -> Result<EmbedReceipt> {
        let document = self.find_document(patient_id)?;
        let cleaned = redact(document.embeddable_text());
        let vector_id = self
            .embed_text(&document, &cleaned, role)
            .await?;

        self.documents
            .mark_embedded(patient_id, &cleaned, &vector_id)?;

        self.audit.record_or_warn(
            events::VECTOR_REEMBEDDED,
            actor,
            role,
            Some(patient_id),
            AuditDetail::Structured(StructuredDetail {
                action: Some("reembed".to_string()),
                vector_id: Some(vector_id.clone()),
                status: Some("success".to_string()),
                ..Default::default()
            }),
        );

        Ok(EmbedReceipt {
            patient_id: patient_id.to_string(),
            vector_id,
        })
    }

    /// Answer a question over a patient's indexed records.
    ///
    /// Retrieval ranks the patient's vectors by similarity to the
    /// question; when the patient has no vectors yet, the latest cleaned
    /// document text is used as the context instead.
    pub async fn ask(
        &self,
        patient_id: &str,
        question: &str,
        actor: &str,
        role: &str,
    ) -> Result<AskResponse> {
        if question.trim().is_empty() {
            return Err(VaultError::validation("question is required"));
        }

        self.audit.record_or_warn(
            events::AI_QUERY,
            actor,
            role,
            Some(patient_id),
            AuditDetail::Structured(StructuredDetail {
                action: Some("AI_ASK".to_string()),
                note: Some(question.to_string()),
                ..Default::default()
            }),
        );

        let top_k = self.config.search.default_top_k;
        let scored = self
            .vectors
            .search_similar(patient_id, question, top_k)
            .await?;

        let mut retrieved: Vec<String> = Vec::new();
        let mut sources: Vec<String> = Vec::new();
        let mut matches: Vec<QueryMatch> = Vec::new();
        let mut patients_used: Vec<String> = Vec::new();

        if scored.is_empty() {
            // No vectors yet; fall back to the latest cleaned text
            if let Some(document) = self.documents.find_by_id(patient_id) {
                if let Some(cleaned) = document.cleaned_text {
                    retrieved.push(cleaned);
                    patients_used.push(document.patient_id);
                }
            }
        } else {
            for hit in scored {
                retrieved.push(hit.record.metadata.text.clone());
                sources.push(hit.record.vector_id.clone());
                matches.push(QueryMatch {
                    vector_id: hit.record.vector_id,
                    score_percent: (hit.score * 100.0) as i32,
                });
                if !patients_used.contains(&hit.record.patient_id) {
                    patients_used.push(hit.record.patient_id);
                }
            }
        }

        let answer = generate_answer(question, &retrieved);
        Ok(AskResponse {
            answer,
            sources,
            matches,
            patients_used,
        })
    }

    /// Run the risk heuristic on the latest embedded patient.
    ///
    /// Only the most recently embedded record may be analyzed; an explicit
    /// `patient_id` naming any other patient is rejected.
    pub fn analyze(
        &self,
        patient_id: Option<&str>,
        actor: &str,
        role: &str,
    ) -> Result<RiskAnalysis> {
        let latest = self
            .documents
            .latest_by_status(DocumentStatus::Embedded)
            .ok_or_else(|| VaultError::NotFound {
                patient_id: patient_id.unwrap_or("latest embedded").to_string(),
            })?;

        if let Some(requested) = patient_id {
            if requested != latest.patient_id {
                return Err(VaultError::validation(
                    "analysis allowed only on the latest embedded patient record",
                ));
            }
        }

        let cleaned = latest
            .cleaned_text
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| {
                VaultError::validation("no de-identified clinical text available for analysis")
            })?;

        let analysis = analyze_risk(cleaned);

        self.audit.record_or_warn(
            events::AI_ANALYSIS,
            actor,
            role,
            Some(&latest.patient_id),
            AuditDetail::Structured(StructuredDetail {
                status: Some("success".to_string()),
                ..Default::default()
            }),
        );

        Ok(analysis)
    }

    /// Counters for the admin dashboard.
    pub async fn dashboard_counts(&self) -> DashboardCounts {
        DashboardCounts {
            uploaded: self.documents.count_by_status(DocumentStatus::Uploaded),
            embedded: self.documents.count_by_status(DocumentStatus::Embedded),
            vectors: self.vectors.count().await,
            audit_entries: self.audit.stats().total,
        }
    }

    fn find_document(&self, patient_id: &str) -> Result<ClinicalDocument> {
        self.documents
            .find_by_id(patient_id)
            .ok_or_else(|| VaultError::NotFound {
                patient_id: patient_id.to_string(),
            })
    }

    /// Extract vector metadata from the document's text fields and store
    /// the cleaned text as a new embedding record.
    async fn embed_text(
        &self,
        document: &ClinicalDocument,
        cleaned: &str,
        role: &str,
    ) -> Result<String> {
        let extracted = extract_metadata(&document.raw_text, Utc::now().year());
        let metadata = VectorMetadata {
            uploaded_by: Some(document.uploaded_by.clone()),
            role: Some(role.to_string()),
            age: extracted.age,
            blood_pressure: extracted.blood_pressure,
            past_history: extracted.past_history,
            text: String::new(), // set by the store after redaction
        };

        let vector_id = self
            .vectors
            .store(&document.patient_id, cleaned, metadata)
            .await
            .map_err(|e| match e {
                VectorError::DuplicateId { vector_id } => VaultError::Conflict { vector_id },
                other => VaultError::from(other),
            })?;
        Ok(vector_id)
    }
}
