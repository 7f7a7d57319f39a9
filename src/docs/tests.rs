use super::*;
use crate::core::error::VaultError;
use crate::core::types::{ClinicalDocument, DocumentStatus};
use crate::extract::ExtractedMetadata;

fn doc(patient_id: &str, text: &str) -> ClinicalDocument {
    ClinicalDocument::new(patient_id, text, "dr.demo", ExtractedMetadata::default())
}

#[test]
fn test_insert_and_find() {
    let store = InMemoryDocumentStore::new();
    store.insert(doc("PAT-11111111", "chest pain overnight")).unwrap();

    let found = store.find_by_id("PAT-11111111").unwrap();
    assert_eq!(found.raw_text, "chest pain overnight");
    assert_eq!(found.status, DocumentStatus::Uploaded);
    assert!(found.cleaned_text.is_none());
    assert!(store.find_by_id("PAT-00000000").is_none());
}

#[test]
fn test_find_returns_latest_for_patient() {
    let store = InMemoryDocumentStore::new();
    store.insert(doc("PAT-11111111", "first visit")).unwrap();
    store.insert(doc("PAT-11111111", "second visit")).unwrap();

    let found = store.find_by_id("PAT-11111111").unwrap();
    assert_eq!(found.raw_text, "second visit");
}

#[test]
fn test_mark_embedded_transitions_document() {
    let store = InMemoryDocumentStore::new();
    store.insert(doc("PAT-11111111", "Name: Jane Doe\nchest pain")).unwrap();

    store
        .mark_embedded("PAT-11111111", "[REDACTED:NAME]\nchest pain", "VEC-0123456789")
        .unwrap();

    let found = store.find_by_id("PAT-11111111").unwrap();
    assert_eq!(found.status, DocumentStatus::Embedded);
    assert_eq!(found.cleaned_text.as_deref(), Some("[REDACTED:NAME]\nchest pain"));
    assert_eq!(found.vector_id.as_deref(), Some("VEC-0123456789"));
    // raw text is untouched by the transition
    assert_eq!(found.raw_text, "Name: Jane Doe\nchest pain");
}

#[test]
fn test_mark_embedded_unknown_patient() {
    let store = InMemoryDocumentStore::new();
    let err = store
        .mark_embedded("PAT-deadbeef", "text", "VEC-0123456789")
        .unwrap_err();
    assert!(matches!(err, VaultError::NotFound { .. }));
}

#[test]
fn test_latest_by_status() {
    let store = InMemoryDocumentStore::new();
    assert!(store.latest_by_status(DocumentStatus::Embedded).is_none());

    store.insert(doc("PAT-aaaaaaaa", "older")).unwrap();
    store.insert(doc("PAT-bbbbbbbb", "newer")).unwrap();
    store
        .mark_embedded("PAT-aaaaaaaa", "older", "VEC-aaaaaaaaaa")
        .unwrap();

    let latest = store.latest_by_status(DocumentStatus::Embedded).unwrap();
    assert_eq!(latest.patient_id, "PAT-aaaaaaaa");
    let uploaded = store.latest_by_status(DocumentStatus::Uploaded).unwrap();
    assert_eq!(uploaded.patient_id, "PAT-bbbbbbbb");
}

#[test]
fn test_count_by_status() {
    let store = InMemoryDocumentStore::new();
    store.insert(doc("PAT-aaaaaaaa", "one")).unwrap();
    store.insert(doc("PAT-bbbbbbbb", "two")).unwrap();
    store
        .mark_embedded("PAT-aaaaaaaa", "one", "VEC-aaaaaaaaaa")
        .unwrap();

    assert_eq!(store.count_by_status(DocumentStatus::Uploaded), 1);
    assert_eq!(store.count_by_status(DocumentStatus::Embedded), 1);
}
