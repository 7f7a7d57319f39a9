//! Audit entry and detail types
//!
//! Entries are immutable once written and carry no identifying content:
//! detail payloads only enter through the sanitizer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Well-known audit event tags
pub mod events {
    pub const RECORD_UPLOADED: &str = "RECORD_UPLOADED";
    pub const VECTOR_EMBEDDED: &str = "VECTOR_EMBEDDED";
    pub const VECTOR_REEMBEDDED: &str = "VECTOR_REEMBEDDED";
    pub const AI_QUERY: &str = "AI_QUERY";
    pub const AI_ANALYSIS: &str = "AI_ANALYSIS";
}

/// Structured detail with the fixed allow-listed key set.
/// Anything outside these keys is discarded at the sanitization boundary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredDetail {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vector_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl StructuredDetail {
    /// True when every field is absent
    pub fn is_empty(&self) -> bool {
        self.note.is_none()
            && self.action.is_none()
            && self.vector_id.is_none()
            && self.status.is_none()
    }
}

/// Detail payload of an audit entry, modeled as a tagged union rather than
/// a free-form value so the sanitizer has a closed set of shapes to handle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AuditDetail {
    /// No detail supplied
    #[default]
    Empty,
    /// Structured detail restricted to the allow-listed keys
    Structured(StructuredDetail),
    /// Free-text detail (always redacted before storage)
    Text(String),
}

impl AuditDetail {
    /// Structured detail carrying only a note
    pub fn note(note: impl Into<String>) -> Self {
        AuditDetail::Structured(StructuredDetail {
            note: Some(note.into()),
            ..Default::default()
        })
    }

    /// Structured detail carrying an action tag
    pub fn action(action: impl Into<String>) -> Self {
        AuditDetail::Structured(StructuredDetail {
            action: Some(action.into()),
            ..Default::default()
        })
    }

    /// The status dimension, when present
    pub fn status(&self) -> Option<&str> {
        match self {
            AuditDetail::Structured(s) => s.status.as_deref(),
            _ => None,
        }
    }

    /// Flat string rendering used by the CSV export
    pub fn display_string(&self) -> String {
        match self {
            AuditDetail::Empty => String::new(),
            AuditDetail::Text(t) => t.clone(),
            AuditDetail::Structured(s) => {
                serde_json::to_string(s).unwrap_or_default()
            }
        }
    }
}

/// Convert an arbitrary JSON payload into the closed detail union.
/// Objects keep only allow-listed string keys; strings pass through as
/// text; anything else is stringified so no caller-supplied shape can
/// bypass the closed union.
impl From<Value> for AuditDetail {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => AuditDetail::Empty,
            Value::String(s) => AuditDetail::Text(s),
            Value::Object(map) => {
                let pick = |key: &str| -> Option<String> {
                    map.get(key).map(|v| match v {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                };
                AuditDetail::Structured(StructuredDetail {
                    note: pick("note"),
                    action: pick("action"),
                    vector_id: pick("vector_id"),
                    status: pick("status"),
                })
            }
            other => AuditDetail::Text(other.to_string()),
        }
    }
}

/// One immutable row of the audit trail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Backing-store id of this entry
    pub entry_id: String,
    /// Event tag, e.g. `VECTOR_EMBEDDED`
    pub event: String,
    /// Acting identity as supplied by the identity provider
    pub actor: String,
    /// Role of the actor
    pub role: String,
    /// Patient the event concerns, when applicable
    pub patient_id: Option<String>,
    /// Sanitized detail payload
    pub detail: AuditDetail,
    /// UTC timestamp captured at write time; no cross-writer ordering is
    /// implied beyond this value
    pub timestamp: DateTime<Utc>,
}
