//! Detail sanitization
//!
//! Re-enforces the no-leak invariant on everything headed for the audit
//! trail: the redaction engine runs over every retained string, so even a
//! caller that mistakenly passes raw clinical text cannot leak an
//! identifier into an entry.

use crate::redact::redact;

use super::entry::{AuditDetail, StructuredDetail};

/// Sanitize a detail payload before storage. Structured details keep only
/// the allow-listed keys (already enforced by the type) with every string
/// redacted; text details are redacted wholesale.
pub fn sanitize_detail(detail: AuditDetail) -> AuditDetail {
    match detail {
        AuditDetail::Empty => AuditDetail::Empty,
        AuditDetail::Text(t) => AuditDetail::Text(redact(&t)),
        AuditDetail::Structured(s) => AuditDetail::Structured(StructuredDetail {
            note: s.note.map(|v| redact(&v)),
            action: s.action.map(|v| redact(&v)),
            vector_id: s.vector_id.map(|v| redact(&v)),
            status: s.status.map(|v| redact(&v)),
        }),
    }
}
