//! Audit sanitizer and trail
//!
//! Every state-changing or sensitive read is mirrored here. The trail
//! independently re-enforces the same no-leak guarantee as the redaction
//! boundary: detail payloads of any shape are reduced to a closed union,
//! allow-listed, and redacted before they are stored.

mod entry;
mod sanitizer;
mod store;
mod trail;


pub use entry::{events, AuditDetail, AuditEntry, StructuredDetail};
pub use sanitizer::sanitize_detail;
pub use store::{AuditStore, AuditStoreError, InMemoryAuditStore};
pub use trail::{AuditPage, AuditQuery, AuditStats, AuditTrail, AuditWriteOutcome};
