//! Audit backing store
//!
//! The trail wraps an external append-only log store behind a trait seam.
//! The contract is minimal: an appended entry is atomically visible once
//! acknowledged, nothing is ever updated or removed, and the trail layers
//! all querying over snapshots.

use parking_lot::RwLock;
use uuid::Uuid;

use super::entry::AuditEntry;

/// Failure of the backing log store
#[derive(Debug, thiserror::Error)]
#[error("Audit store failure: {reason}")]
pub struct AuditStoreError {
    pub reason: String,
}

/// Append-only log store contract
pub trait AuditStore: Send + Sync {
    /// Append an entry; the returned id acknowledges durable visibility
    fn append(&self, entry: AuditEntry) -> Result<String, AuditStoreError>;

    /// Snapshot of all entries in append order
    fn snapshot(&self) -> Vec<AuditEntry>;

    /// Number of stored entries
    fn len(&self) -> usize;

    /// True when no entries have been stored
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory append-only store
#[derive(Default)]
pub struct InMemoryAuditStore {
    entries: RwLock<Vec<AuditEntry>>,
}

impl InMemoryAuditStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AuditStore for InMemoryAuditStore {
    fn append(&self, mut entry: AuditEntry) -> Result<String, AuditStoreError> {
        if entry.entry_id.is_empty() {
            entry.entry_id = Uuid::new_v4().simple().to_string();
        }
        let id = entry.entry_id.clone();
        self.entries.write().push(entry);
        Ok(id)
    }

    fn snapshot(&self) -> Vec<AuditEntry> {
        self.entries.read().clone()
    }

    fn len(&self) -> usize {
        self.entries.read().len()
    }
}
