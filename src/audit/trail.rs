//! Append-only audit trail
//!
//! Records sensitive operations with sanitized detail payloads and offers
//! the query/aggregation/export surface the admin side needs. Entries are
//! timestamped at write time; no ordering across concurrent writers is
//! promised beyond each entry's own timestamp.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::error::{Result, VaultError};

use super::entry::{AuditDetail, AuditEntry};
use super::sanitizer::sanitize_detail;
use super::store::AuditStore;

/// Outcome of a fail-open audit write. Audit failures must never block the
/// primary operation, but they are surfaced here (and to the log) instead
/// of being silently swallowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditWriteOutcome {
    /// Entry acknowledged by the backing store
    Recorded(String),
    /// Write failed; a warning was emitted to telemetry
    Dropped,
}

impl AuditWriteOutcome {
    pub fn was_recorded(&self) -> bool {
        matches!(self, AuditWriteOutcome::Recorded(_))
    }
}

/// Filter set for trail queries. All filters are conjunctive.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditQuery {
    pub event: Option<String>,
    pub actor: Option<String>,
    pub role: Option<String>,
    pub patient_id: Option<String>,
    /// Case-insensitive substring over event/actor/role/detail.action/detail.note
    pub q: Option<String>,
    /// Normalized status: "error" also matches "failed" spellings, any casing
    pub status: Option<String>,
    /// Inclusive lower bound on entry timestamps
    pub from_ts: Option<DateTime<Utc>>,
    /// Inclusive upper bound on entry timestamps
    pub to_ts: Option<DateTime<Utc>>,
    pub skip: usize,
    pub limit: Option<usize>,
}

/// A page of query results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditPage {
    /// Total matches before paging
    pub total: usize,
    /// Matching entries, newest first
    pub entries: Vec<AuditEntry>,
}

/// Aggregated trail statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditStats {
    pub total: usize,
    /// (event, count) descending by count
    pub by_event: Vec<(String, usize)>,
    pub success: usize,
    pub warning: usize,
    pub failed: usize,
}

/// The audit trail over an append-only backing store
#[derive(Clone)]
pub struct AuditTrail {
    store: Arc<dyn AuditStore>,
}

impl AuditTrail {
    pub fn new(store: Arc<dyn AuditStore>) -> Self {
        Self { store }
    }

    /// Record a sensitive operation. Fails with a validation error when
    /// event, actor or role is empty; the detail payload is sanitized
    /// before it reaches the store.
    pub fn record(
        &self,
        event: &str,
        actor: &str,
        role: &str,
        patient_id: Option<&str>,
        detail: AuditDetail,
    ) -> Result<String> {
        if event.trim().is_empty() || actor.trim().is_empty() || role.trim().is_empty() {
            return Err(VaultError::validation(
                "event, actor and role are required",
            ));
        }

        let entry = AuditEntry {
            entry_id: String::new(), // assigned by the store
            event: event.to_string(),
            actor: actor.to_string(),
            role: role.to_string(),
            patient_id: patient_id.map(str::to_string),
            detail: sanitize_detail(detail),
            timestamp: Utc::now(),
        };

        let id = self.store.append(entry)?;
        Ok(id)
    }

    /// Fail-open variant for call sites where auditing must never block
    /// the primary operation. Failures are logged and acknowledged as
    /// `Dropped` rather than propagated.
    pub fn record_or_warn(
        &self,
        event: &str,
        actor: &str,
        role: &str,
        patient_id: Option<&str>,
        detail: AuditDetail,
    ) -> AuditWriteOutcome {
        match self.record(event, actor, role, patient_id, detail) {
            Ok(id) => AuditWriteOutcome::Recorded(id),
            Err(e) => {
                warn!(event, actor, error = %e, "audit write dropped");
                AuditWriteOutcome::Dropped
            }
        }
    }

    /// Query the trail, newest first, with paging.
    pub fn query(&self, query: &AuditQuery) -> AuditPage {
        let mut matches: Vec<AuditEntry> = self
            .store
            .snapshot()
            .into_iter()
            .filter(|e| Self::matches(e, query))
            .collect();

        matches.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        let total = matches.len();
        let entries: Vec<AuditEntry> = matches
            .into_iter()
            .skip(query.skip)
            .take(query.limit.unwrap_or(usize::MAX))
            .collect();

        AuditPage { total, entries }
    }

    /// Distinct event tags present in the trail, sorted.
    pub fn distinct_events(&self) -> Vec<String> {
        let mut events: Vec<String> = self
            .store
            .snapshot()
            .into_iter()
            .map(|e| e.event)
            .collect();
        events.sort();
        events.dedup();
        events
    }

    /// Aggregate counts: total, per-event, and the normalized status
    /// dimension (casing-insensitive; "failed" includes "error").
    pub fn stats(&self) -> AuditStats {
        let entries = self.store.snapshot();
        let total = entries.len();

        let mut counts: std::collections::HashMap<String, usize> = std::collections::HashMap::new();
        let (mut success, mut warning, mut failed) = (0, 0, 0);

        for entry in &entries {
            *counts.entry(entry.event.clone()).or_default() += 1;
            if let Some(status) = entry.detail.status() {
                match status.to_lowercase().as_str() {
                    "success" => success += 1,
                    "warning" => warning += 1,
                    "failed" | "error" => failed += 1,
                    _ => {}
                }
            }
        }

        let mut by_event: Vec<(String, usize)> = counts.into_iter().collect();
        by_event.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        AuditStats {
            total,
            by_event,
            success,
            warning,
            failed,
        }
    }

    /// Total number of entries
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// True when the trail holds no entries
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Export matching entries as CSV, newest first. Header is exactly
    /// `timestamp,event,actor,role,patient_id,detail`.
    pub fn export_csv(&self, query: &AuditQuery) -> String {
        let page = self.query(query);

        let mut out = String::from("timestamp,event,actor,role,patient_id,detail\n");
        for entry in &page.entries {
            let row = [
                entry.timestamp.to_rfc3339(),
                entry.event.clone(),
                entry.actor.clone(),
                entry.role.clone(),
                entry.patient_id.clone().unwrap_or_default(),
                entry.detail.display_string(),
            ];
            let escaped: Vec<String> = row.iter().map(|f| csv_field(f)).collect();
            out.push_str(&escaped.join(","));
            out.push('\n');
        }
        out
    }

    fn matches(entry: &AuditEntry, query: &AuditQuery) -> bool {
        if let Some(ref event) = query.event {
            if &entry.event != event {
                return false;
            }
        }
        if let Some(ref actor) = query.actor {
            if &entry.actor != actor {
                return false;
            }
        }
        if let Some(ref role) = query.role {
            if &entry.role != role {
                return false;
            }
        }
        if let Some(ref patient_id) = query.patient_id {
            if entry.patient_id.as_deref() != Some(patient_id.as_str()) {
                return false;
            }
        }
        if let Some(from) = query.from_ts {
            if entry.timestamp < from {
                return false;
            }
        }
        if let Some(to) = query.to_ts {
            if entry.timestamp > to {
                return false;
            }
        }
        if let Some(ref status) = query.status {
            match entry.detail.status() {
                Some(s) => {
                    if !status_matches(status, s) {
                        return false;
                    }
                }
                None => return false,
            }
        }
        if let Some(ref q) = query.q {
            let needle = q.to_lowercase();
            let mut haystacks = vec![
                entry.event.to_lowercase(),
                entry.actor.to_lowercase(),
                entry.role.to_lowercase(),
            ];
            if let AuditDetail::Structured(ref s) = entry.detail {
                if let Some(ref action) = s.action {
                    haystacks.push(action.to_lowercase());
                }
                if let Some(ref note) = s.note {
                    haystacks.push(note.to_lowercase());
                }
            }
            if !haystacks.iter().any(|h| h.contains(&needle)) {
                return false;
            }
        }
        true
    }
}

/// Normalized status comparison: "error" matches failed/error spellings,
/// everything else compares casing-insensitively.
fn status_matches(filter: &str, stored: &str) -> bool {
    let filter = filter.trim().to_lowercase();
    let stored = stored.to_lowercase();
    if filter == "error" {
        stored == "failed" || stored == "error"
    } else {
        stored == filter
    }
}

/// RFC-4180 field quoting
fn csv_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
