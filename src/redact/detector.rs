//! Advisory PHI span detection
//!
//! Finds likely identifying regions with byte offsets into the original
//! text, for debugging and review surfaces. Advisory only: a clean result
//! is not proof of a clean document; the redaction engine remains the
//! enforcement point.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

lazy_static! {
    static ref PHONE_LINE: Regex =
        Regex::new(r"(?im)^(.*Phone\s*:\s*.*)$").expect("invalid phone-line pattern");
    static ref SSN: Regex =
        Regex::new(r"\b\d{3}-\d{2}-\d{4}\b").expect("invalid ssn pattern");
    static ref DOB_LINE: Regex =
        Regex::new(r"(?im)^(.*DOB\s*:\s*.*)$").expect("invalid dob-line pattern");
    static ref NAME_LINE: Regex =
        Regex::new(r"(?im)^(.*Name\s*:\s*.*)$").expect("invalid name-line pattern");
}

/// Address keywords checked in order; the first hit flags its whole line
const ADDRESS_KEYWORDS: &[&str] = &[
    "Street",
    "St.",
    "Avenue",
    "Apt",
    "Rd",
    "Road",
    "Boulevard",
    "Blvd",
    "Lane",
    "Ln",
    "Suite",
];

/// Category of a detected span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhiField {
    Phone,
    Ssn,
    Dob,
    Name,
    Address,
}

/// A likely identifying region of the input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhiSpan {
    /// Detected category
    pub field: PhiField,
    /// Matched text
    pub value: String,
    /// Byte offset of the match start in the original text
    pub start: usize,
    /// Byte offset one past the match end
    pub end: usize,
}

/// Scan a narrative for likely identifying spans, deduplicated by
/// (start, end, field) and ordered as found.
pub fn detect_phi(text: &str) -> Vec<PhiSpan> {
    let mut items = Vec::new();

    for caps in PHONE_LINE.captures_iter(text) {
        if let Some(m) = caps.get(1) {
            items.push(PhiSpan {
                field: PhiField::Phone,
                value: m.as_str().to_string(),
                start: m.start(),
                end: m.end(),
            });
        }
    }

    for m in SSN.find_iter(text) {
        items.push(PhiSpan {
            field: PhiField::Ssn,
            value: m.as_str().to_string(),
            start: m.start(),
            end: m.end(),
        });
    }

    for caps in DOB_LINE.captures_iter(text) {
        if let Some(m) = caps.get(1) {
            items.push(PhiSpan {
                field: PhiField::Dob,
                value: m.as_str().to_string(),
                start: m.start(),
                end: m.end(),
            });
        }
    }

    for caps in NAME_LINE.captures_iter(text) {
        if let Some(m) = caps.get(1) {
            items.push(PhiSpan {
                field: PhiField::Name,
                value: m.as_str().to_string(),
                start: m.start(),
                end: m.end(),
            });
        }
    }

    // Best-effort address detection: first keyword hit flags its line
    for kw in ADDRESS_KEYWORDS {
        if let Some(idx) = text.find(kw) {
            let start = text[..idx].rfind('\n').map(|p| p + 1).unwrap_or(0);
            let end = text[idx..]
                .find('\n')
                .map(|p| idx + p)
                .unwrap_or(text.len());
            items.push(PhiSpan {
                field: PhiField::Address,
                value: text[start..end].trim().to_string(),
                start,
                end,
            });
            break;
        }
    }

    let mut seen = HashSet::new();
    items.retain(|it| seen.insert((it.start, it.end, it.field)));
    items
}
