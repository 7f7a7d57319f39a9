//! Heuristic metadata extraction from clinical narratives
//!
//! Derives a small set of non-identifying fields from free text. Every
//! field is optional and absence of a match is never an error.


use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref AGE_FIELD: Regex = Regex::new(r"(?i)Age:\s*(\d+)").expect("invalid age pattern");
    static ref BIRTH_YEAR: Regex =
        Regex::new(r"(19\d{2}|20\d{2})").expect("invalid year pattern");
    static ref BLOOD_PRESSURE: Regex =
        Regex::new(r"(?i)\b(?:BP|Blood Pressure)[: ]+\s*(\d{2,3}/\d{2,3})")
            .expect("invalid bp pattern");
    static ref HISTORY_LABEL: Regex =
        Regex::new(r"(?i)Past Medical History:\s*(.+?)(?:\n|$)").expect("invalid history pattern");
    static ref HISTORY_FREE: Regex =
        Regex::new(r"(?i)(?:History of|Hx[:\s]+)\s*([A-Za-z0-9\- ,/]+?)(?:[.,\n]|$)")
            .expect("invalid free-history pattern");
    static ref DIAGNOSIS: Regex =
        Regex::new(r"(?i)Primary Diagnosis:\s*(.+)").expect("invalid diagnosis pattern");
}

/// Condition vocabulary for the last-resort history tier
const CONDITION_VOCABULARY: &[&str] = &[
    "hypertension",
    "diabetes",
    "asthma",
    "copd",
    "cancer",
    "stroke",
];

/// Non-identifying fields inferred from a narrative
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedMetadata {
    /// Numeric age, direct or inferred from a birth year
    pub age: Option<u32>,
    /// Systolic/diastolic reading as written, e.g. "120/80"
    pub blood_pressure: Option<String>,
    /// Past medical history summary
    pub past_history: Option<String>,
    /// Primary diagnosis, when labeled
    pub diagnosis: Option<String>,
}

impl ExtractedMetadata {
    /// True when no field matched
    pub fn is_empty(&self) -> bool {
        self.age.is_none()
            && self.blood_pressure.is_none()
            && self.past_history.is_none()
            && self.diagnosis.is_none()
    }
}

/// Derive metadata from a narrative. `current_year` anchors birth-year
/// based age inference so results stay reproducible in tests.
pub fn extract_metadata(text: &str, current_year: i32) -> ExtractedMetadata {
    ExtractedMetadata {
        age: extract_age(text, current_year),
        blood_pressure: BLOOD_PRESSURE
            .captures(text)
            .map(|c| c[1].to_string()),
        past_history: extract_past_history(text),
        diagnosis: DIAGNOSIS
            .captures(text)
            .map(|c| c[1].trim().to_string()),
    }
}

/// Direct numeric age wins; otherwise a 4-digit year is treated as a birth
/// year and subtracted from the current year.
fn extract_age(text: &str, current_year: i32) -> Option<u32> {
    if let Some(caps) = AGE_FIELD.captures(text) {
        if let Ok(age) = caps[1].parse::<u32>() {
            return Some(age);
        }
    }

    let caps = BIRTH_YEAR.captures(text)?;
    let birth_year: i32 = caps[1].parse().ok()?;
    let age = current_year - birth_year;
    (age >= 0).then_some(age as u32)
}

/// Strict tier order: explicit label, then free-text phrasing, then the
/// condition vocabulary (all matches joined).
fn extract_past_history(text: &str) -> Option<String> {
    if let Some(caps) = HISTORY_LABEL.captures(text) {
        return Some(caps[1].trim().to_string());
    }

    if let Some(caps) = HISTORY_FREE.captures(text) {
        return Some(caps[1].trim().to_string());
    }

    let lower = text.to_lowercase();
    let found: Vec<&str> = CONDITION_VOCABULARY
        .iter()
        .copied()
        .filter(|kw| contains_word(&lower, kw))
        .collect();

    (!found.is_empty()).then(|| found.join(", "))
}

/// Whole-word containment over lowercased text
fn contains_word(haystack: &str, word: &str) -> bool {
    haystack.match_indices(word).any(|(idx, _)| {
        let before_ok = haystack[..idx]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        let after_ok = haystack[idx + word.len()..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_alphanumeric());
        before_ok && after_ok
    })
}
