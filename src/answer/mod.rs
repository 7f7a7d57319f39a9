//! Deterministic answer engine
//!
//! Produces a non-diagnostic clinical-style summary from retrieved
//! documents using a fixed keyword battery. No model call, no network,
//! same input always gives the same answer. Every retrieved document is
//! re-redacted before it contributes to the context, so an identifier
//! that slipped past an upstream boundary still cannot surface here.

pub mod risk;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::redact::redact;

/// Fixed non-diagnostic disclaimer attached to every non-empty answer.
const ANSWER_NOTE: &str = "This summary is informational only and is not a diagnosis or medical advice. \
     Consider clinical correlation, physical examination, and appropriate diagnostic testing.";

const EMPTY_NOTE: &str = "This is an informational summary only and does not constitute medical advice or a diagnosis.";

const EMPTY_SUMMARY: &str = "No relevant patient information found in the uploaded records.";

const FALLBACK_SUMMARY: &str =
    "Relevant findings were noted in the available records that may relate to the query.";

/// A PHI-safe, non-diagnostic answer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClinicalAnswer {
    /// Short narrative, non-diagnostic
    pub summary: String,
    /// Observed or recurring findings, sorted
    pub patterns: Vec<String>,
    /// Findings that may warrant urgent evaluation, sorted
    pub red_flags: Vec<String>,
    /// Neutral follow-up considerations, sorted
    pub follow_up: Vec<String>,
    /// Non-diagnostic disclaimer
    pub note: String,
}

fn any_token(context: &str, tokens: &[&str]) -> bool {
    tokens.iter().any(|t| context.contains(t))
}

/// Generate an answer for `question` over the retrieved documents.
///
/// With no documents the answer is a fixed "nothing found" response.
/// Otherwise each document is redacted, the redacted texts are joined and
/// lowercased into one context string, and the keyword battery below
/// decides the summary sentences, patterns, red flags and follow-ups.
pub fn generate_answer(question: &str, retrieved_docs: &[String]) -> ClinicalAnswer {
    if retrieved_docs.is_empty() {
        return ClinicalAnswer {
            summary: EMPTY_SUMMARY.to_string(),
            patterns: Vec::new(),
            red_flags: Vec::new(),
            follow_up: Vec::new(),
            note: EMPTY_NOTE.to_string(),
        };
    }

    let cleaned: Vec<String> = retrieved_docs.iter().map(|d| redact(d)).collect();
    let context = cleaned.join(" ").to_lowercase();
    let q = question.to_lowercase();

    let mut summary_parts: Vec<&str> = Vec::new();
    let mut patterns: BTreeSet<&str> = BTreeSet::new();
    let mut red_flags: BTreeSet<&str> = BTreeSet::new();
    let mut follow_up: BTreeSet<&str> = BTreeSet::new();

    // Chest pain / cardiopulmonary concerns
    if q.contains("chest pain") || q.contains("chest") {
        if context.contains("chest pain") || context.contains("chest discomfort") {
            summary_parts
                .push("Chest pain or chest discomfort is documented in the available records.");
            patterns.insert("chest pain documented");
        }

        if any_token(
            &context,
            &["shortness of breath", "sob", "dyspnea", "difficulty breathing"],
        ) {
            patterns.insert("breathing difficulty noted");
            red_flags.insert("new or worsening shortness of breath");
        }

        if any_token(
            &context,
            &["radiat", "radiating", "left arm", "jaw pain", "neck pain"],
        ) {
            patterns.insert("pain radiating to arm/jaw/neck");
            red_flags.insert("pain radiating to arm/jaw/neck");
        }

        if any_token(
            &context,
            &["sweat", "diaphor", "lightheaded", "syncope", "collapse", "near syncope"],
        ) {
            red_flags.insert("sudden diaphoresis, fainting, or lightheadedness");
        }

        if any_token(
            &context,
            &["palpitation", "irregular heartbeat", "tachycardia"],
        ) {
            patterns.insert("palpitations or irregular heartbeat");
            follow_up.insert("consider cardiac monitoring or rhythm assessment");
        }

        follow_up.insert("consider ECG and vital signs assessment");
        follow_up.insert("consider urgent evaluation if red flags are present");
    }

    // Breathing / respiratory concerns
    if q.contains("breath") || q.contains("breathing") || q.contains("dyspnea") || q.contains("sob")
    {
        if any_token(
            &context,
            &[
                "shortness of breath",
                "dyspnea",
                "difficulty breathing",
                "wheeze",
                "wheezing",
                "cough",
            ],
        ) {
            summary_parts
                .push("Breathing difficulty or dyspnea is documented in the available records.");
            patterns.insert("breathing difficulty noted");
        }

        if any_token(
            &context,
            &["oxygen saturation", "o2 sat", "o2sat", "saturation"],
        ) {
            patterns.insert("oxygen saturation recorded");
            follow_up.insert("review oxygen saturation and vital signs");
        }

        if any_token(&context, &["severe", "sudden", "worse", "worsening"]) {
            red_flags.insert("new or rapidly worsening shortness of breath");
        }

        follow_up.insert("consider pulse oximetry and respiratory assessment");
        follow_up.insert("consider chest auscultation and imaging if clinically indicated");
    }

    if q.contains("fever") || q.contains("temperature") {
        if context.contains("fever") {
            patterns.insert("fever documented");
            follow_up.insert("consider infectious workup and monitoring");
        }
    }

    if q.contains("headache") {
        if context.contains("headache") {
            patterns.insert("headache documented");
            follow_up
                .insert("consider neuro exam and pain management; escalate if new focal deficits");
        }
    }

    let summary = if summary_parts.is_empty() {
        FALLBACK_SUMMARY.to_string()
    } else {
        summary_parts.join(" ")
    };

    ClinicalAnswer {
        summary,
        patterns: patterns.into_iter().map(String::from).collect(),
        red_flags: red_flags.into_iter().map(String::from).collect(),
        follow_up: follow_up.into_iter().map(String::from).collect(),
        note: ANSWER_NOTE.to_string(),
    }
}
