//! Rule-based risk heuristic
//!
//! Deterministic analysis of one de-identified clinical text. The input
//! is re-redacted before any keyword matching.

use std::collections::BTreeSet;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::redact::redact;

/// Coarse risk band, ordered
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    fn as_upper(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        }
    }
}

/// Outcome of the risk heuristic
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAnalysis {
    pub risk_level: RiskLevel,
    pub explanation: String,
    pub possible_conditions: Vec<String>,
    pub red_flags: Vec<String>,
    pub recommendations: Vec<String>,
}

const RED_FLAG_KEYWORDS: [&str; 7] = [
    "chest pain",
    "shortness of breath",
    "syncope",
    "hemoptysis",
    "severe bleeding",
    "loss of consciousness",
    "sudden weakness",
];

lazy_static! {
    static ref INFECTION: Regex =
        Regex::new(r"fever|sepsis|infection").expect("invalid infection pattern");
    static ref DYSPNEA: Regex =
        Regex::new(r"shortness of breath|dyspnea|sob").expect("invalid dyspnea pattern");
    static ref HYPERTENSION: Regex =
        Regex::new(r"hypertension|history of hypertension|htn").expect("invalid htn pattern");
    static ref DIABETES: Regex = Regex::new(r"diabetes|dm\b").expect("invalid diabetes pattern");
    static ref ACUTE: Regex =
        Regex::new(r"unstable|critical|severe|hemodynamic|shock").expect("invalid acuity pattern");
    static ref WATCH: Regex =
        Regex::new(r"concern|watch|monitor|moderate").expect("invalid watch pattern");
}

/// Analyze a de-identified clinical text.
pub fn analyze_risk(text: &str) -> RiskAnalysis {
    let txt = redact(text).to_lowercase();

    let red_flags: Vec<String> = RED_FLAG_KEYWORDS
        .iter()
        .filter(|kw| txt.contains(**kw))
        .map(|kw| kw.to_string())
        .collect();

    let mut conditions: BTreeSet<&str> = BTreeSet::new();
    if txt.contains("chest pain") || txt.contains("radiating") || txt.contains("left arm") {
        conditions.insert("Acute coronary syndrome / myocardial ischemia");
    }
    if INFECTION.is_match(&txt) {
        conditions.insert("Infectious process / sepsis");
    }
    if DYSPNEA.is_match(&txt) {
        conditions.insert("Heart failure or pulmonary embolism");
    }
    if HYPERTENSION.is_match(&txt) {
        conditions.insert("Hypertensive disease with cardiovascular risk");
    }
    if DIABETES.is_match(&txt) {
        conditions.insert("Diabetes-related complications");
    }

    let risk_level = if !red_flags.is_empty() || ACUTE.is_match(&txt) {
        RiskLevel::High
    } else if WATCH.is_match(&txt) || conditions.len() >= 2 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    };

    let explanation = format!(
        "This case is assessed as {} risk based on present red flags and clinical features.",
        risk_level.as_upper()
    );

    let mut recommendations: Vec<String> = Vec::new();
    if txt.contains("chest pain") || txt.contains("left arm") {
        recommendations.push(
            "Immediate ECG and cardiac enzyme testing; consider urgent cardiology evaluation."
                .to_string(),
        );
    }
    if txt.contains("shortness of breath") {
        recommendations.push(
            "Evaluate oxygenation, chest imaging, and consider pulmonary embolism workup if indicated."
                .to_string(),
        );
    }
    if txt.contains("fever") || txt.contains("sepsis") {
        recommendations.push(
            "Obtain blood cultures, start empiric antibiotics as per local protocol, and monitor vitals closely."
                .to_string(),
        );
    }
    if recommendations.is_empty() {
        recommendations.push(
            "Perform focused clinical assessment and baseline investigations (vitals, ECG, basic labs) as clinically indicated."
                .to_string(),
        );
    }

    let possible_conditions = if conditions.is_empty() {
        vec!["No specific likely conditions identified from de-identified text".to_string()]
    } else {
        conditions.into_iter().map(String::from).collect()
    };

    let red_flags = if red_flags.is_empty() {
        vec!["No immediate red flags detected".to_string()]
    } else {
        red_flags
    };

    RiskAnalysis {
        risk_level,
        explanation,
        possible_conditions,
        red_flags,
        recommendations,
    }
}
