//! Redaction rule table
//!
//! The rule list is ordered: when two matches overlap, the earlier rule
//! wins and the later one is discarded. Later repair passes in the engine
//! pick up residue a higher-priority rule leaves behind (for example a
//! name match that swallows a trailing "Age" label).

use lazy_static::lazy_static;
use regex::Regex;

/// A single labeled redaction rule
pub struct RedactionRule {
    /// Label emitted into the `[REDACTED:<LABEL>]` token
    pub label: &'static str,
    /// Compiled case-insensitive pattern
    pub pattern: Regex,
}

impl RedactionRule {
    fn new(label: &'static str, pattern: &str) -> Self {
        Self {
            label,
            pattern: Regex::new(pattern).expect("invalid redaction rule pattern"),
        }
    }
}

lazy_static! {
    /// Identifier rules in declared priority order
    pub static ref RULES: Vec<RedactionRule> = vec![
        RedactionRule::new("NAME", r"(?i)(?:Patient\s+)?Name\s*:\s*[A-Za-z ,.'-]+"),
        RedactionRule::new("AGE", r"(?i)Age\s*:\s*\d{1,3}"),
        RedactionRule::new("GENDER", r"(?i)Gender\s*:\s*(?:Male|Female|Other|M|F)"),
        RedactionRule::new("DOB", r"(?i)DOB\s*:\s*\d{1,2}/\d{1,2}/\d{4}"),
        RedactionRule::new("PHONE", r"(?i)Phone\s*:\s*[\d\-() ]{7,15}"),
    ];

    /// A bracketed token immediately followed by `: <digits>` is the residue
    /// of a rule that swallowed a trailing "Age" label
    pub static ref REPAIR_AGE: Regex =
        Regex::new(r"\]\s*:\s*\d{1,3}").expect("invalid repair pattern");

    /// Leftover bare `Age ... <digits>` occurrences missed by the primary
    /// pass; the leading group stands in for a negative word-boundary
    pub static ref FALLBACK_AGE: Regex =
        Regex::new(r"(?i)(^|[^0-9A-Za-z_])Age\s*[:\-]?\s*\n?\s*\d{1,3}")
            .expect("invalid fallback pattern");

    /// Normalization: every token starts its own line
    pub static ref TOKEN_START: Regex =
        Regex::new(r"\s*\[REDACTED:").expect("invalid token-start pattern");

    /// Normalization: every token ends its line
    pub static ref TOKEN_END: Regex = Regex::new(r"\]\s*").expect("invalid token-end pattern");

    /// Normalization: collapse runs of blank lines
    pub static ref BLANK_RUN: Regex = Regex::new(r"\n{3,}").expect("invalid blank-run pattern");
}
