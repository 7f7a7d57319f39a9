//! Rule-based PHI redaction
//!
//! Pure, deterministic text sanitization. A single scan over the input
//! produces non-overlapping labeled spans ordered by rule priority then
//! position, followed by one substitution pass, a residue-repair pass, an
//! age fallback pass and whitespace normalization.
//!
//! The rule set is heuristic, not a completeness guarantee: absence of a
//! match is never proof of absence of identifying content. `redact` is
//! idempotent and never fails.

mod rules;

pub mod detector;

#[cfg(test)]
mod tests;

pub use detector::{detect_phi, PhiField, PhiSpan};

use rules::{BLANK_RUN, FALLBACK_AGE, REPAIR_AGE, RULES, TOKEN_END, TOKEN_START};

/// A labeled region of input text scheduled for substitution
#[derive(Debug, Clone, Copy)]
struct LabeledSpan {
    start: usize,
    end: usize,
    label: &'static str,
}

impl LabeledSpan {
    fn overlaps(&self, other: &LabeledSpan) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Collect non-overlapping spans: rules are visited in priority order and a
/// match is dropped when it overlaps a span kept by an earlier rule.
fn labeled_spans(text: &str) -> Vec<LabeledSpan> {
    let mut kept: Vec<LabeledSpan> = Vec::new();

    for rule in RULES.iter() {
        for m in rule.pattern.find_iter(text) {
            let candidate = LabeledSpan {
                start: m.start(),
                end: m.end(),
                label: rule.label,
            };
            if !kept.iter().any(|s| s.overlaps(&candidate)) {
                kept.push(candidate);
            }
        }
    }

    kept.sort_by_key(|s| s.start);
    kept
}

/// Replace every identifier match with a `[REDACTED:<LABEL>]` token and
/// normalize the result. Idempotent: `redact(redact(x)) == redact(x)`.
pub fn redact(text: &str) -> String {
    let spans = labeled_spans(text);

    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for span in &spans {
        out.push_str(&text[cursor..span.start]);
        out.push_str("[REDACTED:");
        out.push_str(span.label);
        out.push(']');
        cursor = span.end;
    }
    out.push_str(&text[cursor..]);

    // Residue of a higher-priority rule swallowing a trailing "Age" label,
    // e.g. "[REDACTED:NAME] : 29"
    let out = REPAIR_AGE.replace_all(&out, "]\n[REDACTED:AGE]");

    // Loose "Age 29" style leftovers the primary pass never targets
    let out = FALLBACK_AGE.replace_all(&out, |caps: &regex::Captures| {
        format!("{}[REDACTED:AGE]", &caps[1])
    });

    // Force clean line structure: one token per line, at most one blank line
    let out = TOKEN_START.replace_all(&out, "\n[REDACTED:");
    let out = TOKEN_END.replace_all(&out, "]\n");
    let out = BLANK_RUN.replace_all(&out, "\n\n");

    out.trim().to_string()
}

/// Count redaction tokens in a piece of text
pub fn redaction_count(text: &str) -> usize {
    text.matches("[REDACTED:").count()
}
