//! Extraction of a [`StructuredAnswer`] from free model output.
//!
//! Every field is best-effort: a missing marker or malformed numbering leaves the
//! field absent and never stops the other fields from being extracted.

use crate::domain::model::{FieldStatus, ParseDiagnostics, RiskLevel, StructuredAnswer, Urgency};
use once_cell::sync::Lazy;
use regex::Regex;

pub const RISK_LEVEL_MARKER: &str = "Risk Level:";
pub const URGENCY_MARKER: &str = "Urgency:";
pub const CONDITIONS_MARKER: &str = "Top 3 Conditions:";
pub const TREATMENT_MARKER: &str = "Treatment:";

/// Headings that close the treatment block.
pub const TREATMENT_TERMINATORS: [&str; 6] = [
    "Next Steps:",
    "Follow-up:",
    "Patient Education:",
    "Medication:",
    "Referral:",
    "**My thinking process:**",
];

pub const MAX_CONDITIONS: usize = 3;
pub const MAX_TREATMENTS: usize = 2;

static RISK_LEVEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)Risk Level:\s*(?:[^a-zA-Z0-9\s]*\s*)?(Low|Medium|High)(?:\s*[^a-zA-Z0-9\s]*)?")
        .expect("risk level pattern is valid")
});

static URGENCY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)Urgency:\s*(?:[^a-zA-Z0-9\s]*\s*)?(Routine|Urgent|Emergency)(?:\s*[^a-zA-Z0-9\s]*)?")
        .expect("urgency pattern is valid")
});

static NUMBERED_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\d+\.\s*(.+)").expect("numbered line pattern is valid"));

pub fn parse(raw_text: &str) -> StructuredAnswer {
    parse_with_diagnostics(raw_text).0
}

pub fn parse_with_diagnostics(raw_text: &str) -> (StructuredAnswer, ParseDiagnostics) {
    let (working, anchored) = working_text(raw_text);

    let risk_level = RISK_LEVEL_RE
        .captures(working)
        .and_then(|caps| RiskLevel::from_token(&caps[1]));
    let urgency = URGENCY_RE
        .captures(working)
        .and_then(|caps| Urgency::from_token(&caps[1]));

    let conditions_at = working.find(CONDITIONS_MARKER);
    let treatment_at = working.find(TREATMENT_MARKER);

    let conditions = conditions_at.map(|start| {
        let from = start + CONDITIONS_MARKER.len();
        let to = treatment_at.unwrap_or(working.len());
        // a treatment heading placed before the conditions heading leaves nothing between them
        let block = if to >= from { &working[from..to] } else { "" };
        numbered_lines(block.trim(), MAX_CONDITIONS)
    });

    let treatments = treatment_at.map(|start| {
        let section = working[start + TREATMENT_MARKER.len()..].trim();
        numbered_lines(truncate_at_terminator(section).trim(), MAX_TREATMENTS)
    });

    let diagnostics = ParseDiagnostics {
        anchored,
        risk_level: marker_status(working, RISK_LEVEL_MARKER, risk_level.is_some()),
        urgency: marker_status(working, URGENCY_MARKER, urgency.is_some()),
        conditions: list_status(conditions.as_deref()),
        treatments: list_status(treatments.as_deref()),
    };

    let answer = StructuredAnswer {
        risk_level,
        urgency,
        conditions: conditions.unwrap_or_default(),
        treatments: treatments.unwrap_or_default(),
    };

    (answer, diagnostics)
}

/// Slice starting at the "Risk Level:" marker, or the whole trimmed input when it is absent.
fn working_text(raw_text: &str) -> (&str, bool) {
    let trimmed = raw_text.trim();
    match trimmed.find(RISK_LEVEL_MARKER) {
        Some(start) => (trimmed[start..].trim(), true),
        None => (trimmed, false),
    }
}

fn truncate_at_terminator(section: &str) -> &str {
    let end = TREATMENT_TERMINATORS
        .iter()
        .filter_map(|marker| section.find(marker))
        .min()
        .unwrap_or(section.len());
    &section[..end]
}

fn numbered_lines(block: &str, limit: usize) -> Vec<String> {
    block
        .split('\n')
        .filter_map(|line| NUMBERED_LINE_RE.captures(line))
        .map(|caps| caps[1].trim().to_string())
        .filter(|content| !content.is_empty())
        .take(limit)
        .collect()
}

fn marker_status(working: &str, marker: &str, matched: bool) -> FieldStatus {
    if matched {
        FieldStatus::Found
    } else if working.to_lowercase().contains(&marker.to_lowercase()) {
        FieldStatus::NoValidContent
    } else {
        FieldStatus::MarkerMissing
    }
}

fn list_status(entries: Option<&[String]>) -> FieldStatus {
    match entries {
        None => FieldStatus::MarkerMissing,
        Some([]) => FieldStatus::NoValidContent,
        Some(_) => FieldStatus::Found,
    }
}
