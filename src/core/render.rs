use crate::core::parser::{CONDITIONS_MARKER, RISK_LEVEL_MARKER, TREATMENT_MARKER, URGENCY_MARKER};
use crate::domain::model::{FieldStatus, ParseDiagnostics, StructuredAnswer, TriageReport};
use crate::utils::error::Result;
use std::fmt::Write;

impl StructuredAnswer {
    /// Re-serializes the answer in the response template the model is asked to follow.
    /// Parsing the result yields the same answer.
    pub fn to_template(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{} {}", RISK_LEVEL_MARKER, opt(self.risk_level.map(|r| r.as_str())));
        let _ = writeln!(out, "{} {}", URGENCY_MARKER, opt(self.urgency.map(|u| u.as_str())));
        let _ = writeln!(out, "{}", CONDITIONS_MARKER);
        push_numbered(&mut out, &self.conditions);
        let _ = writeln!(out, "{}", TREATMENT_MARKER);
        push_numbered(&mut out, &self.treatments);
        out.trim_end().to_string()
    }
}

fn opt(value: Option<&'static str>) -> &'static str {
    value.unwrap_or("")
}

fn push_numbered(out: &mut String, entries: &[String]) {
    for (i, entry) in entries.iter().enumerate() {
        let _ = writeln!(out, "{}. {}", i + 1, entry);
    }
}

/// Console view of an answer. Absent fields read "Not Found" when their heading was
/// missing and "Not Found or incomplete." when the heading was there without usable entries.
pub fn render_console(answer: &StructuredAnswer, diagnostics: &ParseDiagnostics) -> String {
    let mut out = String::from("Diagnosis:\n");

    match answer.risk_level {
        Some(risk) => {
            let _ = writeln!(out, "Risk Level: {}", risk);
        }
        None => out.push_str("Risk Level: Not Found\n"),
    }

    match answer.urgency {
        Some(urgency) => {
            let _ = writeln!(out, "Urgency: {}", urgency);
        }
        None => out.push_str("Urgency: Not Found\n"),
    }

    if diagnostics.conditions == FieldStatus::MarkerMissing {
        out.push_str("Top 3 Conditions: Not Found\n");
    } else {
        out.push_str("Highly probable conditions:\n");
        if answer.conditions.is_empty() {
            out.push_str("Conditions: Not Found or incomplete.\n");
        } else {
            push_numbered(&mut out, &answer.conditions);
        }
    }

    if diagnostics.treatments == FieldStatus::MarkerMissing {
        out.push_str("Treatment: Not Found\n");
    } else {
        out.push_str("Recommended course of action:\n");
        if answer.treatments.is_empty() {
            out.push_str("Treatment: Not Found or incomplete.\n");
        } else {
            push_numbered(&mut out, &answer.treatments);
        }
    }

    out
}

pub fn render_text_report(report: &TriageReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Model: {}", report.model_id);
    let _ = writeln!(out, "Generator: {}", report.generator);
    let _ = writeln!(out, "Generated at: {}", report.generated_at.to_rfc3339());
    let _ = writeln!(
        out,
        "Patient: {}, {}, {} (travel: {})",
        report.patient.age, report.patient.sex, report.patient.country, report.patient.travel_history
    );
    out.push('\n');
    out.push_str(&render_console(&report.answer, &report.diagnostics));
    out.push_str("\nRaw response:\n");
    out.push_str(&report.raw_response);
    out.push('\n');
    out
}

pub fn render_json(report: &TriageReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}
