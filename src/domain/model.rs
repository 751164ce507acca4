use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Case-insensitive match on the three allowed tokens.
    pub fn from_token(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "low" => Some(RiskLevel::Low),
            "medium" => Some(RiskLevel::Medium),
            "high" => Some(RiskLevel::High),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Urgency {
    Routine,
    Urgent,
    Emergency,
}

impl Urgency {
    pub fn from_token(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "routine" => Some(Urgency::Routine),
            "urgent" => Some(Urgency::Urgent),
            "emergency" => Some(Urgency::Emergency),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Routine => "Routine",
            Urgency::Urgent => "Urgent",
            Urgency::Emergency => "Emergency",
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields extracted from one model response. Each field is independently optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredAnswer {
    pub risk_level: Option<RiskLevel>,
    pub urgency: Option<Urgency>,
    /// At most three entries, in the order they appeared.
    pub conditions: Vec<String>,
    /// At most two entries, in the order they appeared.
    pub treatments: Vec<String>,
}

impl StructuredAnswer {
    pub fn is_empty(&self) -> bool {
        self.risk_level.is_none()
            && self.urgency.is_none()
            && self.conditions.is_empty()
            && self.treatments.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldStatus {
    Found,
    MarkerMissing,
    NoValidContent,
}

/// How each field of a [`StructuredAnswer`] was (or was not) obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseDiagnostics {
    /// Whether the "Risk Level:" start marker was present in the response.
    pub anchored: bool,
    pub risk_level: FieldStatus,
    pub urgency: FieldStatus,
    pub conditions: FieldStatus,
    pub treatments: FieldStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatientCase {
    pub age: u32,
    pub sex: String,
    pub symptoms: String,
    pub country: String,
    pub travel_history: String,
}

impl Default for PatientCase {
    fn default() -> Self {
        Self {
            age: 28,
            sex: "Female".to_string(),
            symptoms: "Severe sore throat, difficulty swallowing, swollen tonsils with white spots, fever (102°F) for 2 days".to_string(),
            country: "Canada".to_string(),
            travel_history: "No".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub text: String,
    pub generator: String,
    pub generated_at: DateTime<Utc>,
}

impl GenerationResult {
    pub fn new(text: String, generator: impl Into<String>) -> Self {
        Self {
            text,
            generator: generator.into(),
            generated_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriageReport {
    pub model_id: String,
    pub generator: String,
    pub generated_at: DateTime<Utc>,
    pub patient: PatientCase,
    pub answer: StructuredAnswer,
    pub diagnostics: ParseDiagnostics,
    pub raw_response: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn file_name(&self) -> &'static str {
        match self {
            OutputFormat::Text => "triage_report.txt",
            OutputFormat::Json => "triage_report.json",
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("Unsupported output format: {} (valid: text, json)", other)),
        }
    }
}
