use crate::domain::model::PatientCase;
use crate::utils::error::{Result, TriageError};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(TriageError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(TriageError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(TriageError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(TriageError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(TriageError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(TriageError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(TriageError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// Exactly one generation source must be configured: a live endpoint or a saved response.
pub fn validate_generation_source(endpoint: Option<&str>, response_file: Option<&str>) -> Result<()> {
    match (endpoint, response_file) {
        (Some(url), None) => validate_url("model.endpoint", url),
        (None, Some(path)) => validate_path("model.response_file", path),
        (Some(_), Some(_)) => Err(TriageError::ConfigValidationError {
            field: "model".to_string(),
            message: "endpoint and response_file are mutually exclusive".to_string(),
        }),
        (None, None) => Err(TriageError::MissingConfigError {
            field: "model.endpoint or model.response_file".to_string(),
        }),
    }
}

pub fn validate_patient(field_prefix: &str, patient: &PatientCase) -> Result<()> {
    validate_range(&format!("{}.age", field_prefix), patient.age, 0, 130)?;
    validate_non_empty_string(&format!("{}.sex", field_prefix), &patient.sex)?;
    validate_non_empty_string(&format!("{}.symptoms", field_prefix), &patient.symptoms)?;
    Ok(())
}
