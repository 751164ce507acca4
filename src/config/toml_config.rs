use crate::adapters::http::HttpGeneratorConfig;
use crate::adapters::GenerationSource;
use crate::core::ConfigProvider;
use crate::domain::model::{OutputFormat, PatientCase};
use crate::utils::error::{Result, TriageError};
use crate::utils::validation::{self, Validate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

static ENV_VAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub model: ModelConfig,
    #[serde(default)]
    pub patient: PatientCase,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_model_id")]
    pub id: String,
    pub endpoint: Option<String>,
    pub response_file: Option<String>,
    pub api_token: Option<String>,
    pub max_new_tokens: Option<usize>,
    pub timeout_seconds: Option<u64>,
    pub retry_attempts: Option<u32>,
    pub retry_delay_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub output_path: String,
    #[serde(default)]
    pub output_formats: Vec<OutputFormat>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            output_formats: Vec::new(),
        }
    }
}

fn default_model_id() -> String {
    super::DEFAULT_MODEL_ID.to_string()
}

fn default_output_path() -> String {
    "./output".to_string()
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(TriageError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| TriageError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unset variables are left as written.
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_RE
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    /// The API token, unless it is an unresolved `${VAR}` placeholder.
    pub fn api_token(&self) -> Option<&str> {
        match self.model.api_token.as_deref() {
            Some(token) if ENV_VAR_RE.is_match(token) => {
                tracing::warn!("model.api_token references an unset environment variable, sending no token");
                None
            }
            Some(token) if !token.trim().is_empty() => Some(token),
            _ => None,
        }
    }

    pub fn max_new_tokens(&self) -> usize {
        self.model.max_new_tokens.unwrap_or(240)
    }

    pub fn generation_source(&self) -> GenerationSource {
        match &self.model.response_file {
            Some(path) => GenerationSource::Replay(PathBuf::from(path)),
            None => GenerationSource::Http(HttpGeneratorConfig {
                endpoint: self.model.endpoint.clone().unwrap_or_default(),
                api_token: self.api_token().map(str::to_string),
                max_new_tokens: self.max_new_tokens(),
                timeout_seconds: self.model.timeout_seconds.unwrap_or(120),
                retry_attempts: self.model.retry_attempts.unwrap_or(0),
                retry_delay_ms: self.model.retry_delay_seconds.unwrap_or(1) * 1000,
            }),
        }
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_generation_source(
            self.model.endpoint.as_deref(),
            self.model.response_file.as_deref(),
        )?;
        validation::validate_non_empty_string("model.id", &self.model.id)?;
        validation::validate_range("model.max_new_tokens", self.max_new_tokens(), 1, 4096)?;
        if let Some(timeout) = self.model.timeout_seconds {
            validation::validate_range("model.timeout_seconds", timeout, 1, 3600)?;
        }
        if let Some(retries) = self.model.retry_attempts {
            validation::validate_range("model.retry_attempts", retries, 0, 10)?;
        }
        validation::validate_path("output.output_path", &self.output.output_path)?;
        validation::validate_patient("patient", &self.patient)?;
        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn model_id(&self) -> &str {
        &self.model.id
    }

    fn patient(&self) -> &PatientCase {
        &self.patient
    }

    fn output_path(&self) -> &str {
        &self.output.output_path
    }

    fn output_formats(&self) -> &[OutputFormat] {
        &self.output.output_formats
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
