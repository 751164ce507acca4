use crate::adapters::http::HttpGeneratorConfig;
use crate::adapters::GenerationSource;
use crate::core::ConfigProvider;
use crate::domain::model::{OutputFormat, PatientCase};
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};
use super::DEFAULT_MODEL_ID;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "triage-extract")]
#[command(about = "Classify one patient with a text-generation model and extract the structured triage answer")]
pub struct CliConfig {
    /// Text-generation endpoint (text-generation-inference style `POST`)
    #[arg(long, env = "TRIAGE_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Parse a saved model response instead of calling an endpoint
    #[arg(long)]
    pub response_file: Option<String>,

    #[arg(long, default_value = DEFAULT_MODEL_ID)]
    pub model_id: String,

    #[arg(long, env = "HF_API_TOKEN", hide_env_values = true)]
    #[serde(skip_serializing)]
    pub api_token: Option<String>,

    #[arg(long, default_value = "240")]
    pub max_new_tokens: usize,

    #[arg(long, default_value = "120")]
    pub timeout_seconds: u64,

    #[arg(long, default_value = "0")]
    pub retry_attempts: u32,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    /// Report files to write: text, json
    #[arg(long, value_delimiter = ',')]
    pub output_formats: Vec<OutputFormat>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[arg(skip)]
    pub patient: PatientCase,
}

impl CliConfig {
    /// The endpoint to call. A response file takes priority, so an endpoint picked up
    /// from `TRIAGE_ENDPOINT` does not get in the way of replaying.
    pub fn active_endpoint(&self) -> Option<&str> {
        match self.response_file {
            Some(_) => None,
            None => self.endpoint.as_deref(),
        }
    }

    pub fn generation_source(&self) -> GenerationSource {
        match &self.response_file {
            Some(path) => GenerationSource::Replay(PathBuf::from(path)),
            None => GenerationSource::Http(HttpGeneratorConfig {
                endpoint: self.active_endpoint().unwrap_or_default().to_string(),
                api_token: self.api_token.clone(),
                max_new_tokens: self.max_new_tokens,
                timeout_seconds: self.timeout_seconds,
                retry_attempts: self.retry_attempts,
                retry_delay_ms: 1000,
            }),
        }
    }
}

impl ConfigProvider for CliConfig {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn patient(&self) -> &PatientCase {
        &self.patient
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_formats(&self) -> &[OutputFormat] {
        &self.output_formats
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_generation_source(self.active_endpoint(), self.response_file.as_deref())?;
        validation::validate_non_empty_string("model_id", &self.model_id)?;
        validation::validate_range("max_new_tokens", self.max_new_tokens, 1, 4096)?;
        validation::validate_range("timeout_seconds", self.timeout_seconds, 1, 3600)?;
        validation::validate_range("retry_attempts", self.retry_attempts, 0, 10)?;
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_patient("patient", &self.patient)?;
        Ok(())
    }
}
