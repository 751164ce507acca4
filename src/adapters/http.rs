use crate::domain::ports::Generator;
use crate::utils::error::{Result, TriageError};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpGeneratorConfig {
    pub endpoint: String,
    pub api_token: Option<String>,
    pub max_new_tokens: usize,
    pub timeout_seconds: u64,
    pub retry_attempts: u32,
    pub retry_delay_ms: u64,
}

impl HttpGeneratorConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_token: None,
            max_new_tokens: 240,
            timeout_seconds: 120,
            retry_attempts: 0,
            retry_delay_ms: 1000,
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    inputs: &'a str,
    parameters: GenerateParameters,
}

/// Greedy decoding, only the continuation is returned.
#[derive(Debug, Serialize)]
struct GenerateParameters {
    max_new_tokens: usize,
    do_sample: bool,
    return_full_text: bool,
}

#[derive(Debug, Deserialize)]
struct GeneratedText {
    generated_text: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GenerateResponse {
    Batch(Vec<GeneratedText>),
    Single(GeneratedText),
}

impl GenerateResponse {
    fn into_text(self) -> Option<String> {
        match self {
            GenerateResponse::Batch(items) => items.into_iter().next().map(|g| g.generated_text),
            GenerateResponse::Single(g) => Some(g.generated_text),
        }
    }
}

/// Calls a text-generation-inference style `POST` endpoint.
pub struct HttpGenerator {
    config: HttpGeneratorConfig,
    client: Client,
}

impl HttpGenerator {
    pub fn new(config: HttpGeneratorConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self { config, client })
    }

    async fn attempt(&self, prompt: &str) -> std::result::Result<String, AttemptError> {
        let body = GenerateRequest {
            inputs: prompt,
            parameters: GenerateParameters {
                max_new_tokens: self.config.max_new_tokens,
                do_sample: false,
                return_full_text: false,
            },
        };

        let mut request = self.client.post(&self.config.endpoint).json(&body);
        if let Some(token) = &self.config.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(AttemptError::Retryable)?;
        let status = response.status();
        tracing::debug!("Generation endpoint responded with {}", status);

        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            let err = TriageError::GenerationError {
                message: format!("HTTP {}: {}", status, detail.trim()),
            };
            return if is_retryable_status(status) {
                Err(AttemptError::RetryableStatus(err))
            } else {
                Err(AttemptError::Fatal(err))
            };
        }

        let parsed: GenerateResponse = response.json().await.map_err(|e| {
            AttemptError::Fatal(TriageError::GenerationError {
                message: format!("Unexpected response body: {}", e),
            })
        })?;

        parsed
            .into_text()
            .map(|text| text.trim().to_string())
            .ok_or_else(|| {
                AttemptError::Fatal(TriageError::GenerationError {
                    message: "Response contained no generated text".to_string(),
                })
            })
    }
}

enum AttemptError {
    Retryable(reqwest::Error),
    RetryableStatus(TriageError),
    Fatal(TriageError),
}

fn is_retryable_status(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}

#[async_trait]
impl Generator for HttpGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let total_attempts = self.config.retry_attempts + 1;
        let mut attempt = 1;

        loop {
            tracing::debug!(
                "Requesting generation from {} (attempt {}/{})",
                self.config.endpoint,
                attempt,
                total_attempts
            );

            let err = match self.attempt(prompt).await {
                Ok(text) => return Ok(text),
                Err(AttemptError::Fatal(err)) => return Err(err),
                Err(AttemptError::Retryable(err)) => TriageError::ApiError(err),
                Err(AttemptError::RetryableStatus(err)) => err,
            };

            if attempt >= total_attempts {
                return Err(err);
            }

            tracing::warn!("Generation attempt {} failed: {}, retrying", attempt, err);
            tokio::time::sleep(Duration::from_millis(self.config.retry_delay_ms)).await;
            attempt += 1;
        }
    }

    fn name(&self) -> &str {
        "http"
    }
}
