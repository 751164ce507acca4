use crate::domain::ports::Generator;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::PathBuf;

/// Returns a model response saved earlier instead of calling a model.
#[derive(Debug, Clone)]
pub struct ReplayGenerator {
    path: PathBuf,
}

impl ReplayGenerator {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl Generator for ReplayGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        tracing::debug!("Replaying saved response from {}", self.path.display());
        let text = tokio::fs::read_to_string(&self.path).await?;
        Ok(text.trim().to_string())
    }

    fn name(&self) -> &str {
        "replay"
    }
}
