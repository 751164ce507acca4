use crate::domain::model::{GenerationResult, OutputFormat, PatientCase, TriageReport};
use crate::utils::error::Result;
use async_trait::async_trait;

/// The external text-generation capability: prompt in, generated text out.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;

    fn name(&self) -> &str;
}

#[async_trait]
impl<G: Generator + ?Sized> Generator for Box<G> {
    async fn generate(&self, prompt: &str) -> Result<String> {
        (**self).generate(prompt).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

pub trait Storage: Send + Sync {
    /// Writes `data` under the storage root and returns the full path written.
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn model_id(&self) -> &str;
    fn patient(&self) -> &PatientCase;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[OutputFormat];
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<GenerationResult>;
    async fn transform(&self, generation: GenerationResult) -> Result<TriageReport>;
    async fn load(&self, report: &TriageReport) -> Result<Vec<String>>;
}
