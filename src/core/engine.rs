use crate::core::{Pipeline, TriageReport};
use crate::utils::error::Result;
use std::time::Instant;

#[derive(Debug, Clone)]
pub struct TriageRun {
    pub report: TriageReport,
    /// Report files written by the load step.
    pub outputs: Vec<String>,
}

pub struct TriageEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> TriageEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<TriageRun> {
        tracing::info!("Starting triage run");

        let started = Instant::now();
        let generation = self.pipeline.extract().await?;
        tracing::info!(
            "Generated {} chars with {} in {:.1?}",
            generation.text.len(),
            generation.generator,
            started.elapsed()
        );

        let report = self.pipeline.transform(generation).await?;
        if report.answer.is_empty() {
            tracing::warn!("No structured field could be extracted from the response");
        }

        let outputs = self.pipeline.load(&report).await?;
        for path in &outputs {
            tracing::info!("Report saved to: {}", path);
        }

        Ok(TriageRun { report, outputs })
    }
}
