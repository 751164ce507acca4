use crate::core::parser::parse_with_diagnostics;
use crate::core::prompt::build_prompt;
use crate::core::render::{render_console, render_json, render_text_report};
use crate::core::{ConfigProvider, GenerationResult, Generator, Pipeline, Storage, TriageReport};
use crate::domain::model::OutputFormat;
use crate::utils::error::Result;

pub struct TriagePipeline<G: Generator, S: Storage, C: ConfigProvider> {
    generator: G,
    storage: S,
    config: C,
}

impl<G: Generator, S: Storage, C: ConfigProvider> TriagePipeline<G, S, C> {
    pub fn new(generator: G, storage: S, config: C) -> Self {
        Self {
            generator,
            storage,
            config,
        }
    }
}

#[async_trait::async_trait]
impl<G: Generator, S: Storage, C: ConfigProvider> Pipeline for TriagePipeline<G, S, C> {
    async fn extract(&self) -> Result<GenerationResult> {
        let prompt = build_prompt(self.config.patient());
        tracing::debug!("Prompt ({} chars):\n{}", prompt.len(), prompt);

        let text = self.generator.generate(&prompt).await?;
        if text.trim().is_empty() {
            tracing::warn!("{} returned an empty response", self.generator.name());
        } else {
            tracing::debug!("Generated {} chars", text.len());
        }
        Ok(GenerationResult::new(text, self.generator.name()))
    }

    async fn transform(&self, generation: GenerationResult) -> Result<TriageReport> {
        let (answer, diagnostics) = parse_with_diagnostics(&generation.text);

        if diagnostics.anchored {
            tracing::info!("Found 'Risk Level:' as starting marker for parsing");
        } else {
            tracing::warn!("'Risk Level:' marker not found, parsing the entire output");
        }
        tracing::debug!(
            "Field status: risk_level={:?} urgency={:?} conditions={:?} treatments={:?}",
            diagnostics.risk_level,
            diagnostics.urgency,
            diagnostics.conditions,
            diagnostics.treatments
        );

        Ok(TriageReport {
            model_id: self.config.model_id().to_string(),
            generator: generation.generator,
            generated_at: generation.generated_at,
            patient: self.config.patient().clone(),
            answer,
            diagnostics,
            raw_response: generation.text,
        })
    }

    async fn load(&self, report: &TriageReport) -> Result<Vec<String>> {
        print!("{}", render_console(&report.answer, &report.diagnostics));

        let mut written = Vec::new();
        for format in self.config.output_formats() {
            let contents = match format {
                OutputFormat::Text => render_text_report(report),
                OutputFormat::Json => render_json(report)?,
            };
            let path = self
                .storage
                .write_file(format.file_name(), contents.as_bytes())
                .await?;
            tracing::debug!("Wrote {:?} report to {}", format, path);
            written.push(path);
        }

        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{FieldStatus, PatientCase, RiskLevel, Urgency};
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn write_file(&self, path: &str, data: &[u8]) -> Result<String> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(format!("mock/{}", path))
        }
    }

    struct StubGenerator {
        response: String,
        prompts: Arc<Mutex<Vec<String>>>,
    }

    impl StubGenerator {
        fn new(response: &str) -> Self {
            Self {
                response: response.to_string(),
                prompts: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    #[async_trait::async_trait]
    impl Generator for StubGenerator {
        async fn generate(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().await.push(prompt.to_string());
            Ok(self.response.clone())
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    struct MockConfig {
        patient: PatientCase,
        output_formats: Vec<OutputFormat>,
    }

    impl MockConfig {
        fn new(output_formats: Vec<OutputFormat>) -> Self {
            Self {
                patient: PatientCase::default(),
                output_formats,
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn model_id(&self) -> &str {
            "test-model"
        }

        fn patient(&self) -> &PatientCase {
            &self.patient
        }

        fn output_path(&self) -> &str {
            "test_output"
        }

        fn output_formats(&self) -> &[OutputFormat] {
            &self.output_formats
        }
    }

    const RESPONSE: &str = "Here is the classification.\nRisk Level: Medium\nUrgency: Urgent\nTop 3 Conditions:\n1. Streptococcal pharyngitis\n2. Peritonsillar abscess\n3. Infectious mononucleosis\nTreatment:\n1. Rapid strep test\n2. Penicillin V if positive\nFollow-up: 48 hours";

    #[tokio::test]
    async fn test_extract_sends_patient_prompt() {
        let generator = StubGenerator::new(RESPONSE);
        let prompts = generator.prompts.clone();
        let pipeline = TriagePipeline::new(generator, MockStorage::new(), MockConfig::new(vec![]));

        let generation = pipeline.extract().await.unwrap();

        assert_eq!(generation.generator, "stub");
        assert_eq!(generation.text, RESPONSE);
        let prompts = prompts.lock().await;
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Age: 28"));
    }

    #[tokio::test]
    async fn test_empty_response_is_parsed_in_degraded_mode() {
        let storage = MockStorage::new();
        let pipeline = TriagePipeline::new(
            StubGenerator::new("   \n"),
            storage.clone(),
            MockConfig::new(vec![OutputFormat::Text]),
        );

        let generation = pipeline.extract().await.unwrap();
        let report = pipeline.transform(generation).await.unwrap();

        assert!(report.answer.is_empty());
        assert!(!report.diagnostics.anchored);
        assert_eq!(report.diagnostics.risk_level, FieldStatus::MarkerMissing);
        assert_eq!(report.diagnostics.urgency, FieldStatus::MarkerMissing);
        assert_eq!(report.diagnostics.conditions, FieldStatus::MarkerMissing);
        assert_eq!(report.diagnostics.treatments, FieldStatus::MarkerMissing);
        assert!(render_console(&report.answer, &report.diagnostics).contains("Risk Level: Not Found"));

        let written = pipeline.load(&report).await.unwrap();
        assert_eq!(written, vec!["mock/triage_report.txt"]);

        let text = String::from_utf8(storage.get_file("triage_report.txt").await.unwrap()).unwrap();
        assert!(text.contains("Risk Level: Not Found\nUrgency: Not Found\n"));
        assert!(text.contains("Top 3 Conditions: Not Found\nTreatment: Not Found\n"));
    }

    #[tokio::test]
    async fn test_transform_builds_report() {
        let pipeline = TriagePipeline::new(StubGenerator::new(RESPONSE), MockStorage::new(), MockConfig::new(vec![]));

        let generation = pipeline.extract().await.unwrap();
        let report = pipeline.transform(generation).await.unwrap();

        assert_eq!(report.model_id, "test-model");
        assert!(report.diagnostics.anchored);
        assert_eq!(report.answer.risk_level, Some(RiskLevel::Medium));
        assert_eq!(report.answer.urgency, Some(Urgency::Urgent));
        assert_eq!(report.answer.conditions.len(), 3);
        assert_eq!(
            report.answer.treatments,
            vec!["Rapid strep test", "Penicillin V if positive"]
        );
        assert_eq!(report.diagnostics.treatments, FieldStatus::Found);
        assert_eq!(report.raw_response, RESPONSE);
    }

    #[tokio::test]
    async fn test_load_writes_configured_formats() {
        let storage = MockStorage::new();
        let pipeline = TriagePipeline::new(
            StubGenerator::new(RESPONSE),
            storage.clone(),
            MockConfig::new(vec![OutputFormat::Text, OutputFormat::Json]),
        );

        let generation = pipeline.extract().await.unwrap();
        let report = pipeline.transform(generation).await.unwrap();
        let written = pipeline.load(&report).await.unwrap();

        assert_eq!(
            written,
            vec!["mock/triage_report.txt", "mock/triage_report.json"]
        );

        let json = storage.get_file("triage_report.json").await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&json).unwrap();
        assert_eq!(value["answer"]["risk_level"], "Medium");

        let text = String::from_utf8(storage.get_file("triage_report.txt").await.unwrap()).unwrap();
        assert!(text.contains("Recommended course of action:\n1. Rapid strep test\n"));
    }

    #[tokio::test]
    async fn test_load_without_formats_writes_nothing() {
        let storage = MockStorage::new();
        let pipeline = TriagePipeline::new(StubGenerator::new(RESPONSE), storage.clone(), MockConfig::new(vec![]));

        let generation = pipeline.extract().await.unwrap();
        let report = pipeline.transform(generation).await.unwrap();

        assert!(pipeline.load(&report).await.unwrap().is_empty());
        assert!(storage.get_file("triage_report.json").await.is_none());
    }
}
