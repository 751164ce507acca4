use anyhow::Result;
use httpmock::prelude::*;
use triage_extract::adapters::http::HttpGeneratorConfig;
use triage_extract::config::toml_config::TomlConfig;
use triage_extract::domain::model::{FieldStatus, OutputFormat, PatientCase};
use triage_extract::utils::validation::Validate;
use triage_extract::{
    build_generator, CliConfig, GenerationSource, LocalStorage, RiskLevel, TriageEngine,
    TriagePipeline, Urgency,
};
use tempfile::TempDir;

const MODEL_RESPONSE: &str = "Risk Level: Medium\nUrgency: Urgent\nTop 3 Conditions:\n1. Streptococcal pharyngitis\n2. Peritonsillar abscess\n3. Infectious mononucleosis\n4. Viral pharyngitis\nTreatment:\n1. Rapid antigen test or throat culture\n2. Penicillin V for 10 days if positive\n**My thinking process:**\nThe patient is young and stable.";

fn cli_config(endpoint: Option<String>, response_file: Option<String>, output_path: &str) -> CliConfig {
    CliConfig {
        endpoint,
        response_file,
        model_id: "google/medgemma-1.5-4b-it".to_string(),
        api_token: None,
        max_new_tokens: 240,
        timeout_seconds: 5,
        retry_attempts: 0,
        output_path: output_path.to_string(),
        output_formats: vec![OutputFormat::Json, OutputFormat::Text],
        verbose: false,
        json_logs: false,
        patient: PatientCase::default(),
    }
}

#[tokio::test]
async fn test_end_to_end_with_http_generator() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/generate")
            .body_contains("Classify this patient.")
            .body_contains("Travel History: No");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!([{ "generated_text": MODEL_RESPONSE }]));
    });

    let config = cli_config(Some(server.url("/generate")), None, &output_path);
    let generator = build_generator(&config.generation_source()).unwrap();
    let storage = LocalStorage::new(output_path.clone());
    let engine = TriageEngine::new(TriagePipeline::new(generator, storage, config));

    let run = engine.run().await.unwrap();
    api_mock.assert();

    let answer = &run.report.answer;
    assert_eq!(answer.risk_level, Some(RiskLevel::Medium));
    assert_eq!(answer.urgency, Some(Urgency::Urgent));
    assert_eq!(
        answer.conditions,
        vec![
            "Streptococcal pharyngitis",
            "Peritonsillar abscess",
            "Infectious mononucleosis"
        ]
    );
    assert_eq!(
        answer.treatments,
        vec![
            "Rapid antigen test or throat culture",
            "Penicillin V for 10 days if positive"
        ]
    );
    assert_eq!(run.report.generator, "http");
    assert_eq!(run.outputs.len(), 2);

    let json_path = std::path::Path::new(&output_path).join("triage_report.json");
    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(json_path).unwrap()).unwrap();
    assert_eq!(value["answer"]["urgency"], "Urgent");
    assert_eq!(value["model_id"], "google/medgemma-1.5-4b-it");

    let text = std::fs::read_to_string(std::path::Path::new(&output_path).join("triage_report.txt")).unwrap();
    assert!(text.contains("Highly probable conditions:\n1. Streptococcal pharyngitis\n"));
    assert!(!text.contains("4. Viral pharyngitis\nRecommended"));
}

#[tokio::test]
async fn test_end_to_end_with_generation_failure() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST).path("/generate");
        then.status(500).body("CUDA out of memory");
    });

    let config = cli_config(Some(server.url("/generate")), None, &output_path);
    let generator = build_generator(&config.generation_source()).unwrap();
    let engine = TriageEngine::new(TriagePipeline::new(
        generator,
        LocalStorage::new(output_path.clone()),
        config,
    ));

    let err = engine.run().await.unwrap_err();
    api_mock.assert();

    assert_eq!(err.exit_code(), 2);
    assert!(!std::path::Path::new(&output_path).join("triage_report.json").exists());
}

#[tokio::test]
async fn test_end_to_end_replay_without_start_marker() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().join("out").to_str().unwrap().to_string();
    let response_path = temp_dir.path().join("response.txt");
    tokio::fs::write(&response_path, "Top 3 Conditions:\n1. Flu\nTreatment:\n1. Rest\nFollow-up: see doctor").await?;

    let config = cli_config(None, Some(response_path.to_str().unwrap().to_string()), &output_path);
    let generator = build_generator(&config.generation_source())?;
    let engine = TriageEngine::new(TriagePipeline::new(
        generator,
        LocalStorage::new(output_path.clone()),
        config,
    ));

    let run = engine.run().await?;

    assert!(!run.report.diagnostics.anchored);
    assert_eq!(run.report.diagnostics.risk_level, FieldStatus::MarkerMissing);
    assert_eq!(run.report.answer.risk_level, None);
    assert_eq!(run.report.answer.urgency, None);
    assert_eq!(run.report.answer.conditions, vec!["Flu"]);
    assert_eq!(run.report.answer.treatments, vec!["Rest"]);
    assert_eq!(run.report.generator, "replay");
    Ok(())
}

#[tokio::test]
async fn test_end_to_end_blank_replay_reports_not_found() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().join("out").to_str().unwrap().to_string();
    let response_path = temp_dir.path().join("response.txt");
    tokio::fs::write(&response_path, "   \n").await?;

    // An endpoint exported in the environment must not shadow the replay file
    let config = cli_config(
        Some("http://localhost:8080/generate".to_string()),
        Some(response_path.to_str().unwrap().to_string()),
        &output_path,
    );
    config.validate()?;
    let generator = build_generator(&config.generation_source())?;
    let engine = TriageEngine::new(TriagePipeline::new(
        generator,
        LocalStorage::new(output_path.clone()),
        config,
    ));

    let run = engine.run().await?;

    assert!(run.report.answer.is_empty());
    assert_eq!(run.report.diagnostics.risk_level, FieldStatus::MarkerMissing);
    assert_eq!(run.report.diagnostics.urgency, FieldStatus::MarkerMissing);
    assert_eq!(run.report.diagnostics.conditions, FieldStatus::MarkerMissing);
    assert_eq!(run.report.diagnostics.treatments, FieldStatus::MarkerMissing);
    assert_eq!(run.outputs.len(), 2);

    let text = tokio::fs::read_to_string(std::path::Path::new(&output_path).join("triage_report.txt")).await?;
    assert!(text.contains("Risk Level: Not Found"));
    Ok(())
}

#[tokio::test]
async fn test_toml_config_drives_http_generator() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/generate")
            .body_contains("Age: 67")
            .body_contains("\"max_new_tokens\":128");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({ "generated_text": "Risk Level: High\nUrgency: Emergency" }));
    });

    let toml_content = format!(
        r#"
[model]
endpoint = "{}"
max_new_tokens = 128

[patient]
age = 67
sex = "Male"
symptoms = "Crushing chest pain radiating to left arm, sweating"
"#,
        server.url("/generate")
    );
    let config = TomlConfig::from_toml_str(&toml_content).unwrap();
    assert_eq!(config.patient.country, "Canada");

    let temp_dir = TempDir::new().unwrap();
    let generator = build_generator(&config.generation_source()).unwrap();
    let engine = TriageEngine::new(TriagePipeline::new(
        generator,
        LocalStorage::new(temp_dir.path().to_str().unwrap().to_string()),
        config,
    ));

    let run = engine.run().await.unwrap();
    api_mock.assert();

    assert_eq!(run.report.answer.risk_level, Some(RiskLevel::High));
    assert_eq!(run.report.answer.urgency, Some(Urgency::Emergency));
    assert!(run.outputs.is_empty());
}

#[test]
fn test_http_source_carries_cli_settings() {
    let mut config = cli_config(Some("http://localhost:8080/generate".to_string()), None, "./output");
    config.api_token = Some("hf_token".to_string());
    config.retry_attempts = 3;

    match config.generation_source() {
        GenerationSource::Http(HttpGeneratorConfig {
            api_token,
            retry_attempts,
            timeout_seconds,
            ..
        }) => {
            assert_eq!(api_token.as_deref(), Some("hf_token"));
            assert_eq!(retry_attempts, 3);
            assert_eq!(timeout_seconds, 5);
        }
        other => panic!("expected http source, got {:?}", other),
    }
}
