use clap::Parser;
use triage_extract::utils::{logger, validation::Validate};
use triage_extract::{build_generator, CliConfig, LocalStorage, TriageEngine, TriagePipeline};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting triage-extract CLI");
    tracing::debug!(
        "Model: {}, max_new_tokens: {}, output: {} {:?}",
        config.model_id,
        config.max_new_tokens,
        config.output_path,
        config.output_formats
    );

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        tracing::error!("Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }

    let generator = match build_generator(&config.generation_source()) {
        Ok(generator) => generator,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(e.exit_code());
        }
    };

    let storage = LocalStorage::new(config.output_path.clone());
    let pipeline = TriagePipeline::new(generator, storage, config);
    let engine = TriageEngine::new(pipeline);

    match engine.run().await {
        Ok(run) => {
            tracing::info!("Triage run completed");
            for path in &run.outputs {
                println!("📁 Report saved to: {}", path);
            }
        }
        Err(e) => {
            tracing::error!(
                "Triage run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = e.exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
