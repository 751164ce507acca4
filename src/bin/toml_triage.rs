use clap::Parser;
use triage_extract::config::toml_config::TomlConfig;
use triage_extract::core::prompt::build_prompt;
use triage_extract::core::ConfigProvider;
use triage_extract::utils::{logger, validation::Validate};
use triage_extract::{build_generator, GenerationSource, LocalStorage, TriageEngine, TriagePipeline};

#[derive(Parser)]
#[command(name = "toml-triage")]
#[command(about = "Triage extraction driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "triage.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Replay a saved response instead of the configured endpoint
    #[arg(long)]
    response_file: Option<String>,

    /// Print the prompt and configuration without calling the model
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    logger::init_cli_logger(args.verbose);

    tracing::info!("Loading configuration from: {}", args.config);

    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    if let Some(path) = args.response_file {
        tracing::info!("Response file overridden to: {}", path);
        config.model.endpoint = None;
        config.model.response_file = Some(path);
    }

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        tracing::error!("Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }

    display_config_summary(&config);

    if args.dry_run {
        tracing::info!("DRY RUN MODE - the model will not be called");
        println!("{}", build_prompt(config.patient()));
        return Ok(());
    }

    let generator = match build_generator(&config.generation_source()) {
        Ok(generator) => generator,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(e.exit_code());
        }
    };

    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = TriagePipeline::new(generator, storage, config);
    let engine = TriageEngine::new(pipeline);

    match engine.run().await {
        Ok(run) => {
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
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig) {
    tracing::info!("Model: {}", config.model_id());
    match config.generation_source() {
        GenerationSource::Http(http) => tracing::info!(
            "Endpoint: {} (max_new_tokens={}, timeout={}s, retries={})",
            http.endpoint,
            http.max_new_tokens,
            http.timeout_seconds,
            http.retry_attempts
        ),
        GenerationSource::Replay(path) => tracing::info!("Saved response: {}", path.display()),
    }
    let patient = config.patient();
    tracing::info!(
        "Patient: {} y/o {}, {} (travel: {})",
        patient.age,
        patient.sex,
        patient.country,
        patient.travel_history
    );
    tracing::info!("Output: {} {:?}", config.output_path(), config.output_formats());
}
