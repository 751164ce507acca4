use thiserror::Error;

#[derive(Error, Debug)]
pub enum TriageError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Generation failed: {message}")]
    GenerationError { message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Storage,
    Configuration,
    Generation,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl TriageError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            TriageError::ApiError(_) => ErrorCategory::Network,
            TriageError::IoError(_) => ErrorCategory::Storage,
            TriageError::SerializationError(_) | TriageError::ProcessingError { .. } => {
                ErrorCategory::Processing
            }
            TriageError::ConfigError { .. }
            | TriageError::ConfigValidationError { .. }
            | TriageError::InvalidConfigValueError { .. }
            | TriageError::MissingConfigError { .. } => ErrorCategory::Configuration,
            TriageError::GenerationError { .. } => ErrorCategory::Generation,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // the model endpoint may come back on a later attempt
            ErrorCategory::Network | ErrorCategory::Generation => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Processing => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            TriageError::ApiError(_) => {
                "Check that the generation endpoint is reachable and the API token is valid"
            }
            TriageError::GenerationError { .. } => {
                "Retry later, raise --timeout-seconds, or replay a saved response with --response-file"
            }
            TriageError::IoError(_) => "Check that the output path exists and is writable",
            TriageError::SerializationError(_) => "Inspect the raw model response for unexpected content",
            TriageError::ConfigError { .. }
            | TriageError::ConfigValidationError { .. }
            | TriageError::InvalidConfigValueError { .. } => {
                "Fix the configuration value and run again"
            }
            TriageError::MissingConfigError { .. } => {
                "Provide the missing setting on the command line or in the TOML file"
            }
            TriageError::ProcessingError { .. } => "Run with --verbose to see the failing step",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not reach the model: {}", self),
            ErrorCategory::Generation => format!("The model did not produce a response: {}", self),
            ErrorCategory::Storage => format!("Could not read or write a file: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Processing => format!("Could not build the triage report: {}", self),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, TriageError>;
