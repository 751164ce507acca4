pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::storage::LocalStorage;
pub use adapters::{build_generator, GenerationSource};
pub use crate::core::{engine::TriageEngine, parser::parse, pipeline::TriagePipeline};
pub use domain::model::{RiskLevel, StructuredAnswer, Urgency};
pub use utils::error::{Result, TriageError};
