// Adapters layer: concrete implementations for external systems (generation endpoint, saved responses, local files).

pub mod http;
pub mod replay;
pub mod storage;

use crate::domain::ports::Generator;
use crate::utils::error::Result;
use http::{HttpGenerator, HttpGeneratorConfig};
use replay::ReplayGenerator;
use std::path::PathBuf;

/// Where the model response comes from.
#[derive(Debug, Clone)]
pub enum GenerationSource {
    Http(HttpGeneratorConfig),
    Replay(PathBuf),
}

pub fn build_generator(source: &GenerationSource) -> Result<Box<dyn Generator>> {
    match source {
        GenerationSource::Http(config) => {
            tracing::info!("Using generation endpoint {}", config.endpoint);
            Ok(Box::new(HttpGenerator::new(config.clone())?))
        }
        GenerationSource::Replay(path) => {
            tracing::info!("Replaying saved response from {}", path.display());
            Ok(Box::new(ReplayGenerator::new(path.clone())))
        }
    }
}
