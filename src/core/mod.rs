pub mod engine;
pub mod parser;
pub mod pipeline;
pub mod prompt;
pub mod render;

pub use crate::domain::model::{GenerationResult, StructuredAnswer, TriageReport};
pub use crate::domain::ports::{ConfigProvider, Generator, Pipeline, Storage};
pub use crate::utils::error::Result;
