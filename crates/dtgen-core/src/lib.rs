//! Run orchestration: configuration, the generation pipeline and its report.

pub mod config;
pub mod run;

pub use config::{ConfigError, GenerationConfig};
pub use run::{GenerationReport, GenerationRun, RunError};
