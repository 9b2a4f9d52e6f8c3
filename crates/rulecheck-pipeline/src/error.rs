//! Pipeline error types.

use rulecheck_config::ConfigError;
use rulecheck_core::errors::{ERROR_CLASSIFICATION, ERROR_CONFIG, ERROR_IO};
use rulecheck_rules::RulesError;

/// Pipeline error type.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The input rule file could not be read. Fatal for the run.
    #[error("input: {0}")]
    Input(#[source] RulesError),
    /// An artifact or report could not be written.
    #[error("output {path}: {source}")]
    Output {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("config: {0}")]
    Config(#[from] ConfigError),
    /// GeoIP database missing or unreadable.
    #[error("classification unavailable: {0}")]
    Classification(#[source] RulesError),
    #[error("version stamp: {0}")]
    Format(#[from] time::error::Format),
    #[error("report: {0}")]
    Report(#[from] serde_json::Error),
}

impl PipelineError {
    /// Get the error type string for logs and reports.
    pub fn error_type(&self) -> &'static str {
        match self {
            PipelineError::Input(_) | PipelineError::Output { .. } => ERROR_IO,
            PipelineError::Config(_) | PipelineError::Format(_) => ERROR_CONFIG,
            PipelineError::Classification(_) => ERROR_CLASSIFICATION,
            PipelineError::Report(_) => ERROR_IO,
        }
    }
}
