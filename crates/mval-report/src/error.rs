//! Errors raised while loading translations or rendering reports.

use mval_core::TemplateError;
use thiserror::Error;

/// A report could not be produced.
#[derive(Error, Debug)]
pub enum ReportError {
    /// A message template could not be rendered.
    #[error("template error: {0}")]
    Template(#[from] TemplateError),

    /// The requested translation is not loaded.
    #[error("unknown translation '{0}'")]
    UnknownTranslation(String),

    /// JSON translation tables failed to parse.
    #[error("invalid JSON translations: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML translation tables failed to parse.
    #[error("invalid YAML translations: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
