//! Error types for the core module.

use thiserror::Error;

use templa_config::ConfigError;
use templa_templates::TemplateError;

use crate::stage::BuilderId;

/// Result type alias for builder operations.
pub type BuilderResult<T> = Result<T, BuilderError>;

/// Errors that can occur while driving a builder.
#[derive(Error, Debug)]
pub enum BuilderError {
    #[error("Builder target was issued by builder {found}, not by builder {expected}")]
    InstanceMismatch {
        expected: BuilderId,
        found: BuilderId,
    },

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error("Failed to parse rendered template: {0}")]
    Parse(#[source] anyhow::Error),

    #[error("Failed to build processed value: {0}")]
    Build(#[source] anyhow::Error),
}
