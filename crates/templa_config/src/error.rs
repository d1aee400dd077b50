//! Error types for the config module.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for config operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while loading configuration or deriving a render context.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config data has not been loaded; call load_config first")]
    NotLoaded,

    #[error("Config does not match record {record}: {source}")]
    Validation {
        record: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unknown field for record {record}: {field}")]
    UnknownField { record: &'static str, field: String },

    #[error("Config source must be a mapping, found {0}")]
    NotAMapping(String),

    #[error("Record {0} does not serialize to a mapping")]
    NotARecord(&'static str),

    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}
