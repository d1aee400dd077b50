//! Reading configs from YAML, JSON and TOML sources.

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::config::Config;
use crate::error::{ConfigError, ConfigResult};
use crate::record::ConfigData;

/// Supported config file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

impl ConfigFormat {
    /// Detect the format from a file extension.
    pub fn from_path(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase());

        match extension.as_deref() {
            Some("yaml") | Some("yml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    /// Parse source text in this format into a JSON value.
    pub fn parse(&self, content: &str) -> ConfigResult<Value> {
        let value = match self {
            Self::Yaml => serde_yaml::from_str(content)?,
            Self::Json => serde_json::from_str(content)?,
            Self::Toml => toml::from_str(content)?,
        };
        Ok(value)
    }
}

impl std::fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Yaml => "yaml",
            Self::Json => "json",
            Self::Toml => "toml",
        };
        write!(f, "{}", name)
    }
}

impl<D: ConfigData> Config<D> {
    /// Create a config from a YAML document whose root is a mapping.
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        Self::from_value(ConfigFormat::Yaml.parse(content)?)
    }

    /// Create a config from a JSON document whose root is an object.
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        Self::from_value(ConfigFormat::Json.parse(content)?)
    }

    /// Create a config from a TOML document.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        Self::from_value(ConfigFormat::Toml.parse(content)?)
    }

    /// Read a config file, picking the format from its extension.
    pub fn from_path(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        debug!("Reading {} config from {:?}", format, path);

        let content = fs::read_to_string(path)?;
        Self::from_value(format.parse(&content)?)
    }
}
