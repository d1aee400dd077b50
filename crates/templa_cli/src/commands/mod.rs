//! CLI command definitions.
//!
//! This module defines the command structure for the templa CLI and the
//! config handling shared by its subcommands.

use std::path::Path;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::debug;

use templa_config::{Config, FreeformConfigData};

pub mod context;
pub mod render;

/// templa - render YAML templates from structured config
#[derive(Parser)]
#[command(name = "templa")]
#[command(version, about = "templa - render YAML templates from structured config")]
#[command(long_about = r#"
templa renders Jinja-style templates with values from a YAML, JSON or TOML
config file and re-emits the result as normalized YAML.

COMMANDS:
  render   → Render a template with a config and print or write the YAML
  context  → Print the render context derived from a config

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments
  3 - Validation failure
  4 - Template error
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only report errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render a template with a config
    Render(render::RenderArgs),

    /// Print the render context of a config
    Context(context::ContextArgs),
}

/// Parse a `key=value` override. The value is read as YAML, so `5` is a
/// number and `true` a boolean; anything unparsable stays a string.
pub fn parse_set(arg: &str) -> std::result::Result<(String, Value), String> {
    let (key, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", arg))?;

    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing key in '{}'", arg));
    }

    let value = if value.trim().is_empty() {
        Value::String(value.to_string())
    } else {
        serde_yaml::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()))
    };

    Ok((key.to_string(), value))
}

/// Read a config file and apply `--set` overrides on top of it.
pub fn load_config(path: &Path, overrides: &[(String, Value)]) -> Result<Config<FreeformConfigData>> {
    let config = Config::<FreeformConfigData>::from_path(path)
        .with_context(|| format!("Failed to load config from {}", path.display()))?;

    if overrides.is_empty() {
        return Ok(config);
    }

    let mut raw = config.raw_config_dict();
    for (key, value) in overrides {
        debug!("Overriding config key {} with {}", key, value);
        raw.insert(key.clone(), value.clone());
    }
    Ok(Config::new(raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_parse_set_scalars() {
        assert_eq!(parse_set("bar=5").unwrap(), ("bar".to_string(), json!(5)));
        assert_eq!(parse_set("on=true").unwrap(), ("on".to_string(), json!(true)));
        assert_eq!(parse_set("name=FOO").unwrap(), ("name".to_string(), json!("FOO")));
        assert_eq!(parse_set("quoted='5'").unwrap(), ("quoted".to_string(), json!("5")));
        assert_eq!(parse_set("empty=").unwrap(), ("empty".to_string(), json!("")));
        assert_eq!(parse_set("url=a=b").unwrap(), ("url".to_string(), json!("a=b")));
    }

    #[test]
    fn test_parse_set_rejects_malformed() {
        assert!(parse_set("novalue").is_err());
        assert!(parse_set("=5").is_err());
    }

    #[test]
    fn test_load_config_with_overrides() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("config.yaml");
        fs::write(&path, "foo: FOO\nbar: 5\n").unwrap();

        let mut config = load_config(&path, &[("bar".to_string(), json!(6))]).unwrap();
        config.load_config().unwrap();
        let context = config.get_render_context().unwrap();
        assert_eq!(Value::Object(context), json!({"foo": "FOO", "bar": 6}));
    }

    #[test]
    fn test_load_config_missing_file() {
        let temp = tempdir().unwrap();
        let error = load_config(&temp.path().join("absent.yaml"), &[]).unwrap_err();
        assert!(error.to_string().contains("Failed to load config"));
    }
}
