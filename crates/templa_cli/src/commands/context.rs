//! Context command - Print the render context of a config.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;

#[derive(Args)]
pub struct ContextArgs {
    /// Config file (YAML, JSON or TOML)
    #[arg(short, long)]
    config: PathBuf,

    /// Override a config value (repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = super::parse_set)]
    overrides: Vec<(String, Value)>,
}

pub fn execute(args: ContextArgs) -> Result<()> {
    let mut config = super::load_config(&args.config, &args.overrides)?;
    config
        .load_config()
        .with_context(|| format!("Invalid config {}", args.config.display()))?;

    let context = config.get_render_context()?;
    println!("{}", serde_json::to_string_pretty(&Value::Object(context))?);
    Ok(())
}
