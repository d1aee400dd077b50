//! Render command - Render a template with a config.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;
use tracing::info;

use templa_config::FreeformConfigData;
use templa_core::YamlBuilder;
use templa_templates::FileTemplate;

#[derive(Args)]
pub struct RenderArgs {
    /// Config file (YAML, JSON or TOML)
    #[arg(short, long)]
    config: PathBuf,

    /// Template file
    #[arg(short, long)]
    template: PathBuf,

    /// Override a config value (repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = super::parse_set)]
    overrides: Vec<(String, Value)>,

    /// Write the rendered YAML to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub fn execute(args: RenderArgs) -> Result<()> {
    let config = super::load_config(&args.config, &args.overrides)?;
    let template = FileTemplate::new(&args.template);

    let mut builder = YamlBuilder::<FreeformConfigData>::yaml(&config, &template)
        .with_context(|| format!("Invalid config {}", args.config.display()))?;
    let rendered = builder
        .run()
        .with_context(|| format!("Failed to render {}", args.template.display()))?
        .unwrap_or_default();

    match &args.output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            fs::write(path, &rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(
                "Rendered {} to {}",
                args.template.display(),
                path.display()
            );
        }
        None => print!("{}", rendered),
    }

    Ok(())
}
