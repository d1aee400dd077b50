//! templa CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Invalid arguments
//! - 3: Validation failure
//! - 4: Template error

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use templa_config::ConfigError;
use templa_core::BuilderError;
use templa_templates::TemplateError;

mod commands;

use commands::{Cli, Commands};

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_ARGS: u8 = 2;
    pub const VALIDATION_FAILURE: u8 = 3;
    pub const TEMPLATE_ERROR: u8 = 4;
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "templa=debug,warn"
    } else if cli.quiet {
        "error"
    } else {
        "templa=info,warn"
    };

    // Logs go to stderr so rendered output on stdout stays clean.
    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .try_init();

    let result = match cli.command {
        Commands::Render(args) => commands::render::execute(args),
        Commands::Context(args) => commands::context::execute(args),
    };

    match result {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            let exit_code = categorize_error(&e);
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_code)
        }
    }
}

/// Categorize error to determine exit code
fn categorize_error(e: &anyhow::Error) -> u8 {
    for cause in e.chain() {
        if let Some(error) = cause.downcast_ref::<ConfigError>() {
            return match error {
                ConfigError::Validation { .. }
                | ConfigError::UnknownField { .. }
                | ConfigError::NotAMapping(_)
                | ConfigError::NotARecord(_)
                | ConfigError::Yaml(_)
                | ConfigError::Json(_)
                | ConfigError::Toml(_) => ExitCodes::VALIDATION_FAILURE,
                ConfigError::UnsupportedFormat(_) => ExitCodes::INVALID_ARGS,
                _ => ExitCodes::GENERAL_ERROR,
            };
        }
        if let Some(error) = cause.downcast_ref::<TemplateError>() {
            return match error {
                TemplateError::Io(_) => ExitCodes::GENERAL_ERROR,
                _ => ExitCodes::TEMPLATE_ERROR,
            };
        }
        if let Some(BuilderError::Parse(_)) = cause.downcast_ref::<BuilderError>() {
            return ExitCodes::TEMPLATE_ERROR;
        }
    }
    ExitCodes::GENERAL_ERROR
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use std::path::PathBuf;

    #[test]
    fn test_categorize_config_errors() {
        let error = anyhow::Error::new(ConfigError::UnknownField {
            record: "Record",
            field: "extra".to_string(),
        });
        assert_eq!(categorize_error(&error), ExitCodes::VALIDATION_FAILURE);

        let error = anyhow::Error::new(ConfigError::UnsupportedFormat(PathBuf::from("a.ini")));
        assert_eq!(categorize_error(&error), ExitCodes::INVALID_ARGS);
    }

    #[test]
    fn test_categorize_wrapped_errors() {
        let error = Err::<(), _>(BuilderError::Template(TemplateError::NotFound(
            "missing.yaml".to_string(),
        )))
        .context("Failed to render")
        .unwrap_err();
        assert_eq!(categorize_error(&error), ExitCodes::TEMPLATE_ERROR);

        let error = anyhow::Error::new(BuilderError::Parse(anyhow::anyhow!("bad yaml")));
        assert_eq!(categorize_error(&error), ExitCodes::TEMPLATE_ERROR);
    }

    #[test]
    fn test_categorize_other_errors() {
        let error = anyhow::anyhow!("something else");
        assert_eq!(categorize_error(&error), ExitCodes::GENERAL_ERROR);
    }
}
