//! Builders whose templates render YAML.
//!
//! A [`YamlBuilder`] parses the rendered text as YAML into the processed value
//! and dumps the processed value back to a YAML string as the built artifact.
//! Mapping key order survives the round trip.

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Serialize;

use templa_config::{Config, ConfigData};
use templa_templates::TemplateGettable;

use crate::builder::Builder;
use crate::error::BuilderResult;

/// A builder that parses rendered YAML and dumps it back to text.
///
/// The processed value defaults to a generic YAML document.
pub type YamlBuilder<D, P = serde_yaml::Value> = Builder<D, P, String>;

/// Parse rendered template text as a YAML document.
///
/// Blank text and an explicit `null` document both yield `None`.
pub fn load_rendered_yaml_str<P: DeserializeOwned>(rendered: &str) -> anyhow::Result<Option<P>> {
    if rendered.trim().is_empty() {
        return Ok(None);
    }

    let document: serde_yaml::Value =
        serde_yaml::from_str(rendered).context("Rendered template is not valid YAML")?;
    if document.is_null() {
        return Ok(None);
    }

    let processed = serde_yaml::from_value(document)
        .context("Rendered YAML does not match the processed type")?;
    Ok(Some(processed))
}

/// Dump a processed value as a YAML string. `None` dumps as `null`.
pub fn dump_processed<P: Serialize>(processed: Option<P>) -> anyhow::Result<Option<String>> {
    let dumped = serde_yaml::to_string(&processed).context("Failed to dump processed value as YAML")?;
    Ok(Some(dumped))
}

impl<D, P> Builder<D, P, String>
where
    D: ConfigData,
    P: Serialize + DeserializeOwned + Clone + 'static,
{
    /// Create a builder that parses rendered YAML into `P` and dumps it back.
    pub fn yaml<G>(config: &Config<D>, template_getter: &G) -> BuilderResult<Self>
    where
        G: TemplateGettable + ?Sized,
    {
        Builder::new(
            config,
            template_getter,
            load_rendered_yaml_str::<P>,
            dump_processed::<P>,
        )
    }
}
