//! Compiled templates and the environment that holds them.

use std::fmt;
use std::sync::Arc;

use tera::{Context as TeraContext, Tera};
use tracing::debug;

use templa_config::RenderContext;

use crate::error::{error_chain, TemplateError, TemplateResult};

/// A compiled template, ready to render.
///
/// Cheap to clone: the compiled templates are shared with the environment the
/// template was taken from.
#[derive(Clone)]
pub struct Template {
    name: String,
    tera: Arc<Tera>,
}

impl Template {
    /// Compile a standalone template.
    pub fn compile(name: impl Into<String>, source: &str) -> TemplateResult<Self> {
        let name = name.into();
        let mut environment = TemplateEnvironment::new();
        environment.add_template(&name, source)?;
        environment.get_template(&name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Render the template against a render context.
    pub fn render(&self, context: &RenderContext) -> TemplateResult<String> {
        let context = TeraContext::from_serialize(context)
            .map_err(|e| TemplateError::Context(error_chain(&e)))?;

        debug!("Rendering template {}", self.name);
        self.tera
            .render(&self.name, &context)
            .map_err(|e| TemplateError::Render {
                name: self.name.clone(),
                message: error_chain(&e),
            })
    }
}

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Template").field("name", &self.name).finish()
    }
}

/// A set of named templates.
///
/// Templates may extend or include each other by name. Output is never
/// HTML-escaped: templates here produce YAML and plain text.
#[derive(Clone)]
pub struct TemplateEnvironment {
    tera: Arc<Tera>,
}

impl Default for TemplateEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateEnvironment {
    /// Create an empty environment.
    pub fn new() -> Self {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        Self {
            tera: Arc::new(tera),
        }
    }

    /// Create an environment from `(name, source)` pairs.
    pub fn from_sources<I, N, S>(sources: I) -> TemplateResult<Self>
    where
        I: IntoIterator<Item = (N, S)>,
        N: AsRef<str>,
        S: AsRef<str>,
    {
        let sources: Vec<(N, S)> = sources.into_iter().collect();
        let mut environment = Self::new();
        if sources.is_empty() {
            return Ok(environment);
        }

        let names = sources
            .iter()
            .map(|(name, _)| name.as_ref())
            .collect::<Vec<_>>()
            .join(", ");
        Arc::make_mut(&mut environment.tera)
            .add_raw_templates(sources)
            .map_err(|e| TemplateError::Syntax {
                name: names,
                message: error_chain(&e),
            })?;

        Ok(environment)
    }

    /// Add or replace a single template.
    pub fn add_template(&mut self, name: &str, source: &str) -> TemplateResult<()> {
        Arc::make_mut(&mut self.tera)
            .add_raw_template(name, source)
            .map_err(|e| TemplateError::Syntax {
                name: name.to_string(),
                message: error_chain(&e),
            })?;
        debug!("Added template {}", name);
        Ok(())
    }

    /// Look up a template by name.
    pub fn get_template(&self, name: &str) -> TemplateResult<Template> {
        if !self.contains(name) {
            return Err(TemplateError::NotFound(name.to_string()));
        }
        Ok(Template {
            name: name.to_string(),
            tera: Arc::clone(&self.tera),
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tera.get_template_names().any(|n| n == name)
    }

    /// Sorted names of all templates in the environment.
    pub fn template_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .tera
            .get_template_names()
            .map(str::to_string)
            .collect();
        names.sort();
        names
    }
}

impl fmt::Debug for TemplateEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateEnvironment")
            .field("templates", &self.template_names())
            .finish()
    }
}
