//! The template-supplying capability used by builders.
//!
//! A builder never constructs templates itself. It asks a [`TemplateGettable`]
//! for one each time it processes, so implementations are free to keep
//! templates in memory, read them from disk, or fetch them elsewhere.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::TemplateResult;
use crate::template::{Template, TemplateEnvironment};

/// Supplies the template a builder renders.
///
/// Every `Clone` implementor gets [`TemplateGettableClone`] for free, which
/// lets builders keep their own copy of a boxed getter.
pub trait TemplateGettable: TemplateGettableClone + Send + Sync {
    fn get_template(&self) -> TemplateResult<Template>;
}

/// Object-safe cloning for [`TemplateGettable`].
pub trait TemplateGettableClone {
    fn clone_box(&self) -> Box<dyn TemplateGettable>;
}

impl<T> TemplateGettableClone for T
where
    T: TemplateGettable + Clone + 'static,
{
    fn clone_box(&self) -> Box<dyn TemplateGettable> {
        Box::new(self.clone())
    }
}

impl Clone for Box<dyn TemplateGettable> {
    fn clone(&self) -> Self {
        (**self).clone_box()
    }
}

/// A template looked up by name in an environment.
#[derive(Debug, Clone)]
pub struct NamedTemplate {
    environment: TemplateEnvironment,
    name: String,
}

impl NamedTemplate {
    pub fn new(environment: TemplateEnvironment, name: impl Into<String>) -> Self {
        Self {
            environment,
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl TemplateGettable for NamedTemplate {
    fn get_template(&self) -> TemplateResult<Template> {
        self.environment.get_template(&self.name)
    }
}

/// A template held as source text and compiled on demand.
#[derive(Debug, Clone)]
pub struct InlineTemplate {
    name: String,
    source: String,
}

impl InlineTemplate {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }
}

impl TemplateGettable for InlineTemplate {
    fn get_template(&self) -> TemplateResult<Template> {
        Template::compile(&self.name, &self.source)
    }
}

/// A template read from a file each time it is requested.
#[derive(Debug, Clone)]
pub struct FileTemplate {
    path: PathBuf,
}

impl FileTemplate {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TemplateGettable for FileTemplate {
    fn get_template(&self) -> TemplateResult<Template> {
        debug!("Reading template from {:?}", self.path);
        let source = fs::read_to_string(&self.path)?;
        Template::compile(self.path.to_string_lossy(), &source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TemplateError;
    use templa_config::RenderContext;

    #[test]
    fn test_named_template() {
        let environment = TemplateEnvironment::from_sources([("greeting", "hello")]).unwrap();
        let getter = NamedTemplate::new(environment, "greeting");
        let template = getter.get_template().unwrap();
        assert_eq!(template.name(), "greeting");
        assert_eq!(template.render(&RenderContext::new()).unwrap(), "hello");
    }

    #[test]
    fn test_named_template_missing() {
        let getter = NamedTemplate::new(TemplateEnvironment::new(), "missing");
        assert!(matches!(
            getter.get_template(),
            Err(TemplateError::NotFound(_))
        ));
    }

    #[test]
    fn test_boxed_getter_clone() {
        let getter: Box<dyn TemplateGettable> = Box::new(InlineTemplate::new("t", "inline"));
        let copy = getter.clone();
        drop(getter);
        let rendered = copy
            .get_template()
            .unwrap()
            .render(&RenderContext::new())
            .unwrap();
        assert_eq!(rendered, "inline");
    }

    #[test]
    fn test_file_template_missing_file() {
        let getter = FileTemplate::new("/definitely/not/here.tera");
        assert!(matches!(getter.get_template(), Err(TemplateError::Io(_))));
    }
}
