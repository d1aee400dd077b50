//! # templa_templates
//!
//! Template sources and rendering for templa.
//!
//! Rendering is delegated to [Tera](https://keats.github.io/tera/), whose
//! syntax follows Jinja2 (`{{ name }}`, `{% if %}`, `{% for %}`). This crate
//! adds the pieces builders need around it:
//!
//! - [`Template`]: a compiled template rendered against a render context
//! - [`TemplateEnvironment`]: a named set of templates, built from memory or
//!   loaded from a directory
//! - [`TemplateGettable`]: the capability a builder uses to obtain its template
//!
//! ## Example
//!
//! ```rust
//! use templa_config::RenderContext;
//! use templa_templates::{NamedTemplate, TemplateEnvironment, TemplateGettable};
//!
//! let environment =
//!     TemplateEnvironment::from_sources([("list.yaml", "- {{ item }}")]).unwrap();
//! let getter = NamedTemplate::new(environment, "list.yaml");
//!
//! let mut context = RenderContext::new();
//! context.insert("item".into(), "apple".into());
//!
//! let rendered = getter.get_template().unwrap().render(&context).unwrap();
//! assert_eq!(rendered, "- apple");
//! ```

pub mod error;
pub mod getter;
pub mod loader;
pub mod template;

pub use error::{TemplateError, TemplateResult};
pub use getter::{FileTemplate, InlineTemplate, NamedTemplate, TemplateGettable, TemplateGettableClone};
pub use loader::TemplateLoader;
pub use template::{Template, TemplateEnvironment};
