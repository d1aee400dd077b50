//! # templa_core
//!
//! Staged builders that turn a config and a template into an artifact.
//!
//! # Architecture
//!
//! - **Builder**: renders a template with a config's render context, parses
//!   the result and builds an artifact from it
//! - **Stages**: typestate tokens that order the builder's steps at compile
//!   time and tie each token to the builder that issued it
//! - **Hooks**: middleware around processing and building
//! - **YAML**: a ready-made builder for templates that render YAML
//!
//! # Example
//!
//! ```rust
//! use templa_config::{Config, FreeformConfigData};
//! use templa_core::YamlBuilder;
//! use templa_templates::InlineTemplate;
//!
//! let config = Config::<FreeformConfigData>::from_yaml_str("foo: FOO\nbar: 5\n")?;
//! let template = InlineTemplate::new("list", "---\n- {{ foo }}\n- {{ bar }}");
//!
//! let mut builder = YamlBuilder::<FreeformConfigData>::yaml(&config, &template)?;
//! assert_eq!(builder.run()?.as_deref(), Some("- FOO\n- 5\n"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod builder;
pub mod error;
pub mod hook;
pub mod stage;
pub mod yaml;

pub use builder::{BuildFn, BuildHook, Builder, ParseFn, ProcessHook};
pub use error::{BuilderError, BuilderResult};
pub use hook::{Hook, Next, Stamped};
pub use stage::{
    Built, BuilderId, BuilderTarget, BuilderTargetBuilt, BuilderTargetInitialized,
    BuilderTargetProcessed, Initialized, Processed, ProcessedStage, Stage,
};
pub use yaml::{dump_processed, load_rendered_yaml_str, YamlBuilder};
