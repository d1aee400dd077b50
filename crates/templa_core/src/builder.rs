//! The staged builder.
//!
//! A [`Builder`] renders a template with a config, parses the rendered text
//! into a processed value, and builds a final artifact from it. The stages
//! always run in the same order:
//!
//! ```text
//! init_builder_target ──▶ process_template ──▶ build
//!    (Initialized)          (Processed)         (Built)
//! ```
//!
//! Every stage method takes the [`BuilderTarget`] of the previous stage and
//! returns the target of the next one, and fetch methods require a target of a
//! stage at which their value exists. Calling a stage out of order is a type
//! error:
//!
//! ```rust,compile_fail
//! # use templa_config::{Config, EmptyConfigData, RawConfig};
//! # use templa_core::Builder;
//! # use templa_templates::InlineTemplate;
//! # let config = Config::<EmptyConfigData>::new(RawConfig::new());
//! # let template = InlineTemplate::new("empty", "");
//! # let mut builder = Builder::new(
//! #     &config,
//! #     &template,
//! #     |rendered: &str| Ok(Some(rendered.to_string())),
//! #     |processed: Option<String>| Ok(processed),
//! # )
//! # .unwrap();
//! let initialized = builder.init_builder_target();
//! // `build` wants a processed target.
//! builder.build(initialized);
//! ```
//!
//! Likewise, the built artifact can only be fetched once building has run:
//!
//! ```rust,compile_fail
//! # use templa_config::{Config, EmptyConfigData, RawConfig};
//! # use templa_core::Builder;
//! # use templa_templates::InlineTemplate;
//! # let config = Config::<EmptyConfigData>::new(RawConfig::new());
//! # let template = InlineTemplate::new("empty", "");
//! # let mut builder = Builder::new(
//! #     &config,
//! #     &template,
//! #     |rendered: &str| Ok(Some(rendered.to_string())),
//! #     |processed: Option<String>| Ok(processed),
//! # )
//! # .unwrap();
//! let processed = builder.process_template(builder.init_builder_target()).unwrap();
//! // `fetch_built` wants a built target.
//! builder.fetch_built(&processed);
//! ```
//!
//! A target is only valid for the builder that issued it. Presenting it to
//! another builder fails with [`BuilderError::InstanceMismatch`], even when both
//! builders were created from equal inputs.
//!
//! # Example
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use templa_config::{Config, RawConfig};
//! use templa_core::Builder;
//! use templa_templates::InlineTemplate;
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! struct Greeting {
//!     name: String,
//! }
//!
//! let mut raw = RawConfig::new();
//! raw.insert("name".into(), "world".into());
//! let config = Config::<Greeting>::new(raw);
//! let template = InlineTemplate::new("greeting", "Hello, {{ name }}!");
//!
//! let mut builder = Builder::new(
//!     &config,
//!     &template,
//!     |rendered: &str| Ok(Some(rendered.to_uppercase())),
//!     |processed: Option<String>| Ok(processed.map(|text| text.len())),
//! )?;
//!
//! let initialized = builder.init_builder_target();
//! let processed = builder.process_template(initialized)?;
//! assert_eq!(builder.fetch_processed(&processed)?.as_deref(), Some("HELLO, WORLD!"));
//!
//! let built = builder.build(processed)?;
//! assert_eq!(builder.fetch_built(&built)?, Some(13));
//! # Ok::<(), templa_core::BuilderError>(())
//! ```

use std::fmt;

use tracing::{debug, trace};

use templa_config::{Config, ConfigData, RenderContext};
use templa_templates::TemplateGettable;

use crate::error::{BuilderError, BuilderResult};
use crate::hook::{Hook, Next, Stamped};
use crate::stage::{Built, BuilderId, BuilderTarget, Initialized, Processed, ProcessedStage, Stage};

/// Parses rendered template text into the processed value.
pub type ParseFn<P> = Box<dyn Fn(&str) -> anyhow::Result<Option<P>> + Send + Sync>;

/// Builds the final artifact from the processed value.
pub type BuildFn<P, B> = Box<dyn Fn(Option<P>) -> anyhow::Result<Option<B>> + Send + Sync>;

/// Hook around template processing. Input is the render context.
pub type ProcessHook<P> = Hook<RenderContext, Option<P>>;

/// Hook around building. Input is a copy of the processed value.
pub type BuildHook<P, B> = Hook<Option<P>, Option<B>>;

/// Staged template builder.
///
/// - `D`: the config record type
/// - `P`: the processed value parsed from the rendered template
/// - `B`: the built artifact
///
/// The builder owns private copies of its config and template getter, taken at
/// construction. Everything it hands out is a copy as well.
pub struct Builder<D, P, B> {
    id: BuilderId,
    config: Config<D>,
    render_context: RenderContext,
    template_getter: Box<dyn TemplateGettable>,
    parse_rendered_template: ParseFn<P>,
    build_processed: BuildFn<P, B>,
    process_hooks: Vec<ProcessHook<P>>,
    build_hooks: Vec<BuildHook<P, B>>,
    processed: Option<P>,
    built: Option<B>,
}

impl<D, P, B> Builder<D, P, B>
where
    D: ConfigData,
    P: Clone,
    B: Clone,
{
    /// Create a builder.
    ///
    /// Copies `config`, loads the record on the copy and snapshots its render
    /// context, then copies `template_getter`. Changes made to either argument
    /// afterwards do not reach the builder.
    pub fn new<G, F, C>(
        config: &Config<D>,
        template_getter: &G,
        parse_rendered_template: F,
        build_processed: C,
    ) -> BuilderResult<Self>
    where
        G: TemplateGettable + ?Sized,
        F: Fn(&str) -> anyhow::Result<Option<P>> + Send + Sync + 'static,
        C: Fn(Option<P>) -> anyhow::Result<Option<B>> + Send + Sync + 'static,
    {
        let mut config = config.clone();
        config.load_config()?;
        let render_context = config.get_render_context()?;

        let id = BuilderId::new();
        debug!(
            "Created builder {} with {} context keys",
            id,
            render_context.len()
        );

        Ok(Self {
            id,
            config,
            render_context,
            template_getter: template_getter.clone_box(),
            parse_rendered_template: Box::new(parse_rendered_template),
            build_processed: Box::new(build_processed),
            process_hooks: Vec::new(),
            build_hooks: Vec::new(),
            processed: None,
            built: None,
        })
    }

    /// Wrap template processing with a hook.
    ///
    /// The hook gets a copy of the render context and must hand it on with
    /// `next.run(context)`; whatever stamped value it returns is stored as the
    /// processed value. Hooks registered first run outermost.
    ///
    /// ```rust
    /// # use templa_config::{Config, EmptyConfigData, RawConfig};
    /// # use templa_core::Builder;
    /// # use templa_templates::InlineTemplate;
    /// # let config = Config::<EmptyConfigData>::new(RawConfig::new());
    /// # let template = InlineTemplate::new("zoo", "{{ zoo }}");
    /// let mut builder = Builder::new(
    ///     &config,
    ///     &template,
    ///     |rendered: &str| Ok(Some(rendered.to_string())),
    ///     |processed: Option<String>| Ok(processed),
    /// )?
    /// .with_process_hook(|mut context, next| {
    ///     context.insert("zoo".into(), "ZOO".into());
    ///     next.run(context)
    /// });
    ///
    /// let processed = builder.process_template(builder.init_builder_target())?;
    /// assert_eq!(builder.fetch_processed(&processed)?.as_deref(), Some("ZOO"));
    /// # Ok::<(), templa_core::BuilderError>(())
    /// ```
    pub fn with_process_hook<H>(mut self, hook: H) -> Self
    where
        H: Fn(RenderContext, Next<'_, RenderContext, Option<P>>) -> BuilderResult<Stamped<Option<P>>>
            + Send
            + Sync
            + 'static,
    {
        self.process_hooks.push(Box::new(hook));
        self
    }

    /// Wrap building with a hook.
    ///
    /// The hook gets a copy of the processed value and must hand it on with
    /// `next.run(processed)`; whatever stamped value it returns is stored as
    /// the built artifact. Hooks registered first run outermost.
    pub fn with_build_hook<H>(mut self, hook: H) -> Self
    where
        H: Fn(Option<P>, Next<'_, Option<P>, Option<B>>) -> BuilderResult<Stamped<Option<B>>>
            + Send
            + Sync
            + 'static,
    {
        self.build_hooks.push(Box::new(hook));
        self
    }

    pub fn id(&self) -> BuilderId {
        self.id
    }

    /// A copy of the builder's (loaded) config.
    pub fn config(&self) -> Config<D> {
        self.config.clone()
    }

    /// A copy of the builder's template getter.
    pub fn template_getter(&self) -> Box<dyn TemplateGettable> {
        self.template_getter.clone_box()
    }

    fn check_same_builder<S: Stage>(&self, target: &BuilderTarget<S>) -> BuilderResult<()> {
        if target.builder_id() != self.id {
            return Err(BuilderError::InstanceMismatch {
                expected: self.id,
                found: target.builder_id(),
            });
        }
        Ok(())
    }

    /// The target for the first stage.
    pub fn init_builder_target(&self) -> BuilderTarget<Initialized> {
        BuilderTarget::new(self.id)
    }

    /// A copy of the render context snapshot taken at construction.
    pub fn fetch_render_context<S: Stage>(
        &self,
        target: &BuilderTarget<S>,
    ) -> BuilderResult<RenderContext> {
        self.check_same_builder(target)?;
        Ok(self.render_context.clone())
    }

    /// Render the template with the render context and parse the result.
    pub fn process_template(
        &mut self,
        target: BuilderTarget<Initialized>,
    ) -> BuilderResult<BuilderTarget<Processed>> {
        let context = self.fetch_render_context(&target)?;

        let id = self.id;
        let template_getter = &self.template_getter;
        let parse_rendered_template = &self.parse_rendered_template;
        let base = move |context: RenderContext| -> BuilderResult<Option<P>> {
            let template = template_getter.get_template()?;
            let rendered = template.render(&context)?;
            trace!("Builder {} rendered {}: {:?}", id, template.name(), rendered);
            parse_rendered_template(&rendered).map_err(BuilderError::Parse)
        };

        let processed = Next::new(&self.process_hooks, &base).run(context)?;
        self.processed = processed.into_inner();

        debug!(
            "Builder {} processed template (value present: {})",
            self.id,
            self.processed.is_some()
        );
        Ok(target.advance())
    }

    /// A copy of the processed value.
    pub fn fetch_processed<S: ProcessedStage>(
        &self,
        target: &BuilderTarget<S>,
    ) -> BuilderResult<Option<P>> {
        self.check_same_builder(target)?;
        Ok(self.processed.clone())
    }

    /// Build the final artifact from a copy of the processed value.
    pub fn build(
        &mut self,
        target: BuilderTarget<Processed>,
    ) -> BuilderResult<BuilderTarget<Built>> {
        let processed = self.fetch_processed(&target)?;

        let build_processed = &self.build_processed;
        let base = move |processed: Option<P>| -> BuilderResult<Option<B>> {
            build_processed(processed).map_err(BuilderError::Build)
        };

        let built = Next::new(&self.build_hooks, &base).run(processed)?;
        self.built = built.into_inner();

        debug!(
            "Builder {} built artifact (value present: {})",
            self.id,
            self.built.is_some()
        );
        Ok(target.advance())
    }

    /// A copy of the built artifact.
    pub fn fetch_built(&self, target: &BuilderTarget<Built>) -> BuilderResult<Option<B>> {
        self.check_same_builder(target)?;
        Ok(self.built.clone())
    }

    /// Run every stage and return the built artifact.
    pub fn run(&mut self) -> BuilderResult<Option<B>> {
        let initialized = self.init_builder_target();
        let processed = self.process_template(initialized)?;
        let built = self.build(processed)?;
        self.fetch_built(&built)
    }
}

impl<D: fmt::Debug, P, B> fmt::Debug for Builder<D, P, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builder")
            .field("id", &self.id)
            .field("config", &self.config)
            .field("render_context", &self.render_context)
            .field("process_hooks", &self.process_hooks.len())
            .field("build_hooks", &self.build_hooks.len())
            .field("processed", &self.processed.is_some())
            .field("built", &self.built.is_some())
            .finish()
    }
}
