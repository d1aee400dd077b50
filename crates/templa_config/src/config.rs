//! Config: a raw mapping, the record loaded from it, and the render context
//! derived from that record.
//!
//! # Render-context derivation
//!
//! The base derivation turns the loaded record into a flat mapping of field
//! names to values, or an empty mapping when nothing is loaded. Callers extend
//! it by registering context hooks. A hook receives the record and a
//! [`ContextNext`] handle; calling [`ContextNext::run`] invokes the next hook
//! in the chain or, at the end of it, the base derivation:
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use templa_config::{Config, RawConfig};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! struct Greeting {
//!     name: String,
//! }
//!
//! let mut raw = RawConfig::new();
//! raw.insert("name".into(), "world".into());
//!
//! let mut config = Config::<Greeting>::new(raw).with_context_hook(|data, next| {
//!     let mut context = next.run(data)?;
//!     context.insert("punctuation".into(), "!".into());
//!     Ok(context)
//! });
//! config.load_config().unwrap();
//!
//! let context = config.get_render_context().unwrap();
//! assert_eq!(context["name"], "world");
//! assert_eq!(context["punctuation"], "!");
//! ```

use std::any::type_name;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::error::{ConfigError, ConfigResult};
use crate::record::{ConfigData, RawConfig, RenderContext};

/// A render-context hook registered with [`Config::with_context_hook`].
pub type ContextHook<D> =
    Arc<dyn Fn(Option<&D>, ContextNext<'_, D>) -> ConfigResult<RenderContext> + Send + Sync>;

/// Handle to the remainder of a render-context hook chain.
pub struct ContextNext<'a, D> {
    hooks: &'a [ContextHook<D>],
}

impl<'a, D: ConfigData> ContextNext<'a, D> {
    /// Run the next hook, or the base derivation once the chain is exhausted.
    pub fn run(self, data: Option<&D>) -> ConfigResult<RenderContext> {
        match self.hooks.split_first() {
            Some((hook, rest)) => hook(data, ContextNext { hooks: rest }),
            None => base_render_context(data),
        }
    }
}

/// Base derivation: the record's fields, or nothing when no record is loaded.
pub fn base_render_context<D: ConfigData>(data: Option<&D>) -> ConfigResult<RenderContext> {
    let Some(data) = data else {
        return Ok(RenderContext::new());
    };

    match serde_json::to_value(data)? {
        Value::Object(fields) => Ok(fields),
        _ => Err(ConfigError::NotARecord(type_name::<D>())),
    }
}

/// Configuration source for a builder.
///
/// Holds a private copy of the raw mapping it was created from. The record
/// (`D`) is only materialized by [`Config::load_config`].
#[derive(Clone)]
pub struct Config<D> {
    raw: RawConfig,
    data: Option<D>,
    context_hooks: Vec<ContextHook<D>>,
}

impl<D: ConfigData> Config<D> {
    /// Create a config from a raw mapping. Nothing is validated yet.
    pub fn new(raw: RawConfig) -> Self {
        Self {
            raw,
            data: None,
            context_hooks: Vec::new(),
        }
    }

    /// Create a config from an arbitrary JSON value, which must be an object.
    pub fn from_value(value: Value) -> ConfigResult<Self> {
        match value {
            Value::Object(raw) => Ok(Self::new(raw)),
            other => Err(ConfigError::NotAMapping(value_kind(&other).to_string())),
        }
    }

    /// Register a render-context hook.
    ///
    /// Hooks registered first run outermost. A hook decides whether and when
    /// to call `next.run(..)`; skipping it replaces the base derivation.
    pub fn with_context_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(Option<&D>, ContextNext<'_, D>) -> ConfigResult<RenderContext>
            + Send
            + Sync
            + 'static,
    {
        self.context_hooks.push(Arc::new(hook));
        self
    }

    /// An independent copy of the raw mapping.
    pub fn raw_config_dict(&self) -> RawConfig {
        self.raw.clone()
    }

    /// Build the record from the raw mapping.
    ///
    /// Missing or mistyped fields fail with [`ConfigError::Validation`]. Keys
    /// the record ignores while deserializing fail with
    /// [`ConfigError::UnknownField`], named by their dotted path. A failed
    /// load leaves the config untouched.
    pub fn load_config(&mut self) -> ConfigResult<()> {
        let record = type_name::<D>();

        let mut unknown = None;
        let data: D = serde_ignored::deserialize(Value::Object(self.raw.clone()), |path| {
            if unknown.is_none() {
                unknown = Some(path.to_string());
            }
        })
        .map_err(|source| ConfigError::Validation { record, source })?;

        if let Some(field) = unknown {
            return Err(ConfigError::UnknownField { record, field });
        }

        debug!(record, fields = self.raw.len(), "Loaded config data");
        self.data = Some(data);
        Ok(())
    }

    /// The loaded record, if [`Config::load_config`] has run.
    pub fn data(&self) -> Option<&D> {
        self.data.as_ref()
    }

    /// The loaded record, or [`ConfigError::NotLoaded`].
    pub fn loaded_data(&self) -> ConfigResult<&D> {
        self.data.as_ref().ok_or(ConfigError::NotLoaded)
    }

    pub fn is_loaded(&self) -> bool {
        self.data.is_some()
    }

    /// Derive the render context through the hook chain.
    pub fn get_render_context(&self) -> ConfigResult<RenderContext> {
        ContextNext {
            hooks: &self.context_hooks,
        }
        .run(self.data.as_ref())
    }
}

impl<D: fmt::Debug> fmt::Debug for Config<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("raw", &self.raw)
            .field("data", &self.data)
            .field("context_hooks", &self.context_hooks.len())
            .finish()
    }
}

pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}
