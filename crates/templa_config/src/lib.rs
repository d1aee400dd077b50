//! # templa_config
//!
//! Configuration records and render-context derivation for templa.
//!
//! A [`Config`] wraps a raw key/value mapping and a record type. Loading the
//! config validates the mapping against the record; the loaded record is then
//! turned into the render context handed to the template engine.
//!
//! ## Example
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use templa_config::Config;
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! struct Service {
//!     name: String,
//!     replicas: u32,
//! }
//!
//! let mut config = Config::<Service>::from_yaml_str("name: api\nreplicas: 3\n").unwrap();
//! config.load_config().unwrap();
//!
//! assert_eq!(config.loaded_data().unwrap().replicas, 3);
//! assert_eq!(config.get_render_context().unwrap()["name"], "api");
//! ```

pub mod config;
pub mod error;
pub mod reader;
pub mod record;

pub use config::{base_render_context, Config, ContextHook, ContextNext};
pub use error::{ConfigError, ConfigResult};
pub use reader::ConfigFormat;
pub use record::{ConfigData, EmptyConfigData, FreeformConfigData, RawConfig, RenderContext};
