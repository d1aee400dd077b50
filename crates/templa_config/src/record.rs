//! Configuration record types.
//!
//! A record is the validated, immutable shape of a configuration. Any plain
//! serde type qualifies; the [`Config`](crate::Config) that owns it only ever
//! hands out shared references, so a loaded record is never mutated.

use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Raw, unvalidated configuration mapping as supplied by the caller.
pub type RawConfig = serde_json::Map<String, serde_json::Value>;

/// Mapping from variable name to value handed to the template engine.
pub type RenderContext = serde_json::Map<String, serde_json::Value>;

/// Marker trait for configuration records.
///
/// Implemented for every type that can be deserialized from the raw mapping,
/// serialized back into a render context and cloned along with its config.
pub trait ConfigData:
    Serialize + DeserializeOwned + Clone + Debug + Send + Sync + 'static
{
}

impl<T> ConfigData for T where
    T: Serialize + DeserializeOwned + Clone + Debug + Send + Sync + 'static
{
}

/// A record without fields. Only an empty mapping loads into it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmptyConfigData {}

/// Record accepting any mapping as-is.
///
/// Used when the field shape is only known at runtime, e.g. for config files
/// passed on the command line.
pub type FreeformConfigData = RawConfig;
