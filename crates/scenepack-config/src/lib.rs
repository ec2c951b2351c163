//! Configuration for the scenepack preview bundler.
//!
//! Settings are layered with `figment`: built-in defaults, then an optional
//! `scenepack.toml` / `scenepack.json` file, then `SCENEPACK_` environment
//! variables. Callers that already hold a config value (tests, embedders)
//! can skip discovery and use [`ServiceConfig::from_value`] directly.

pub mod config;
pub mod error;
pub mod loading;
pub mod validation;
pub mod vendor;

pub use config::{CacheSettings, ServiceConfig};
pub use error::{ConfigError, Result};
pub use loading::{ConfigLoader, ENV_PREFIX};
pub use validation::validate;
pub use vendor::{VENDOR_SCHEME, default_vendor_table};
