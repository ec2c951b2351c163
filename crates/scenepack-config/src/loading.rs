//! Layered configuration loading.
//!
//! Priority: overrides > environment variables > config file > defaults.
//! Tables merge key by key, so a `[vendor]` section extends the built-in
//! vendor table instead of replacing it.

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format as _, Json, Serialized, Toml},
};
use serde_json::Value;

use crate::config::ServiceConfig;
use crate::error::{ConfigError, Result};

/// Prefix for environment overrides (`SCENEPACK_GLOBAL_NAME`, `SCENEPACK_CACHE__CAPACITY`).
pub const ENV_PREFIX: &str = "SCENEPACK_";

const DEFAULT_FILES: &[&str] = &["scenepack.toml", "scenepack.json"];

/// Builder for loading a [`ServiceConfig`] from every source.
///
/// # Example
///
/// ```no_run
/// use scenepack_config::ConfigLoader;
///
/// let config = ConfigLoader::new(".").load().unwrap();
/// println!("{} vendor packages", config.vendor.len());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    root: PathBuf,
    file: Option<PathBuf>,
    overrides: Option<Value>,
}

impl ConfigLoader {
    /// Look for config files in `root`.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            file: None,
            overrides: None,
        }
    }

    /// Use an explicit config file instead of discovery. The file must exist.
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Values merged last, above environment variables (CLI flags).
    pub fn overrides(mut self, value: Value) -> Self {
        self.overrides = Some(value);
        self
    }

    /// Find the config file that would be loaded, if any.
    pub fn find(&self) -> Option<PathBuf> {
        DEFAULT_FILES
            .iter()
            .map(|name| self.root.join(name))
            .find(|path| path.is_file())
    }

    pub fn load(&self) -> Result<ServiceConfig> {
        let mut figment = Figment::new().merge(Serialized::defaults(ServiceConfig::default()));

        let file = match &self.file {
            Some(path) if !path.is_file() => return Err(ConfigError::FileNotFound(path.clone())),
            Some(path) => Some(path.clone()),
            None => self.find(),
        };

        if let Some(path) = file {
            tracing::debug!(path = %path.display(), "loading config file");
            figment = match path.extension().and_then(|ext| ext.to_str()) {
                Some("toml") => figment.merge(Toml::file(&path)),
                Some("json") => figment.merge(Json::file(&path)),
                other => {
                    return Err(ConfigError::UnsupportedFormat(
                        other.unwrap_or("<none>").to_string(),
                    ));
                }
            };
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        if let Some(overrides) = &self.overrides {
            figment = figment.merge(Serialized::defaults(overrides));
        }

        let config: ServiceConfig = figment.extract()?;
        crate::validation::validate(&config)?;
        Ok(config)
    }
}
