//! The service configuration structure.

use std::time::Duration;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ConfigError, Result as ConfigResult};
use crate::vendor::default_vendor_table;

/// Settings for the preview bundling service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Bare package name → vendor asset URL.
    ///
    /// Tables from config files, environment and overrides are merged into
    /// the built-in table key by key: new packages are added, existing ones
    /// get the new URL. Entry order is not preserved across loading, so
    /// nothing downstream may depend on it.
    #[serde(default = "default_vendor_table")]
    pub vendor: IndexMap<String, String>,

    #[serde(default)]
    pub cache: CacheSettings,

    /// Global variable the IIFE bundle is assigned to.
    #[serde(default = "default_global_name")]
    pub global_name: String,

    /// Delay before the unsolicited `ready` announcement.
    #[serde(default = "default_ready_delay_ms")]
    pub ready_delay_ms: u64,

    #[serde(default)]
    pub log_level: Option<String>,
}

/// Build cache limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Freshness window of a cached build, in seconds.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    /// Maximum number of cached builds before the oldest insertion is evicted.
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

fn default_global_name() -> String {
    "__scenepack".to_string()
}

fn default_ready_delay_ms() -> u64 {
    100
}

fn default_ttl_secs() -> u64 {
    300
}

fn default_capacity() -> usize {
    100
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            vendor: default_vendor_table(),
            cache: CacheSettings::default(),
            global_name: default_global_name(),
            ready_delay_ms: default_ready_delay_ms(),
            log_level: None,
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            capacity: default_capacity(),
        }
    }
}

impl CacheSettings {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl ServiceConfig {
    /// Create from a `serde_json::Value`, filling unspecified fields with defaults.
    ///
    /// # Example
    ///
    /// ```
    /// use scenepack_config::ServiceConfig;
    /// use serde_json::json;
    ///
    /// let config = ServiceConfig::from_value(json!({
    ///     "cache": { "capacity": 10 }
    /// }))
    /// .unwrap();
    /// assert_eq!(config.cache.capacity, 10);
    /// assert_eq!(config.cache.ttl_secs, 300);
    /// ```
    pub fn from_value(value: Value) -> ConfigResult<Self> {
        let config: ServiceConfig = serde_json::from_value(value)
            .map_err(|e| ConfigError::invalid("config", e.to_string()))?;
        crate::validation::validate(&config)?;
        Ok(config)
    }

    pub fn ready_delay(&self) -> Duration {
        Duration::from_millis(self.ready_delay_ms)
    }
}
