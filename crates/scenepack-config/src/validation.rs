//! Schema-level validation (no filesystem checks).

use crate::config::ServiceConfig;
use crate::error::{ConfigError, Result};

/// Check a loaded configuration for values the bundler cannot work with.
pub fn validate(config: &ServiceConfig) -> Result<()> {
    if config.cache.capacity == 0 {
        return Err(ConfigError::invalid(
            "cache.capacity",
            "must be at least 1",
        ));
    }

    if config.cache.ttl_secs == 0 {
        return Err(ConfigError::invalid("cache.ttl_secs", "must be at least 1"));
    }

    if config.global_name.trim().is_empty() {
        return Err(ConfigError::invalid("global_name", "must not be empty"));
    }

    for (name, url) in &config.vendor {
        if name.is_empty() {
            return Err(ConfigError::invalid("vendor", "package name must not be empty"));
        }
        if name.starts_with('.') || name.starts_with('/') {
            return Err(ConfigError::invalid(
                "vendor",
                format!("`{name}` is a path, not a bare package name"),
            ));
        }
        if url.trim().is_empty() {
            return Err(ConfigError::invalid(
                "vendor",
                format!("`{name}` has an empty asset URL"),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate(&ServiceConfig::default()).is_ok());
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let mut config = ServiceConfig::default();
        config.cache.capacity = 0;
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("cache.capacity"));
    }

    #[test]
    fn relative_vendor_name_is_rejected() {
        let mut config = ServiceConfig::default();
        config
            .vendor
            .insert("./local".to_string(), "vendor://local.js".to_string());
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("./local"));
    }

    #[test]
    fn empty_url_is_rejected() {
        let mut config = ServiceConfig::default();
        config.vendor.insert("three".to_string(), " ".to_string());
        assert!(validate(&config).is_err());
    }
}
