//! Environment variable configuration source.

use super::ConfigSource;
use crate::error::{ConfigError, Result};
use config::Environment;
use std::collections::HashMap;

/// Environment variables sharing a prefix.
///
/// With prefix `APP` and separator `__`, `APP_SERVER__PORT=8080` becomes
/// `server.port = 8080`. Values that look like numbers or booleans are parsed as
/// such. The process environment is captured afresh on every `load`.
///
/// # Examples
///
/// ```rust
/// use config_reload_informant::sources::{ConfigSource, EnvSource};
///
/// let source = EnvSource::new("APP", "__");
/// assert_eq!(source.name(), "env:APP*");
/// ```
#[derive(Debug, Clone)]
pub struct EnvSource {
    prefix: String,
    separator: String,
    priority: i32,
}

impl EnvSource {
    /// Create an environment source with the default priority (300).
    pub fn new(prefix: impl Into<String>, separator: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            separator: separator.into(),
            priority: 300,
        }
    }

    /// Set the priority for this source.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

impl ConfigSource for EnvSource {
    fn load(&self) -> Result<HashMap<String, config::Value>> {
        // Without an explicit prefix separator `config` reuses `separator`,
        // which would only match `APP__SERVER__PORT`.
        let environment = Environment::with_prefix(&self.prefix)
            .prefix_separator("_")
            .separator(&self.separator)
            .try_parsing(true);

        config::Config::builder()
            .add_source(environment)
            .build()
            .map_err(|e| {
                ConfigError::LoadError(format!("Failed to read environment variables: {}", e))
            })?
            .try_deserialize::<HashMap<String, config::Value>>()
            .map_err(|e| {
                ConfigError::DeserializationError(format!(
                    "Failed to parse environment variables: {}",
                    e
                ))
            })
    }

    fn name(&self) -> String {
        format!("env:{}*", self.prefix)
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}
