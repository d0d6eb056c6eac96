//! Snapshot loaders: the capability a poll cycle uses to fetch fresh configuration.

use crate::error::{ConfigError, Result};
use crate::sources::ConfigSource;
use serde::de::DeserializeOwned;

/// Produces a fresh configuration snapshot on demand.
///
/// Called from a background worker during each poll cycle. Implementations may
/// block (read files, hit the network); they must not assume they run on the
/// thread that queries the informant.
///
/// Any `Fn() -> Result<T> + Send + Sync` closure is a loader:
///
/// ```rust
/// use config_reload_informant::core::Loader;
/// use config_reload_informant::error::ConfigError;
/// use serde_json::json;
///
/// let loader = || Ok::<_, ConfigError>(json!({ "port": 8080 }));
/// assert_eq!(loader.load().unwrap()["port"], 8080);
/// ```
pub trait Loader<T>: Send + Sync {
    /// Load the current configuration snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error (typically [`ConfigError::LoadError`]) when the source is
    /// unreachable or its contents cannot be parsed.
    fn load(&self) -> Result<T>;
}

impl<T, F> Loader<T> for F
where
    F: Fn() -> Result<T> + Send + Sync,
{
    fn load(&self) -> Result<T> {
        self()
    }
}

/// Loads snapshots by merging multiple [`ConfigSource`]s.
///
/// Sources are merged in priority order (lowest first), so higher priority
/// sources override top-level keys from lower priority ones. The merged tree is
/// then deserialized into the snapshot type, which is usually
/// [`Snapshot`](crate::Snapshot) but may be any `DeserializeOwned` type.
pub struct SourceLoader {
    sources: Vec<Box<dyn ConfigSource>>,
}

impl SourceLoader {
    /// Create a loader with no sources.
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Add a configuration source.
    pub fn add_source(&mut self, source: Box<dyn ConfigSource>) {
        self.sources.push(source);
    }

    /// Number of registered sources.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Whether no sources have been registered.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Source names in the order they are merged.
    pub fn source_names(&self) -> Vec<String> {
        self.sorted_sources().iter().map(|s| s.name()).collect()
    }

    fn sorted_sources(&self) -> Vec<&Box<dyn ConfigSource>> {
        let mut sorted: Vec<_> = self.sources.iter().collect();
        sorted.sort_by_key(|s| s.priority());
        sorted
    }

    fn merge<T>(&self) -> Result<T>
    where
        T: DeserializeOwned,
    {
        if self.sources.is_empty() {
            return Err(ConfigError::LoadError(
                "No configuration sources specified".to_string(),
            ));
        }

        let mut builder = config::Config::builder();
        for source in self.sorted_sources() {
            let values = source.load().map_err(|e| {
                ConfigError::LoadError(format!("Failed to load source '{}': {}", source.name(), e))
            })?;

            for (key, value) in values {
                builder = builder.set_override(&key, value).map_err(|e| {
                    ConfigError::LoadError(format!(
                        "Failed to merge source '{}': {}",
                        source.name(),
                        e
                    ))
                })?;
            }
        }

        let merged = builder
            .build()
            .map_err(|e| ConfigError::LoadError(format!("Failed to build configuration: {}", e)))?;

        merged.try_deserialize::<T>().map_err(|e| {
            ConfigError::DeserializationError(format!("Failed to deserialize configuration: {}", e))
        })
    }
}

impl Default for SourceLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Loader<T> for SourceLoader
where
    T: DeserializeOwned,
{
    fn load(&self) -> Result<T> {
        self.merge()
    }
}

impl std::fmt::Debug for SourceLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceLoader")
            .field("sources", &self.source_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Snapshot;
    use serde::Deserialize;
    use serde_json::json;
    use std::collections::HashMap;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Listener {
        port: u16,
        host: String,
    }

    struct StaticSource {
        name: &'static str,
        priority: i32,
        values: HashMap<String, config::Value>,
        fail: bool,
    }

    impl StaticSource {
        fn new(name: &'static str, priority: i32) -> Self {
            Self {
                name,
                priority,
                values: HashMap::new(),
                fail: false,
            }
        }

        fn with_value(mut self, key: &str, value: impl Into<config::Value>) -> Self {
            self.values.insert(key.to_string(), value.into());
            self
        }

        fn failing(mut self) -> Self {
            self.fail = true;
            self
        }
    }

    impl ConfigSource for StaticSource {
        fn load(&self) -> Result<HashMap<String, config::Value>> {
            if self.fail {
                return Err(ConfigError::LoadError("source offline".to_string()));
            }
            Ok(self.values.clone())
        }

        fn name(&self) -> String {
            self.name.to_string()
        }

        fn priority(&self) -> i32 {
            self.priority
        }
    }

    #[test]
    fn test_closure_is_a_loader() {
        let loader = || Ok::<_, ConfigError>(json!({ "a": 1 }));
        assert_eq!(Loader::load(&loader).unwrap(), json!({ "a": 1 }));
    }

    #[test]
    fn test_empty_loader_fails() {
        let loader = SourceLoader::new();
        let result: Result<Snapshot> = loader.load();
        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }

    #[test]
    fn test_loads_typed_snapshot() {
        let mut loader = SourceLoader::new();
        loader.add_source(Box::new(
            StaticSource::new("static", 100)
                .with_value("port", 8080i64)
                .with_value("host", "localhost"),
        ));

        let listener: Listener = loader.load().unwrap();
        assert_eq!(
            listener,
            Listener {
                port: 8080,
                host: "localhost".to_string()
            }
        );
    }

    #[test]
    fn test_loads_json_tree() {
        let mut loader = SourceLoader::new();
        loader.add_source(Box::new(
            StaticSource::new("static", 100).with_value("a", 1i64),
        ));

        let snapshot: Snapshot = loader.load().unwrap();
        assert_eq!(snapshot, json!({ "a": 1 }));
    }

    #[test]
    fn test_higher_priority_overrides() {
        let mut loader = SourceLoader::new();
        loader.add_source(Box::new(
            StaticSource::new("override", 200).with_value("port", 9090i64),
        ));
        loader.add_source(Box::new(
            StaticSource::new("default", 100)
                .with_value("port", 8080i64)
                .with_value("host", "localhost"),
        ));

        let listener: Listener = loader.load().unwrap();
        assert_eq!(listener.port, 9090);
        assert_eq!(listener.host, "localhost");
    }

    #[test]
    fn test_failing_source_names_itself() {
        let mut loader = SourceLoader::new();
        loader.add_source(Box::new(StaticSource::new("flaky", 100).failing()));

        let err = Loader::<Snapshot>::load(&loader).unwrap_err();
        assert!(err.to_string().contains("flaky"));
    }

    #[test]
    fn test_source_names_in_merge_order() {
        let mut loader = SourceLoader::new();
        loader.add_source(Box::new(StaticSource::new("files", 100)));
        loader.add_source(Box::new(StaticSource::new("env", 300)));
        loader.add_source(Box::new(StaticSource::new("remote", 50)));

        assert_eq!(loader.len(), 3);
        assert_eq!(loader.source_names(), vec!["remote", "files", "env"]);
    }
}
