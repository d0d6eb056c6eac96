//! Builder for informants whose baseline comes from configuration sources.

use crate::core::informant::{ConfigDataReloadInformant, DEFAULT_INTERVAL};
use crate::core::loader::{Loader, SourceLoader};
use crate::core::scheduler::Scheduler;
use crate::error::Result;
use crate::sources::{ConfigSource, EnvSource, FileSource};
use serde::de::DeserializeOwned;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

#[cfg(not(feature = "tokio-runtime"))]
use crate::error::ConfigError;

/// Builder for a [`ConfigDataReloadInformant`] backed by a [`SourceLoader`].
///
/// `build` performs the initial load, which becomes the baseline; the same
/// sources are then re-read on every poll cycle.
///
/// # Examples
///
/// ```rust,no_run
/// use config_reload_informant::prelude::*;
/// use std::time::Duration;
///
/// # #[tokio::main]
/// # async fn main() -> Result<()> {
/// let informant = ConfigDataReloadInformant::builder()
///     .with_file("config/default.yaml")
///     .with_file("config/production.yaml")
///     .with_env_overrides("APP", "__")
///     .with_interval(Duration::from_secs(30))
///     .build::<Snapshot>()?;
///
/// if informant.should_reload() {
///     // rebuild the server from fresh configuration
/// }
/// # Ok(())
/// # }
/// ```
pub struct InformantBuilder {
    file_paths: Vec<PathBuf>,
    env_prefix: Option<String>,
    env_separator: Option<String>,
    custom_sources: Vec<Box<dyn ConfigSource>>,
    interval: Duration,
    scheduler: Option<Box<dyn Scheduler>>,
}

impl InformantBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            file_paths: Vec::new(),
            env_prefix: None,
            env_separator: None,
            custom_sources: Vec::new(),
            interval: DEFAULT_INTERVAL,
            scheduler: None,
        }
    }

    /// Add a file source with automatic format detection.
    ///
    /// Supported formats: YAML (.yaml, .yml), TOML (.toml), JSON (.json).
    /// Later files have higher priority and override earlier ones.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_paths.push(path.into());
        self
    }

    /// Add environment variable overrides.
    ///
    /// `APP_SERVER__PORT=8080` with prefix `"APP"` and separator `"__"` becomes
    /// `server.port = 8080`. Environment variables take precedence over files.
    pub fn with_env_overrides(mut self, prefix: &str, separator: &str) -> Self {
        self.env_prefix = Some(prefix.to_string());
        self.env_separator = Some(separator.to_string());
        self
    }

    /// Add a custom configuration source.
    pub fn with_source<S: ConfigSource + 'static>(mut self, source: S) -> Self {
        self.custom_sources.push(Box::new(source));
        self
    }

    /// Set the polling interval (default 60 seconds).
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Run poll cycles on the given scheduler instead of the ambient tokio runtime.
    pub fn with_scheduler<S: Scheduler + 'static>(mut self, scheduler: S) -> Self {
        self.scheduler = Some(Box::new(scheduler));
        self
    }

    /// Load the baseline and build the informant.
    ///
    /// The initial load runs on the calling thread and may block.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No sources were configured, or any source fails to load
    /// - The merged configuration cannot be deserialized into `T`
    /// - No scheduler was given and no tokio runtime is available
    pub fn build<T>(self) -> Result<ConfigDataReloadInformant<T>>
    where
        T: DeserializeOwned + PartialEq + Send + Sync + 'static,
    {
        let scheduler = match self.scheduler {
            Some(scheduler) => scheduler,
            None => default_scheduler()?,
        };

        let mut loader = SourceLoader::new();

        for (index, path) in self.file_paths.iter().enumerate() {
            let priority = 100 + (index as i32 * 10);
            loader.add_source(Box::new(FileSource::new(path).with_priority(priority)));
        }

        for source in self.custom_sources {
            loader.add_source(source);
        }

        if let (Some(prefix), Some(separator)) = (self.env_prefix, self.env_separator) {
            loader.add_source(Box::new(EnvSource::new(prefix, separator)));
        }

        let baseline: T = loader.load()?;
        debug!(sources = ?loader.source_names(), "Loaded baseline configuration");

        Ok(ConfigDataReloadInformant::new(baseline, loader, scheduler).with_interval(self.interval))
    }
}

impl Default for InformantBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "tokio-runtime")]
fn default_scheduler() -> Result<Box<dyn Scheduler>> {
    Ok(Box::new(crate::core::TokioScheduler::try_current()?))
}

#[cfg(not(feature = "tokio-runtime"))]
fn default_scheduler() -> Result<Box<dyn Scheduler>> {
    Err(ConfigError::FeatureNotEnabled("tokio-runtime"))
}
