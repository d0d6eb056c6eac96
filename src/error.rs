//! Error types for config-reload-informant.

/// Result type alias for config-reload-informant operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur while loading configuration snapshots or wiring up an informant.
///
/// Errors raised by a [`Loader`](crate::core::Loader) during a background poll are
/// never surfaced to callers of `should_reload()`; they only show up here when
/// loading happens on the caller's own path (for example the initial load in
/// [`InformantBuilder::build`](crate::core::InformantBuilder::build)).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to load configuration from a source.
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    /// Failed to deserialize configuration into the snapshot type.
    #[error("Failed to deserialize configuration: {0}")]
    DeserializationError(String),

    /// Failed to parse a configuration file.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// No scheduler was supplied and none could be obtained from the environment.
    #[error("No scheduler available: {0}")]
    SchedulerUnavailable(String),

    /// Attempted to use a feature that is not enabled.
    #[error("Feature not enabled: {0}")]
    FeatureNotEnabled(&'static str),
}
