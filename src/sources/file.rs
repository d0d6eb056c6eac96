//! File-based configuration source.

use super::ConfigSource;
use crate::error::{ConfigError, Result};
use config::{File, FileFormat};
use std::collections::HashMap;
use std::path::PathBuf;

/// Configuration file in YAML, TOML, or JSON.
///
/// The format is chosen from the extension (`.yaml`/`.yml`, `.toml`, `.json`).
/// The file is read afresh on every `load`, which is what lets a poll cycle
/// notice edits.
///
/// # Examples
///
/// ```rust,no_run
/// use config_reload_informant::sources::FileSource;
///
/// let source = FileSource::new("config/default.yaml").with_priority(150);
/// ```
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    priority: i32,
}

impl FileSource {
    /// Create a file source with the default file priority (100).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            priority: 100,
        }
    }

    /// Set the priority for this source.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    fn format(&self) -> Result<FileFormat> {
        let extension = self
            .path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| {
                ConfigError::LoadError(format!(
                    "Unable to determine file format for: {}",
                    self.path.display()
                ))
            })?;

        match extension {
            "yaml" | "yml" => Ok(FileFormat::Yaml),
            "toml" => Ok(FileFormat::Toml),
            "json" => Ok(FileFormat::Json),
            other => Err(ConfigError::LoadError(format!(
                "Unsupported file extension: {}. Supported: .yaml, .yml, .toml, .json",
                other
            ))),
        }
    }
}

impl ConfigSource for FileSource {
    fn load(&self) -> Result<HashMap<String, config::Value>> {
        let format = self.format()?;

        if !self.path.is_file() {
            return Err(ConfigError::LoadError(format!(
                "Configuration file not found: {}",
                self.path.display()
            )));
        }

        let parsed = config::Config::builder()
            .add_source(File::from(self.path.as_path()).format(format).required(true))
            .build()
            .map_err(|e| match &e {
                config::ConfigError::FileParse { .. } => ConfigError::ParseError(e.to_string()),
                _ => ConfigError::LoadError(format!("Failed to read file: {}", e)),
            })?;

        parsed
            .try_deserialize::<HashMap<String, config::Value>>()
            .map_err(|e| ConfigError::DeserializationError(format!("Failed to parse file: {}", e)))
    }

    fn name(&self) -> String {
        format!("file:{}", self.path.display())
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}
