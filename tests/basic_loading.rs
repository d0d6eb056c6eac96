//! Integration tests for loading the baseline snapshot through the builder.

#![allow(unsafe_code)] // For env var manipulation in tests

use config_reload_informant::prelude::*;
use config_reload_informant::sources::FileSource;
use serde::Deserialize;
use serde_json::json;
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

#[derive(Debug, Deserialize, Clone, PartialEq)]
struct ServerConfig {
    port: u16,
    host: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
struct DatabaseConfig {
    url: String,
    max_connections: u32,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
struct AppConfig {
    server: ServerConfig,
    database: DatabaseConfig,
}

const APP_YAML: &str = r#"
server:
  port: 8080
  host: localhost
database:
  url: postgres://localhost/db
  max_connections: 10
"#;

#[tokio::test]
async fn test_typed_baseline_from_yaml() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, APP_YAML).unwrap();

    let informant = ConfigDataReloadInformant::builder()
        .with_file(&config_path)
        .build::<AppConfig>()
        .unwrap();

    let baseline = informant.baseline();
    assert_eq!(baseline.server.port, 8080);
    assert_eq!(baseline.server.host, "localhost");
    assert_eq!(baseline.database.url, "postgres://localhost/db");
    assert_eq!(baseline.database.max_connections, 10);
    assert_eq!(informant.interval(), Duration::from_secs(60));
}

#[tokio::test]
async fn test_tree_baseline_from_toml() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        r#"
[server]
port = 8080
hosts = ["a", "b"]
"#,
    )
    .unwrap();

    let informant = ConfigDataReloadInformant::builder()
        .with_file(&config_path)
        .build::<Snapshot>()
        .unwrap();

    assert_eq!(
        informant.baseline(),
        &json!({ "server": { "port": 8080, "hosts": ["a", "b"] } })
    );
}

#[tokio::test]
async fn test_later_file_overrides_top_level_keys() {
    let temp_dir = TempDir::new().unwrap();
    let default_path = temp_dir.path().join("default.json");
    let site_path = temp_dir.path().join("site.json");
    fs::write(&default_path, r#"{ "mode": "dev", "workers": 2 }"#).unwrap();
    fs::write(&site_path, r#"{ "mode": "prod" }"#).unwrap();

    let informant = ConfigDataReloadInformant::builder()
        .with_file(&default_path)
        .with_file(&site_path)
        .build::<Snapshot>()
        .unwrap();

    assert_eq!(informant.baseline(), &json!({ "mode": "prod", "workers": 2 }));
}

#[tokio::test]
async fn test_env_overrides_files() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.json");
    fs::write(&config_path, r#"{ "mode": "dev", "workers": 2 }"#).unwrap();

    unsafe {
        std::env::set_var("CRI_BASIC_WORKERS", "8");
    }

    let informant = ConfigDataReloadInformant::builder()
        .with_file(&config_path)
        .with_env_overrides("CRI_BASIC", "__")
        .build::<Snapshot>()
        .unwrap();

    unsafe {
        std::env::remove_var("CRI_BASIC_WORKERS");
    }

    assert_eq!(informant.baseline(), &json!({ "mode": "dev", "workers": 8 }));
}

#[tokio::test]
async fn test_custom_source_priority() {
    let temp_dir = TempDir::new().unwrap();
    let low = temp_dir.path().join("low.json");
    let high = temp_dir.path().join("high.json");
    fs::write(&low, r#"{ "mode": "low" }"#).unwrap();
    fs::write(&high, r#"{ "mode": "high" }"#).unwrap();

    let informant = ConfigDataReloadInformant::builder()
        .with_source(FileSource::new(&high).with_priority(500))
        .with_source(FileSource::new(&low).with_priority(10))
        .build::<Snapshot>()
        .unwrap();

    assert_eq!(informant.baseline(), &json!({ "mode": "high" }));
}

#[tokio::test]
async fn test_missing_file_fails_build() {
    let result = ConfigDataReloadInformant::builder()
        .with_file("/nonexistent/config.yaml")
        .build::<Snapshot>();

    assert!(matches!(result, Err(ConfigError::LoadError(_))));
}

#[tokio::test]
async fn test_shape_mismatch_fails_build() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.json");
    fs::write(&config_path, r#"{ "server": { "port": "not a port" } }"#).unwrap();

    let result = ConfigDataReloadInformant::builder()
        .with_file(&config_path)
        .build::<AppConfig>();

    assert!(matches!(result, Err(ConfigError::DeserializationError(_))));
}
