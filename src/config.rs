//! Configuration file handling.
//!
//! The configuration file is stored at `$HOME/.expense-tracker/config.json` unless another path
//! is given, and holds the address of the backend. A missing file is not an error: the defaults
//! point at a backend on `localhost`.

use crate::{utils, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;
use url::Url;

const APP_NAME: &str = "expense-tracker";
const CONFIG_VERSION: u8 = 1;
const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// The `Config` object represents the configuration of the app, loaded from `config.json` and
/// adjusted by command line overrides.
#[derive(Debug, Clone)]
pub struct Config {
    config_path: PathBuf,
    config_file: ConfigFile,
    base_url: Url,
}

impl Config {
    /// Loads the configuration file at `path`, falling back to the defaults when it does not
    /// exist.
    ///
    /// # Errors
    /// - The file exists but cannot be read or parsed.
    /// - The file belongs to another application or holds an invalid `base_url`.
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let config_path = path.into();
        let config_file = if config_path.is_file() {
            ConfigFile::load(&config_path).await?
        } else {
            debug!(
                "No config file at {}, using defaults",
                config_path.display()
            );
            ConfigFile::default()
        };
        let base_url = Url::parse(&config_file.base_url)
            .with_context(|| format!("Invalid base_url '{}'", config_file.base_url))?;
        Ok(Self {
            config_path,
            config_file,
            base_url,
        })
    }

    /// Replaces the backend address, e.g. from `--base-url`.
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.config_file.base_url = base_url.to_string();
        self.base_url = base_url;
        self
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn app_name(&self) -> &str {
        &self.config_file.app_name
    }

    pub fn config_version(&self) -> u8 {
        self.config_file.config_version
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "expense-tracker",
///   "config_version": 1,
///   "base_url": "http://localhost:8000"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "expense-tracker"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Root URL of the backend. Endpoint paths such as `/api/expenses` are resolved below it,
    /// keeping any path prefix.
    #[serde(default = "default_base_url")]
    base_url: String,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            base_url: default_base_url(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl ConfigFile {
    async fn load(path: &Path) -> Result<Self> {
        let config: ConfigFile = utils::deserialize(path).await?;
        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );
        Ok(config)
    }
}

/// The default location of the configuration file, `$HOME/.expense-tracker/config.json`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".expense-tracker").join("config.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn write_config(dir: &TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("config.json");
        tokio::fs::write(&path, contents).await.unwrap();
        path
    }

    #[tokio::test]
    async fn test_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(dir.path().join("nope.json")).await.unwrap();
        assert_eq!(config.base_url().as_str(), "http://localhost:8000/");
        assert_eq!(config.app_name(), "expense-tracker");
    }

    #[tokio::test]
    async fn test_load_file() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"{"app_name":"expense-tracker","config_version":1,"base_url":"https://gastos.example.com"}"#,
        )
        .await;
        let config = Config::load(&path).await.unwrap();
        assert_eq!(config.base_url().host_str(), Some("gastos.example.com"));
        assert_eq!(config.config_path(), path.as_path());
    }

    #[tokio::test]
    async fn test_base_url_defaults_when_omitted() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, r#"{"app_name":"expense-tracker","config_version":1}"#).await;
        let config = Config::load(&path).await.unwrap();
        assert_eq!(config.base_url().port(), Some(8000));
    }

    #[tokio::test]
    async fn test_wrong_app_name() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, r#"{"app_name":"other-app","config_version":1}"#).await;
        let e = Config::load(&path).await.unwrap_err();
        assert!(e.to_string().contains("Invalid app_name"));
    }

    #[tokio::test]
    async fn test_invalid_base_url() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"{"app_name":"expense-tracker","config_version":1,"base_url":"not a url"}"#,
        )
        .await;
        assert!(Config::load(&path).await.is_err());
    }

    #[tokio::test]
    async fn test_override() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(dir.path().join("config.json"))
            .await
            .unwrap()
            .with_base_url(Url::parse("http://10.0.0.2:9000").unwrap());
        assert_eq!(config.base_url().as_str(), "http://10.0.0.2:9000/");
    }
}
