//! API configuration
//!
//! # Config file
//! Settings live in `config.toml` inside the platform config directory
//! (`$XDG_CONFIG_HOME/downbooru/` on Linux), or inside `$DOWNBOORU_CONFIG_DIR` when set.
//!
//! ```toml
//! api_url = "https://gelbooru.com/index.php?page=dapi&s=post&q=index"
//! api_key = "..."
//! user_id = "..."
//! timeout = 30 # seconds
//! ```
//!
//! Every key is optional and a missing file means anonymous access with the defaults. The
//! `DOWNBOORU_API_KEY` and `DOWNBOORU_USER_ID` env vars take precedence over the file.
use std::{
    env, io,
    path::{Path, PathBuf},
    time::Duration,
};

use directories::ProjectDirs;
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::fs::read_to_string;

pub const DEFAULT_API_URL: &str = "https://gelbooru.com/index.php?page=dapi&s=post&q=index";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const CONFIG_FILE: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    ReadFail { path: String, source: io::Error },

    #[error("Failed parsing the config file {path}: {source}")]
    DecodeError {
        path: String,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiCredentials {
    pub api_key: String,
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    pub user_id: Option<String>,
    /// Request timeout in seconds, applied to every API and image request.
    pub timeout: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            user_id: None,
            timeout: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ApiConfig {
    /// Loads the config file (if any) and applies env var overrides.
    pub async fn load() -> Result<Self, ConfigError> {
        let mut cfg = match config_dir() {
            Some(dir) => Self::from_file(&dir.join(CONFIG_FILE)).await?,
            None => {
                debug!("No config directory available, using defaults");
                Self::default()
            }
        };

        cfg.apply_env(
            env::var("DOWNBOORU_API_KEY").ok(),
            env::var("DOWNBOORU_USER_ID").ok(),
        );
        Ok(cfg)
    }

    pub async fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!("Config file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }

        let raw = read_to_string(path)
            .await
            .map_err(|source| ConfigError::ReadFail {
                path: path.display().to_string(),
                source,
            })?;

        let cfg = toml::from_str::<Self>(&raw).map_err(|source| ConfigError::DecodeError {
            path: path.display().to_string(),
            source,
        })?;
        debug!("Config file decoded");
        Ok(cfg)
    }

    fn apply_env(&mut self, api_key: Option<String>, user_id: Option<String>) {
        if let Some(key) = api_key.filter(|k| !k.is_empty()) {
            self.api_key = Some(key);
        }
        if let Some(id) = user_id.filter(|i| !i.is_empty()) {
            self.user_id = Some(id);
        }
    }

    /// Credentials are only used when both halves are present.
    pub fn credentials(&self) -> Option<ApiCredentials> {
        match (&self.api_key, &self.user_id) {
            (Some(api_key), Some(user_id)) => Some(ApiCredentials {
                api_key: api_key.clone(),
                user_id: user_id.clone(),
            }),
            _ => None,
        }
    }

    #[inline]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

fn config_dir() -> Option<PathBuf> {
    if let Ok(dir) = env::var("DOWNBOORU_CONFIG_DIR") {
        return Some(PathBuf::from(dir));
    }
    ProjectDirs::from("com", "downbooru", "downbooru").map(|p| p.config_dir().to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[tokio::test]
    async fn missing_file_gives_defaults() {
        let dir = TempDir::new("config").unwrap();
        let cfg = ApiConfig::from_file(&dir.path().join(CONFIG_FILE))
            .await
            .unwrap();
        assert_eq!(cfg, ApiConfig::default());
        assert!(cfg.credentials().is_none());
    }

    #[tokio::test]
    async fn partial_file_keeps_defaults_for_the_rest() {
        let dir = TempDir::new("config").unwrap();
        let path = dir.path().join(CONFIG_FILE);
        tokio::fs::write(&path, "api_key = \"abc\"\nuser_id = \"42\"\n")
            .await
            .unwrap();

        let cfg = ApiConfig::from_file(&path).await.unwrap();
        assert_eq!(cfg.api_url, DEFAULT_API_URL);
        assert_eq!(cfg.timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(
            cfg.credentials(),
            Some(ApiCredentials {
                api_key: "abc".into(),
                user_id: "42".into()
            })
        );
    }

    #[tokio::test]
    async fn broken_file_is_an_error() {
        let dir = TempDir::new("config").unwrap();
        let path = dir.path().join(CONFIG_FILE);
        tokio::fs::write(&path, "timeout = \"soon\"").await.unwrap();

        assert!(matches!(
            ApiConfig::from_file(&path).await,
            Err(ConfigError::DecodeError { .. })
        ));
    }

    #[test]
    fn env_overrides_and_half_credentials() {
        let mut cfg = ApiConfig::default();
        cfg.apply_env(Some("key".into()), None);
        assert_eq!(cfg.api_key.as_deref(), Some("key"));
        assert!(cfg.credentials().is_none());

        cfg.apply_env(Some(String::new()), Some("7".into()));
        assert_eq!(cfg.api_key.as_deref(), Some("key"));
        assert!(cfg.credentials().is_some());
    }
}
