//! Application configuration management.
//!
//! This module handles loading and saving the application configuration:
//! the API base URL, request tuning, which backend holds the session, and
//! the last email used to log in.
//!
//! Configuration is stored at `~/.config/projectdesk/config.json`. Environment
//! variables (optionally from a `.env` file) override the file.

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::storage::{FileStore, KeyValueStore, KeychainStore};

/// Application name used for config/cache directory paths
pub const APP_NAME: &str = "projectdesk";

/// Config file name
const CONFIG_FILE: &str = "config.json";

pub const ENV_API_URL: &str = "PROJECTDESK_API_URL";
pub const ENV_STORAGE: &str = "PROJECTDESK_STORAGE";
pub const ENV_EMAIL: &str = "PROJECTDESK_EMAIL";

/// Which backend persists the session slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    #[default]
    File,
    Keyring,
}

impl FromStr for StorageKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(StorageKind::File),
            "keyring" | "keychain" => Ok(StorageKind::Keyring),
            other => Err(anyhow::anyhow!("Unknown storage backend: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub storage: StorageKind,
    pub max_rate_limit_retries: u32,
    pub initial_backoff_ms: u64,
    pub last_email: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080".to_string(),
            // 30s allows for slow API responses while failing fast enough for good UX
            request_timeout_secs: 30,
            storage: StorageKind::File,
            max_rate_limit_retries: 3,
            initial_backoff_ms: 1000,
            last_email: None,
        }
    }
}

impl Config {
    /// Load the config file (defaults if missing) and apply env overrides.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&contents).context("Failed to parse config file")?
        } else {
            Self::default()
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Apply overrides from a variable lookup (the process environment in
    /// production).
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            self.api_base_url = url.trim().to_string();
        }
        if let Some(storage) = lookup(ENV_STORAGE) {
            match storage.parse() {
                Ok(kind) => self.storage = kind,
                Err(e) => warn!(error = %e, "Ignoring {}", ENV_STORAGE),
            }
        }
        if let Some(email) = lookup(ENV_EMAIL).filter(|v| !v.trim().is_empty()) {
            self.last_email = Some(email.trim().to_string());
        }
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    /// Open the configured session backend.
    pub fn open_storage(&self) -> Result<Arc<dyn KeyValueStore>> {
        match self.storage {
            StorageKind::File => {
                let store = FileStore::in_dir(&self.cache_dir()?)
                    .context("Failed to open session file")?;
                Ok(Arc::new(store))
            }
            StorageKind::Keyring => Ok(Arc::new(KeychainStore::new())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: Config = serde_json::from_str(r#"{"api_base_url":"https://api.example"}"#)
            .expect("parse");
        assert_eq!(config.api_base_url, "https://api.example");
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.storage, StorageKind::File);
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            (ENV_API_URL, " https://staging.example "),
            (ENV_STORAGE, "keyring"),
            (ENV_EMAIL, "ana@example.com"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_env(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.api_base_url, "https://staging.example");
        assert_eq!(config.storage, StorageKind::Keyring);
        assert_eq!(config.last_email.as_deref(), Some("ana@example.com"));
    }

    #[test]
    fn test_invalid_storage_override_is_ignored() {
        let mut config = Config::default();
        config.apply_env(|k| (k == ENV_STORAGE).then(|| "floppy".to_string()));
        assert_eq!(config.storage, StorageKind::File);
    }
}
