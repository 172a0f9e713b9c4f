use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::RunbeatError;

const CONFIG_VERSION: &str = "1.0";

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configuration metadata
    pub metadata: ConfigMetadata,

    /// Activity data source credentials, injected into the fetch layer.
    /// The core never reads these from ambient process state.
    pub data_source: DataSourceConfig,
}

/// Configuration metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigMetadata {
    /// Configuration format version
    pub version: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

/// Credentials for the activity data source collaborator
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataSourceConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

impl DataSourceConfig {
    /// Access token required by the data source; absence is a validation
    /// failure reported before any fetch is attempted
    pub fn require_access_token(&self) -> crate::error::Result<&str> {
        self.access_token
            .as_deref()
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                RunbeatError::Validation("no data source access token configured".to_string())
            })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            metadata: ConfigMetadata {
                version: CONFIG_VERSION.to_string(),
                created_at: now,
                updated_at: now,
            },
            data_source: DataSourceConfig::default(),
        }
    }
}

impl AppConfig {
    /// Default configuration file location under the user config directory
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("could not determine user config directory")?;
        Ok(config_dir.join("runbeat").join("config.toml"))
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Load from the given path, falling back to defaults when the file does
    /// not exist yet
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Persist configuration as TOML, creating parent directories as needed
    pub fn save(&mut self, path: &Path) -> Result<()> {
        self.metadata.updated_at = Utc::now();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create config directory: {}", parent.display()))?;
        }
        let contents = toml::to_string_pretty(self).context("failed to serialize config")?;
        fs::write(path, contents)
            .with_context(|| format!("failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Set one recognized key, dotted form (e.g. `data_source.access_token`)
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "data_source.client_id" => self.data_source.client_id = Some(value.to_string()),
            "data_source.client_secret" => self.data_source.client_secret = Some(value.to_string()),
            "data_source.access_token" => self.data_source.access_token = Some(value.to_string()),
            "data_source.refresh_token" => self.data_source.refresh_token = Some(value.to_string()),
            _ => anyhow::bail!("unknown configuration key: {}", key),
        }
        Ok(())
    }

    /// Get one recognized key. Secrets are returned as stored; masking is
    /// the display layer's concern.
    pub fn get_value(&self, key: &str) -> Result<Option<&str>> {
        let value = match key {
            "data_source.client_id" => self.data_source.client_id.as_deref(),
            "data_source.client_secret" => self.data_source.client_secret.as_deref(),
            "data_source.access_token" => self.data_source.access_token.as_deref(),
            "data_source.refresh_token" => self.data_source.refresh_token.as_deref(),
            _ => anyhow::bail!("unknown configuration key: {}", key),
        };
        Ok(value)
    }

    /// All recognized keys with whether they are currently set
    pub fn list_keys(&self) -> Vec<(&'static str, bool)> {
        vec![
            ("data_source.client_id", self.data_source.client_id.is_some()),
            ("data_source.client_secret", self.data_source.client_secret.is_some()),
            ("data_source.access_token", self.data_source.access_token.is_some()),
            ("data_source.refresh_token", self.data_source.refresh_token.is_some()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = AppConfig::default();
        config
            .set_value("data_source.access_token", "token-123")
            .unwrap();
        config.save(&path).unwrap();

        let loaded = AppConfig::load(&path).unwrap();
        assert_eq!(loaded.data_source.access_token.as_deref(), Some("token-123"));
        assert_eq!(loaded.metadata.version, CONFIG_VERSION);
    }

    #[test]
    fn test_load_or_default_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        let config = AppConfig::load_or_default(&path).unwrap();
        assert!(config.data_source.access_token.is_none());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let mut config = AppConfig::default();
        assert!(config.set_value("data_source.password", "x").is_err());
        assert!(config.get_value("nope").is_err());
    }

    #[test]
    fn test_require_access_token() {
        let mut source = DataSourceConfig::default();
        assert!(source.require_access_token().is_err());

        source.access_token = Some(String::new());
        assert!(source.require_access_token().is_err());

        source.access_token = Some("token".to_string());
        assert_eq!(source.require_access_token().unwrap(), "token");
    }

    #[test]
    fn test_list_keys_reports_presence() {
        let mut config = AppConfig::default();
        config.set_value("data_source.client_id", "abc").unwrap();
        let keys = config.list_keys();
        assert!(keys.contains(&("data_source.client_id", true)));
        assert!(keys.contains(&("data_source.access_token", false)));
    }
}
