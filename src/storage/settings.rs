//! Client settings management

use crate::error::Result;
use crate::utils::paths::{ensure_dir, get_config_dir, get_settings_path};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tokio::fs;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Where and how to reach the dashboard backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the dashboard backend
    pub backend_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Edit this config.json directly instead of going through the backend
    pub config_file: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            config_file: None,
        }
    }
}

impl Settings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

/// Load settings from file, merging with defaults
pub async fn load_settings() -> Result<Settings> {
    load_settings_from(Path::new(&get_settings_path())).await
}

pub async fn load_settings_from(path: &Path) -> Result<Settings> {
    if !path.exists() {
        return Ok(Settings::default());
    }

    let content = fs::read_to_string(path).await?;
    let mut settings: Settings = serde_json::from_str(&content)?;

    if settings.backend_url.trim().is_empty() {
        settings.backend_url = DEFAULT_BACKEND_URL.into();
    }
    Ok(settings)
}

/// Save settings to file
pub async fn save_settings(settings: &Settings) -> Result<()> {
    ensure_dir(&get_config_dir()).await?;
    let content = serde_json::to_string_pretty(settings)?;
    fs::write(get_settings_path(), content).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings_from(&dir.path().join("settings.json")).await.unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[tokio::test]
    async fn test_partial_file_merges_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"backend_url": "", "timeout_secs": 0}"#).unwrap();

        let settings = load_settings_from(&path).await.unwrap();
        assert_eq!(settings.backend_url, DEFAULT_BACKEND_URL);
        assert_eq!(settings.timeout(), Duration::from_secs(1));
        assert_eq!(settings.config_file, None);
    }
}
