//! Config store backed by a local config.json

use crate::error::{DashboardError, Result};
use crate::remote::ConfigStore;
use crate::types::Configuration;
use crate::utils::paths::ensure_dir;
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;
use tracing::debug;

/// Reads and writes the configuration document directly on disk
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

#[async_trait]
impl ConfigStore for FileStore {
    /// A missing file yields the default document
    async fn fetch(&self) -> Result<Configuration> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no config file yet, using defaults");
            return Ok(Configuration::default());
        }

        let content = fs::read_to_string(&self.path)
            .await
            .map_err(|e| DashboardError::Load(format!("{}: {}", self.path.display(), e)))?;
        if content.trim().is_empty() {
            return Ok(Configuration::default());
        }
        serde_json::from_str(&content)
            .map_err(|e| DashboardError::Load(format!("{}: {}", self.path.display(), e)))
    }

    async fn store(&self, config: &Configuration) -> Result<()> {
        let write = async {
            if let Some(parent) = self.path.parent() {
                ensure_dir(&parent.to_string_lossy()).await?;
            }
            let content = serde_json::to_string_pretty(config)?;
            // Write to a sibling file, then rename over the target
            let tmp = self.path.with_extension("json.tmp");
            fs::write(&tmp, content).await?;
            fs::rename(&tmp, &self.path).await?;
            Ok::<_, DashboardError>(())
        };

        write
            .await
            .map_err(|e| DashboardError::Save(format!("Failed to save config: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Device;

    #[tokio::test]
    async fn test_missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("config.json"));
        assert_eq!(store.fetch().await.unwrap(), Configuration::default());
    }

    #[tokio::test]
    async fn test_store_then_fetch() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("data").join("config.json"));

        let config = Configuration {
            apikey: "key".into(),
            devices: vec![Device {
                name: "TV".into(),
                offset: -40,
                screen_id: "s1".into(),
            }],
            ..Configuration::default()
        };
        store.store(&config).await.unwrap();

        assert_eq!(store.fetch().await.unwrap(), config);
        assert!(!dir.path().join("data").join("config.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_garbage_file_is_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = FileStore::new(path).fetch().await.unwrap_err();
        assert!(matches!(err, DashboardError::Load(_)));
    }

    #[tokio::test]
    async fn test_loose_document_loads_and_saves_back() {
        use crate::core::session::ConfigSession;
        use crate::types::SkipCategory;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"skip_categories": ["sponsor", "chapter"], "devices": null, "channel_whitelist": null}"#,
        )
        .unwrap();

        let store = FileStore::new(&path);
        let mut session = ConfigSession::load(&store).await.unwrap();
        assert!(session.draft().devices.is_empty());
        assert!(session.draft().channel_whitelist.is_empty());

        session.toggle_category(SkipCategory::Intro, true);
        session.save(&store).await.unwrap();

        let saved: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved["skip_categories"], serde_json::json!(["sponsor", "intro", "chapter"]));
        assert_eq!(saved["devices"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_blank_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "\n").unwrap();

        let config = FileStore::new(path).fetch().await.unwrap();
        assert_eq!(config, Configuration::default());
    }
}
