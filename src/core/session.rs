//! Config draft store
//!
//! Holds the committed configuration (mirror of the remote store) and an
//! independently editable draft. All edits go through [`ConfigSession::update_field`].

use crate::core::sanitize::{self, sanitize, sanitize_update};
use crate::error::Result;
use crate::remote::ConfigStore;
use crate::types::{ConfigKey, Configuration, FieldUpdate, SkipCategory};
use tracing::{debug, info};

/// Owns both live copies of the configuration
#[derive(Debug, Clone)]
pub struct ConfigSession {
    committed: Configuration,
    draft: Configuration,
}

impl ConfigSession {
    /// Start a session from an already-fetched document
    pub fn from_committed(config: Configuration) -> Self {
        let committed = sanitize(&config);
        Self {
            draft: committed.clone(),
            committed,
        }
    }

    /// Fetch the committed document from the store
    pub async fn load(store: &dyn ConfigStore) -> Result<Self> {
        let config = store.fetch().await?;
        info!(
            devices = config.devices.len(),
            channels = config.channel_whitelist.len(),
            "configuration loaded"
        );
        Ok(Self::from_committed(config))
    }

    pub fn committed(&self) -> &Configuration {
        &self.committed
    }

    pub fn draft(&self) -> &Configuration {
        &self.draft
    }

    /// Replace exactly one top-level field of the draft
    pub fn update_field(&mut self, update: FieldUpdate) {
        let update = sanitize_update(update);
        debug!(key = %update.key(), "draft field updated");
        sanitize::apply(&mut self.draft, update);
    }

    /// Add or remove one skip category
    pub fn toggle_category(&mut self, category: SkipCategory, enabled: bool) {
        let mut categories = self.draft.skip_categories.clone();
        if enabled {
            categories.insert(category);
        } else {
            categories.remove(&category);
        }
        self.update_field(FieldUpdate::SkipCategories(categories));
    }

    pub fn is_dirty(&self) -> bool {
        sanitize(&self.draft) != self.committed
    }

    /// Top-level keys where the draft differs from the committed copy
    pub fn changed_keys(&self) -> Vec<ConfigKey> {
        let draft = sanitize(&self.draft);
        ConfigKey::ALL
            .into_iter()
            .filter(|key| {
                sanitize::extract(draft.clone(), *key)
                    != sanitize::extract(self.committed.clone(), *key)
            })
            .collect()
    }

    /// Push the sanitized draft to the store. Commits only after the store
    /// acknowledges; on failure the draft is left as it was.
    pub async fn save(&mut self, store: &dyn ConfigStore) -> Result<()> {
        let payload = sanitize(&self.draft);
        store.store(&payload).await?;

        info!("configuration saved");
        self.draft = payload.clone();
        self.committed = payload;
        Ok(())
    }

    /// Reset the draft to the committed copy
    pub fn discard(&mut self) {
        self.draft = self.committed.clone();
    }

    /// API key in the draft has been saved and is non-empty
    pub fn api_key_committed(&self) -> bool {
        !self.draft.apikey.is_empty() && self.draft.apikey == self.committed.apikey
    }

    /// Non-fatal problems worth showing before a save
    pub fn validation_warnings(&self) -> Vec<String> {
        let draft = &self.draft;
        let mut warnings = Vec::new();

        if draft.apikey.is_empty() && !draft.channel_whitelist.is_empty() {
            warnings.push("Channel whitelist is not empty but no YouTube API key is set".into());
        }
        if draft.devices.is_empty() {
            warnings.push("No devices configured, pair at least one device".into());
        }
        if draft.skip_categories.is_empty() {
            warnings.push("No skip categories selected, the service will default to sponsor".into());
        }
        for device in draft.devices.iter().filter(|d| d.screen_id.is_empty()) {
            warnings.push(format!("Device '{}' has no screen id", device.name));
        }
        warnings
    }
}
