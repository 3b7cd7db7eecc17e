//! Dashboard: runs each remote operation and turns its outcome into a
//! notification. Failures never escape as errors past this point, except
//! the initial load which has no draft to fall back to.

use crate::core::devices::DeviceRegistry;
use crate::core::notify::Notifier;
use crate::core::session::ConfigSession;
use crate::core::whitelist::ChannelWhitelist;
use crate::error::{DashboardError, Result};
use crate::remote::Collaborators;
use crate::types::{ChannelEntry, ChannelResult, Device};
use tracing::error;

pub struct Dashboard<N: Notifier> {
    remote: Collaborators,
    notifier: N,
    session: ConfigSession,
    pub devices: DeviceRegistry,
    pub whitelist: ChannelWhitelist,
}

impl<N: Notifier> Dashboard<N> {
    /// Load the committed configuration. A load failure is fatal.
    pub async fn open(remote: Collaborators, notifier: N) -> Result<Self> {
        let session = match ConfigSession::load(remote.store.as_ref()).await {
            Ok(session) => session,
            Err(e) => {
                error!(error = %e, "initial load failed");
                notifier.error(e.to_string());
                return Err(e);
            }
        };

        Ok(Self {
            remote,
            notifier,
            session,
            devices: DeviceRegistry::new(),
            whitelist: ChannelWhitelist::new(),
        })
    }

    pub fn session(&self) -> &ConfigSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut ConfigSession {
        &mut self.session
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Save the draft. Returns true when the store accepted it.
    pub async fn save(&mut self) -> bool {
        if !self.session.is_dirty() {
            self.notifier.info("No changes to save");
            return false;
        }

        match self.session.save(self.remote.store.as_ref()).await {
            Ok(()) => {
                self.devices.cancel_any_edit();
                self.notifier.success("Configuration saved successfully!");
                true
            }
            Err(e) => {
                self.notifier.error(e.to_string());
                false
            }
        }
    }

    pub fn discard(&mut self) {
        self.session.discard();
        self.devices.cancel_any_edit();
        self.notifier.success("Changes discarded");
    }

    pub async fn pair_device(&mut self) -> Option<Device> {
        match self
            .devices
            .pair(&mut self.session, self.remote.pairing.as_ref())
            .await
        {
            Ok(device) => {
                self.notifier
                    .success(format!("Successfully paired with {}!", device.name));
                Some(device)
            }
            Err(e) => {
                self.notifier.error(e.to_string());
                None
            }
        }
    }

    pub fn delete_device(&mut self, index: usize) -> Option<Device> {
        match self.devices.delete(&mut self.session, index) {
            Ok(device) => Some(device),
            Err(e) => {
                self.notifier.error(e.to_string());
                None
            }
        }
    }

    pub fn commit_device_edit(&mut self, index: usize) -> bool {
        match self.devices.commit_edit(&mut self.session, index) {
            Ok(()) => true,
            Err(e) => {
                self.notifier.error(e.to_string());
                false
            }
        }
    }

    /// Search channels; failures and empty results are reported, not returned
    pub async fn search_channels(&mut self, term: &str) -> Vec<ChannelResult> {
        match self
            .whitelist
            .search(&self.session, self.remote.search.as_ref(), term)
            .await
        {
            Ok(results) => {
                if results.is_empty() && !term.trim().is_empty() {
                    self.notifier.info("No channels found");
                }
                results
            }
            Err(e) => {
                self.notifier.error(e.to_string());
                Vec::new()
            }
        }
    }

    pub fn add_channel(&mut self, entry: ChannelEntry) -> bool {
        let name = entry.name.clone();
        self.report(|d| d.whitelist.add(&mut d.session, entry), || format!("Added {}", name))
    }

    pub fn add_channel_manual(&mut self, id: &str, name: &str) -> bool {
        self.report(
            |d| d.whitelist.add_manual(&mut d.session, id, name),
            || format!("Added {}", id.trim()),
        )
    }

    pub fn remove_channel(&mut self, index: usize) -> Option<ChannelEntry> {
        match self.whitelist.remove(&mut self.session, index) {
            Ok(entry) => Some(entry),
            Err(e) => {
                self.notifier.error(e.to_string());
                None
            }
        }
    }

    fn report<F, M>(&mut self, op: F, success: M) -> bool
    where
        F: FnOnce(&mut Self) -> std::result::Result<(), DashboardError>,
        M: FnOnce() -> String,
    {
        match op(self) {
            Ok(()) => {
                self.notifier.success(success());
                true
            }
            Err(e) => {
                self.notifier.error(e.to_string());
                false
            }
        }
    }
}
