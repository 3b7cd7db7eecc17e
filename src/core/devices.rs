//! Device registry: pairing workflow and inline edits of paired devices

use crate::core::sanitize::{normalize_pairing_code, parse_offset};
use crate::core::session::ConfigSession;
use crate::error::{DashboardError, Result};
use crate::remote::{PairRequest, PairingService};
use crate::types::{Device, FieldUpdate};
use tracing::{info, warn};

/// Outcome of the most recent pairing attempt
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PairingStatus {
    #[default]
    Idle,
    Pairing,
    Paired(String),
    Failed(String),
}

/// Pair-new-device form
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PairingForm {
    pub code: String,
    /// Optional, the device's own name is used when empty
    pub name: String,
    /// Raw offset text in milliseconds
    pub offset: String,
}

impl PairingForm {
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Edit buffer for one device, independent of the draft until committed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceEdit {
    pub index: usize,
    pub name: String,
    /// Raw offset text in milliseconds
    pub offset: String,
    screen_id: String,
    pub reveal_screen_id: bool,
}

impl DeviceEdit {
    pub fn screen_id(&self) -> &str {
        &self.screen_id
    }

    /// Screen id as it should be shown, masked unless revealed
    pub fn displayed_screen_id(&self) -> String {
        if self.reveal_screen_id {
            self.screen_id.clone()
        } else {
            "•".repeat(self.screen_id.chars().count().min(12))
        }
    }
}

#[derive(Debug, Default)]
pub struct DeviceRegistry {
    pub form: PairingForm,
    status: PairingStatus,
    editing: Option<DeviceEdit>,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> &PairingStatus {
        &self.status
    }

    pub fn is_pairing(&self) -> bool {
        self.status == PairingStatus::Pairing
    }

    pub fn editing(&self) -> Option<&DeviceEdit> {
        self.editing.as_ref()
    }

    pub fn editing_mut(&mut self) -> Option<&mut DeviceEdit> {
        self.editing.as_mut()
    }

    /// Submit the pairing form. On success the new device is appended to
    /// the draft and the form is cleared; on failure the form is kept.
    pub async fn pair(
        &mut self,
        session: &mut ConfigSession,
        service: &dyn PairingService,
    ) -> Result<Device> {
        let Some(code) = normalize_pairing_code(&self.form.code) else {
            let message = if self.form.code.trim().is_empty() {
                "Pairing code required"
            } else {
                "Invalid pairing code format. Digits only."
            };
            self.status = PairingStatus::Failed(message.into());
            return Err(DashboardError::Pair(message.into()));
        };

        let request = PairRequest {
            code,
            name: self.form.name.trim().to_string(),
            offset: parse_offset(&self.form.offset),
        };

        self.status = PairingStatus::Pairing;
        let outcome = service.pair(&request).await;

        match outcome {
            Ok(device) => {
                // Read the device list at resolution time so edits made while
                // the request was pending are kept
                let mut devices = session.draft().devices.clone();
                devices.push(device.clone());
                session.update_field(FieldUpdate::Devices(devices));

                info!(name = %device.name, "device paired");
                self.form.clear();
                self.status = PairingStatus::Paired(device.name.clone());
                Ok(device)
            }
            Err(e) => {
                let message = match e {
                    DashboardError::Pair(message) => message,
                    other => other.to_string(),
                };
                warn!(%message, "pairing failed");
                self.status = PairingStatus::Failed(message.clone());
                Err(DashboardError::Pair(message))
            }
        }
    }

    /// Open an edit buffer for `index`, cancelling any other open edit
    pub fn begin_edit(&mut self, session: &ConfigSession, index: usize) -> Result<&mut DeviceEdit> {
        let device = session
            .draft()
            .devices
            .get(index)
            .ok_or(DashboardError::InvalidIndex(index))?;

        Ok(self.editing.insert(DeviceEdit {
            index,
            name: device.name.clone(),
            offset: device.offset.to_string(),
            screen_id: device.screen_id.clone(),
            reveal_screen_id: false,
        }))
    }

    /// Write the edit buffer back into the draft, keeping `screen_id`
    pub fn commit_edit(&mut self, session: &mut ConfigSession, index: usize) -> Result<()> {
        let edit = match self.editing.take() {
            Some(edit) if edit.index == index => edit,
            other => {
                self.editing = other;
                return Err(DashboardError::InvalidIndex(index));
            }
        };

        let mut devices = session.draft().devices.clone();
        let Some(device) = devices.get_mut(index) else {
            return Err(DashboardError::InvalidIndex(index));
        };
        device.name = edit.name;
        device.offset = parse_offset(&edit.offset);
        session.update_field(FieldUpdate::Devices(devices));
        Ok(())
    }

    /// Drop the edit buffer without touching the draft
    pub fn cancel_edit(&mut self, index: usize) {
        if self.editing.as_ref().is_some_and(|e| e.index == index) {
            self.editing = None;
        }
    }

    /// Close whatever edit is open, e.g. after the draft was replaced
    pub fn cancel_any_edit(&mut self) {
        self.editing = None;
    }

    /// Remove a device from the draft. Callers confirm with the operator first.
    pub fn delete(&mut self, session: &mut ConfigSession, index: usize) -> Result<Device> {
        let mut devices = session.draft().devices.clone();
        if index >= devices.len() {
            return Err(DashboardError::InvalidIndex(index));
        }

        self.cancel_edit(index);
        if let Some(edit) = self.editing.as_mut() {
            if edit.index > index {
                edit.index -= 1;
            }
        }

        let removed = devices.remove(index);
        session.update_field(FieldUpdate::Devices(devices));
        Ok(removed)
    }
}
