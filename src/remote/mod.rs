//! Remote collaborators: config store, pairing service, channel search

pub mod http;

use crate::error::Result;
use crate::types::{ChannelResult, Configuration, Device};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

/// Persistent home of the committed configuration
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Fetch the committed document
    async fn fetch(&self) -> Result<Configuration>;

    /// Replace the stored document
    async fn store(&self, config: &Configuration) -> Result<()>;
}

/// Body of a pairing request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PairRequest {
    pub code: String,
    pub name: String,
    pub offset: i64,
}

/// Issues device identities from a TV link code
#[async_trait]
pub trait PairingService: Send + Sync {
    async fn pair(&self, request: &PairRequest) -> Result<Device>;
}

/// Looks up YouTube channels using the committed API key
#[async_trait]
pub trait ChannelSearch: Send + Sync {
    async fn search_channels(&self, term: &str) -> Result<Vec<ChannelResult>>;
}

/// Everything the dashboard talks to
#[derive(Clone)]
pub struct Collaborators {
    pub store: Arc<dyn ConfigStore>,
    pub pairing: Arc<dyn PairingService>,
    pub search: Arc<dyn ChannelSearch>,
}

impl Collaborators {
    /// Use one backend for all three roles
    pub fn from_backend<B>(backend: B) -> Self
    where
        B: ConfigStore + PairingService + ChannelSearch + 'static,
    {
        let backend = Arc::new(backend);
        Self {
            store: backend.clone(),
            pairing: backend.clone(),
            search: backend,
        }
    }

    /// Keep the configuration somewhere else, e.g. a local file
    pub fn with_store(mut self, store: impl ConfigStore + 'static) -> Self {
        self.store = Arc::new(store);
        self
    }
}
