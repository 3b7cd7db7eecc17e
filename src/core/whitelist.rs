//! Channel whitelist: gated remote search and add/remove on the draft
//!
//! Everything here requires an API key that is both set and saved, since
//! the search backend reads the key from the stored configuration.

use crate::core::session::ConfigSession;
use crate::error::{DashboardError, Result};
use crate::remote::ChannelSearch;
use crate::types::{ChannelEntry, ChannelResult, FieldUpdate};
use tracing::{debug, warn};

/// State of the current search session
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SearchState {
    #[default]
    Idle,
    Searching { term: String },
    Results(Vec<ChannelResult>),
    Errored(String),
}

/// Handle for one in-flight search. Only the newest ticket may apply its results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    token: u64,
    pub term: String,
}

#[derive(Debug, Default)]
pub struct ChannelWhitelist {
    state: SearchState,
    latest: u64,
}

impl ChannelWhitelist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    /// Whitelist UI is available: key is non-empty and already saved
    pub fn is_available(session: &ConfigSession) -> bool {
        session.api_key_committed()
    }

    fn ensure_available(session: &ConfigSession) -> Result<()> {
        if Self::is_available(session) {
            Ok(())
        } else {
            Err(DashboardError::WhitelistLocked)
        }
    }

    pub fn entries(session: &ConfigSession) -> &[ChannelEntry] {
        &session.draft().channel_whitelist
    }

    pub fn contains(session: &ConfigSession, id: &str) -> bool {
        Self::entries(session).iter().any(|c| c.id == id)
    }

    /// Start a search. Any earlier ticket becomes stale.
    pub fn begin_search(&mut self, session: &ConfigSession, term: &str) -> Result<SearchTicket> {
        Self::ensure_available(session)?;

        self.latest += 1;
        let term = term.trim().to_string();
        self.state = SearchState::Searching { term: term.clone() };
        Ok(SearchTicket {
            token: self.latest,
            term,
        })
    }

    /// Apply a search response. Returns false when the ticket is stale and
    /// the response was dropped.
    pub fn finish_search(
        &mut self,
        ticket: &SearchTicket,
        outcome: &Result<Vec<ChannelResult>>,
    ) -> bool {
        if ticket.token != self.latest {
            debug!(term = %ticket.term, "dropping stale search response");
            return false;
        }

        self.state = match outcome {
            Ok(results) => SearchState::Results(results.clone()),
            Err(DashboardError::Search(message)) => SearchState::Errored(message.clone()),
            Err(other) => SearchState::Errored(other.to_string()),
        };
        true
    }

    /// Search for channels by name
    pub async fn search(
        &mut self,
        session: &ConfigSession,
        service: &dyn ChannelSearch,
        term: &str,
    ) -> Result<Vec<ChannelResult>> {
        let ticket = self.begin_search(session, term)?;

        let outcome = if ticket.term.is_empty() {
            Ok(Vec::new())
        } else {
            service.search_channels(&ticket.term).await
        };

        self.finish_search(&ticket, &outcome);
        outcome.map_err(|e| match e {
            DashboardError::Search(message) => DashboardError::Search(message),
            other => {
                warn!(error = %other, "channel search failed");
                DashboardError::Search(other.to_string())
            }
        })
    }

    /// Append a channel to the draft. Duplicate ids are allowed.
    pub fn add(&mut self, session: &mut ConfigSession, entry: ChannelEntry) -> Result<()> {
        Self::ensure_available(session)?;

        let mut channels = session.draft().channel_whitelist.clone();
        channels.push(entry);
        session.update_field(FieldUpdate::ChannelWhitelist(channels));
        Ok(())
    }

    /// Add a channel typed in by the operator
    pub fn add_manual(&mut self, session: &mut ConfigSession, id: &str, name: &str) -> Result<()> {
        let id = id.trim();
        if id.is_empty() {
            return Err(DashboardError::invalid_field("channel id", "must not be empty"));
        }
        self.add(
            session,
            ChannelEntry {
                id: id.to_string(),
                name: name.trim().to_string(),
            },
        )
    }

    pub fn remove(&mut self, session: &mut ConfigSession, index: usize) -> Result<ChannelEntry> {
        Self::ensure_available(session)?;

        let mut channels = session.draft().channel_whitelist.clone();
        if index >= channels.len() {
            return Err(DashboardError::InvalidIndex(index));
        }
        let removed = channels.remove(index);
        session.update_field(FieldUpdate::ChannelWhitelist(channels));
        Ok(removed)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::types::{Configuration, SubscriberCount};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Search service that answers from a fixed list
    pub(crate) struct FixedSearch {
        pub results: Vec<ChannelResult>,
        pub fail_with: Option<String>,
        pub terms: Mutex<Vec<String>>,
    }

    impl FixedSearch {
        pub fn returning(results: Vec<ChannelResult>) -> Self {
            Self {
                results,
                fail_with: None,
                terms: Mutex::new(Vec::new()),
            }
        }

        pub fn failing(message: &str) -> Self {
            Self {
                results: Vec::new(),
                fail_with: Some(message.into()),
                terms: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ChannelSearch for FixedSearch {
        async fn search_channels(&self, term: &str) -> Result<Vec<ChannelResult>> {
            self.terms.lock().unwrap().push(term.to_string());
            match &self.fail_with {
                Some(message) => Err(DashboardError::Search(message.clone())),
                None => Ok(self.results.clone()),
            }
        }
    }

    pub(crate) fn channel(id: &str, name: &str) -> ChannelResult {
        ChannelResult {
            id: id.into(),
            name: name.into(),
            subscribers: SubscriberCount::Count(1000),
        }
    }

    fn keyed_session(key: &str) -> ConfigSession {
        ConfigSession::from_committed(Configuration {
            apikey: key.into(),
            ..Configuration::default()
        })
    }

    #[tokio::test]
    async fn test_search_stores_results() {
        let session = keyed_session("k");
        let mut whitelist = ChannelWhitelist::new();
        let service = FixedSearch::returning(vec![channel("UCX", "Channel A")]);

        let results = whitelist.search(&session, &service, " lofi ").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(whitelist.state(), &SearchState::Results(results));
        assert_eq!(service.terms.lock().unwrap().as_slice(), ["lofi"]);
    }

    #[tokio::test]
    async fn test_search_failure_clears_results() {
        let session = keyed_session("k");
        let mut whitelist = ChannelWhitelist::new();
        let ok = FixedSearch::returning(vec![channel("UCX", "Channel A")]);
        whitelist.search(&session, &ok, "a").await.unwrap();

        let bad = FixedSearch::failing("quota exceeded");
        let err = whitelist.search(&session, &bad, "b").await.unwrap_err();
        assert_eq!(err.to_string(), "quota exceeded");
        assert_eq!(whitelist.state(), &SearchState::Errored("quota exceeded".into()));
    }

    #[tokio::test]
    async fn test_search_is_gated_on_saved_key() {
        let mut session = keyed_session("k");
        session.update_field(FieldUpdate::ApiKey("unsaved".into()));
        let mut whitelist = ChannelWhitelist::new();
        let service = FixedSearch::returning(vec![channel("UCX", "Channel A")]);

        for term in ["", "lofi", "anything"] {
            let err = whitelist.search(&session, &service, term).await.unwrap_err();
            assert!(matches!(err, DashboardError::WhitelistLocked));
        }
        assert!(service.terms.lock().unwrap().is_empty());
        assert_eq!(whitelist.state(), &SearchState::Idle);

        let empty = keyed_session("");
        assert!(!ChannelWhitelist::is_available(&empty));
    }

    #[tokio::test]
    async fn test_blank_term_skips_remote_call() {
        let session = keyed_session("k");
        let mut whitelist = ChannelWhitelist::new();
        let service = FixedSearch::returning(vec![channel("UCX", "Channel A")]);

        let results = whitelist.search(&session, &service, "   ").await.unwrap();
        assert!(results.is_empty());
        assert!(service.terms.lock().unwrap().is_empty());
    }

    #[test]
    fn test_stale_response_is_dropped() {
        let session = keyed_session("k");
        let mut whitelist = ChannelWhitelist::new();

        let first = whitelist.begin_search(&session, "first").unwrap();
        let second = whitelist.begin_search(&session, "second").unwrap();

        assert!(whitelist.finish_search(&second, &Ok(vec![channel("UC2", "Two")])));
        assert!(!whitelist.finish_search(&first, &Ok(vec![channel("UC1", "One")])));
        assert_eq!(
            whitelist.state(),
            &SearchState::Results(vec![channel("UC2", "Two")])
        );
    }

    #[test]
    fn test_add_twice_keeps_duplicates() {
        let mut session = keyed_session("k");
        let mut whitelist = ChannelWhitelist::new();
        let entry = ChannelEntry {
            id: "UCX".into(),
            name: "Channel A".into(),
        };

        whitelist.add(&mut session, entry.clone()).unwrap();
        whitelist.add(&mut session, entry).unwrap();

        let entries = ChannelWhitelist::entries(&session);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, entries[1].id);
        assert!(ChannelWhitelist::contains(&session, "UCX"));
        assert!(session.committed().channel_whitelist.is_empty());
    }

    #[test]
    fn test_remove_and_manual_add() {
        let mut session = keyed_session("k");
        let mut whitelist = ChannelWhitelist::new();

        assert!(whitelist.add_manual(&mut session, "  ", "nameless").is_err());
        whitelist.add_manual(&mut session, "UC1", " One ").unwrap();
        whitelist.add_manual(&mut session, "UC2", "").unwrap();

        let removed = whitelist.remove(&mut session, 0).unwrap();
        assert_eq!(removed.name, "One");
        assert_eq!(ChannelWhitelist::entries(&session)[0].id, "UC2");
        assert!(whitelist.remove(&mut session, 3).is_err());
    }

    #[test]
    fn test_mutations_locked_without_saved_key() {
        let mut session = keyed_session("");
        let mut whitelist = ChannelWhitelist::new();
        let err = whitelist.add_manual(&mut session, "UC1", "One").unwrap_err();
        assert!(matches!(err, DashboardError::WhitelistLocked));
    }
}
