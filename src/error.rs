//! Error types for sbtv-console

use thiserror::Error;

/// Stable error codes, one per failure class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Remote operations
    LoadFailed,
    SaveFailed,
    PairFailed,
    SearchFailed,

    // Local state errors
    WhitelistLocked,
    InvalidField,
    InvalidIndex,

    // System errors
    NetworkError,
    ParseError,
    FileError,
}

/// Main error type for sbtv-console
#[derive(Error, Debug)]
pub enum DashboardError {
    /// Initial fetch or parse of the configuration failed
    #[error("Failed to load config: {0}")]
    Load(String),

    /// The config store rejected the draft
    #[error("{0}")]
    Save(String),

    /// The pairing service rejected the request
    #[error("{0}")]
    Pair(String),

    /// The channel search service rejected the query
    #[error("{0}")]
    Search(String),

    #[error("Save and apply an API key before using the channel whitelist")]
    WhitelistLocked,

    #[error("Invalid value for {field}: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("No entry at index {0}")]
    InvalidIndex(usize),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("File error: {0}")]
    File(#[from] std::io::Error),
}

impl DashboardError {
    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Load(_) => ErrorCode::LoadFailed,
            Self::Save(_) => ErrorCode::SaveFailed,
            Self::Pair(_) => ErrorCode::PairFailed,
            Self::Search(_) => ErrorCode::SearchFailed,
            Self::WhitelistLocked => ErrorCode::WhitelistLocked,
            Self::InvalidField { .. } => ErrorCode::InvalidField,
            Self::InvalidIndex(_) => ErrorCode::InvalidIndex,
            Self::Http(_) => ErrorCode::NetworkError,
            Self::Json(_) => ErrorCode::ParseError,
            Self::File(_) => ErrorCode::FileError,
        }
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_errors_display_server_detail_verbatim() {
        let err = DashboardError::Pair("Invalid pairing code or code expired.".into());
        assert_eq!(err.to_string(), "Invalid pairing code or code expired.");
        assert_eq!(err.code(), ErrorCode::PairFailed);
    }

    #[test]
    fn test_invalid_field_message() {
        let err = DashboardError::invalid_field("mute_ads", "expected true or false");
        assert_eq!(
            err.to_string(),
            "Invalid value for mute_ads: expected true or false"
        );
        assert_eq!(err.code(), ErrorCode::InvalidField);
    }
}
