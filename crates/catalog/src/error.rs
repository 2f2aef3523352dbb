//! Error types for the catalog engine.
//!
//! The taxonomy separates terminal conditions from retryable ones: a missing
//! store is final and rendered as such, while transient network failures go
//! through the retry policy in [`crate::sync`] before surfacing.

use thiserror::Error;

/// Errors from the remote store adapter.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// HTTP request failed (transient, retryable).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not the expected JSON shape.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// No record exists for this seller (terminal, not retryable).
    #[error("Store not found: {0}")]
    StoreNotFound(String),

    /// A single fetch attempt exceeded its deadline.
    #[error("Fetch timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// The retry policy was exhausted without a successful fetch.
    #[error("Fetch failed after {attempts} attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        last: Box<RemoteError>,
    },
}

impl RemoteError {
    /// Whether the retry policy applies to this error.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Parse(_) | Self::Timeout(_))
    }
}

/// Errors from the local persistence port (favorites, drafts).
///
/// Always logged and swallowed; a storage fault never blocks the user
/// action that caused it.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage write failed for {key}: {reason}")]
    WriteFailed { key: String, reason: String },

    #[error("Stored value under {key} is not valid JSON")]
    Corrupt { key: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_terminal() {
        assert!(!RemoteError::StoreNotFound("s1".to_owned()).is_retryable());
        assert!(RemoteError::Timeout(std::time::Duration::from_secs(10)).is_retryable());
    }

    #[test]
    fn error_messages_are_descriptive() {
        let err = RemoteError::StoreNotFound("seller-9".to_owned());
        assert_eq!(err.to_string(), "Store not found: seller-9");
    }
}
