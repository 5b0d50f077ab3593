//! Error types for the presence registry.
//!
//! Store backends report failures as `anyhow::Error`; everything that crosses
//! the registry boundary is converted into [`Error`] so callers can map it to
//! a response without string matching.

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Registry errors with structured context.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Heartbeat body is missing fields or has mistyped fields.
    #[error("{0}")]
    MalformedRequest(String),

    /// Secret token does not match `sk_live_<uuid v4>`.
    #[error("Invalid token format")]
    InvalidTokenFormat,

    /// The backing store failed (network, disk, serialization).
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Bytes read back from the store are not a presence record.
    #[error("invalid stored record: {0}")]
    MalformedStoredRecord(String),
}

impl Error {
    /// Create a malformed request error.
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedRequest(reason.into())
    }

    /// Wrap a backend failure.
    pub fn storage(source: &anyhow::Error) -> Self {
        Self::StorageUnavailable(format!("{source:#}"))
    }

    /// Get the appropriate HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MalformedRequest(_)
            | Self::InvalidTokenFormat
            | Self::MalformedStoredRecord(_) => 400,
            Self::StorageUnavailable(_) => 500,
        }
    }

    /// Message safe to return to an HTTP caller.
    ///
    /// Backend details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            Self::StorageUnavailable(_) => "Storage unavailable".to_string(),
            other => other.to_string(),
        }
    }
}
