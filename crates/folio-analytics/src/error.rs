//! Error types for analytics ingestion

use folio_store::StoreError;

/// Analytics errors
#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    /// Page view without a path
    #[error("page_view events require a path")]
    MissingPath,

    /// Path is not site-relative
    #[error("invalid page path '{0}': must start with '/'")]
    InvalidPath(String),

    /// Field exceeds the accepted length
    #[error("{field} exceeds {max} bytes")]
    TooLong { field: &'static str, max: usize },

    /// Unrecognized event kind
    #[error("unknown event kind '{0}'")]
    UnknownKind(String),

    /// Event could not be encoded
    #[error("malformed event: {0}")]
    Malformed(&'static str),

    /// Stored record is not an event
    #[error("invalid event record: {0}")]
    Decode(#[from] serde_json::Error),

    /// Store rejected the read or write
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AnalyticsError {
    /// Whether the event itself was rejected, as opposed to the store failing
    #[inline]
    #[must_use]
    pub fn is_invalid_event(&self) -> bool {
        matches!(
            self,
            Self::MissingPath | Self::InvalidPath(_) | Self::TooLong { .. } | Self::UnknownKind(_)
        )
    }
}
