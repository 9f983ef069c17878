//! Error types for document store operations

use std::path::PathBuf;

/// Errors returned by a [`DocumentStore`](crate::DocumentStore)
///
/// A failed batch is always a unit: no record of a rejected batch is
/// written.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Batch exceeds the store's per-batch write limit
    #[error("batch of {actual} writes exceeds store limit of {limit}")]
    BatchTooLarge { limit: usize, actual: usize },

    /// Collection may not be written
    #[error("permission denied for collection '{0}'")]
    PermissionDenied(String),

    /// Collection name is empty or not a plain identifier
    #[error("invalid collection name: '{0}'")]
    InvalidCollection(String),

    /// IO error in a file-backed store
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Collection file could not be decoded
    #[error("corrupt collection file {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Records could not be encoded
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Check if the rejection was caused by the caller's input rather than the store
    #[inline]
    #[must_use]
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::BatchTooLarge { .. } | Self::InvalidCollection(_) | Self::PermissionDenied(_)
        )
    }
}
