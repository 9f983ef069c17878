//! Content hashing for change detection
//!
//! Provides [`ContentHash`], a 32-byte Blake3 digest of a document's JSON
//! encoding. Edit sessions compare hashes to decide whether a save is needed.

use serde_json::Value;
use std::fmt::{self, Display, Formatter};

/// A 32-byte content hash (Blake3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Compute Blake3 hash of arbitrary data
    #[inline]
    #[must_use]
    pub fn compute(data: &[u8]) -> Self {
        Self(*blake3::hash(data).as_bytes())
    }

    /// Hash a document
    ///
    /// Object keys are hashed in document order, so reordering keys counts
    /// as a change.
    #[must_use]
    pub fn of_value(value: &Value) -> Self {
        // Display for Value is the compact JSON encoding and cannot fail
        Self::compute(value.to_string().as_bytes())
    }

    /// Short string representation (first 16 hex chars)
    #[inline]
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..8])
    }
}

impl Display for ContentHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}
