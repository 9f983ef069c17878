//! The document store seam

use crate::error::StoreError;
use crate::record::{DocumentId, Record, StoredDocument};
use async_trait::async_trait;

/// Schema-less document database addressed by collection name
///
/// Callers treat documents as opaque JSON objects. Each call is independent:
/// no lock or transaction is held across calls.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Create one document per record with store-generated ids
    ///
    /// The batch is all-or-nothing.
    ///
    /// # Errors
    /// Returns error if the store rejects the batch (size limit, permissions, IO)
    async fn bulk_write(
        &self,
        collection: &str,
        records: Vec<Record>,
    ) -> Result<Vec<DocumentId>, StoreError>;

    /// Create or overwrite a document under a caller-chosen id
    ///
    /// # Errors
    /// Returns error if the store rejects the write
    async fn set_document(
        &self,
        collection: &str,
        id: &DocumentId,
        record: Record,
    ) -> Result<(), StoreError>;

    /// Fetch a single document
    ///
    /// # Errors
    /// Returns error if the collection cannot be read
    async fn get_document(
        &self,
        collection: &str,
        id: &DocumentId,
    ) -> Result<Option<Record>, StoreError>;

    /// All documents of a collection in write order
    ///
    /// # Errors
    /// Returns error if the collection cannot be read
    async fn list_documents(&self, collection: &str) -> Result<Vec<StoredDocument>, StoreError>;

    /// Remove every document of a collection, returning how many were removed
    ///
    /// # Errors
    /// Returns error if the collection cannot be written
    async fn clear_collection(&self, collection: &str) -> Result<usize, StoreError>;
}

/// Check that a collection name is a plain identifier
///
/// Accepts ASCII alphanumerics, `_` and `-`. File-backed stores use the
/// name as a file stem, so separators and dots are rejected.
///
/// # Errors
/// Returns [`StoreError::InvalidCollection`] for anything else
pub fn validate_collection(collection: &str) -> Result<(), StoreError> {
    let valid = !collection.is_empty()
        && collection
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidCollection(collection.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_names() {
        assert!(validate_collection("experiences").is_ok());
        assert!(validate_collection("site_content").is_ok());
        assert!(validate_collection("page-views").is_ok());

        assert!(validate_collection("").is_err());
        assert!(validate_collection("../etc").is_err());
        assert!(validate_collection("a/b").is_err());
        assert!(validate_collection("with space").is_err());
    }
}
