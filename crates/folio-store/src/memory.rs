//! In-memory document store
//!
//! Behaves like a hosted document database for the purposes of the
//! migration and the editor:
//! - Store-generated ids for bulk writes
//! - A per-batch write limit; oversized batches are rejected whole
//! - Optional read-only collections to model permission failures

use crate::error::StoreError;
use crate::record::{DocumentId, Record, StoredDocument};
use crate::store::{validate_collection, DocumentStore};
use async_trait::async_trait;
use dashmap::{DashMap, DashSet};
use indexmap::IndexMap;

/// Write limit of a single batch in common hosted document databases
pub const DEFAULT_MAX_BATCH_SIZE: usize = 500;

/// Concurrent in-process document store
#[derive(Debug)]
pub struct MemoryStore {
    /// Collection name -> documents in write order
    collections: DashMap<String, IndexMap<DocumentId, Record>>,
    /// Collections that reject writes
    read_only: DashSet<String>,
    /// Per-batch write limit (`None` = unlimited)
    max_batch_size: Option<usize>,
}

impl MemoryStore {
    /// Create empty store with the default batch limit
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            collections: DashMap::new(),
            read_only: DashSet::new(),
            max_batch_size: Some(DEFAULT_MAX_BATCH_SIZE),
        }
    }

    /// With a different batch limit (`None` disables the check)
    #[inline]
    #[must_use]
    pub fn with_max_batch_size(mut self, limit: Option<usize>) -> Self {
        self.max_batch_size = limit;
        self
    }

    /// Mark a collection as read-only
    #[inline]
    #[must_use]
    pub fn with_read_only(self, collection: impl Into<String>) -> Self {
        self.read_only.insert(collection.into());
        self
    }

    /// Number of documents in a collection
    #[inline]
    #[must_use]
    pub fn len(&self, collection: &str) -> usize {
        self.collections.get(collection).map_or(0, |c| c.len())
    }

    /// Check if a collection has no documents
    #[inline]
    #[must_use]
    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }

    /// Names of collections holding at least one document, sorted
    #[must_use]
    pub fn collection_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self
            .collections
            .iter()
            .filter(|entry| !entry.value().is_empty())
            .map(|entry| entry.key().clone())
            .collect();
        names.sort();
        names
    }

    /// Snapshot of a collection's records in write order
    #[must_use]
    pub fn records(&self, collection: &str) -> Vec<Record> {
        self.collections
            .get(collection)
            .map(|c| c.values().cloned().collect())
            .unwrap_or_default()
    }

    fn check_writable(&self, collection: &str) -> Result<(), StoreError> {
        validate_collection(collection)?;
        if self.read_only.contains(collection) {
            return Err(StoreError::PermissionDenied(collection.to_string()));
        }
        Ok(())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn bulk_write(
        &self,
        collection: &str,
        records: Vec<Record>,
    ) -> Result<Vec<DocumentId>, StoreError> {
        self.check_writable(collection)?;
        if let Some(limit) = self.max_batch_size {
            if records.len() > limit {
                return Err(StoreError::BatchTooLarge {
                    limit,
                    actual: records.len(),
                });
            }
        }

        let mut docs = self.collections.entry(collection.to_string()).or_default();
        let ids = records
            .into_iter()
            .map(|record| {
                let id = DocumentId::generate();
                docs.insert(id.clone(), record);
                id
            })
            .collect();
        Ok(ids)
    }

    async fn set_document(
        &self,
        collection: &str,
        id: &DocumentId,
        record: Record,
    ) -> Result<(), StoreError> {
        self.check_writable(collection)?;
        self.collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), record);
        Ok(())
    }

    async fn get_document(
        &self,
        collection: &str,
        id: &DocumentId,
    ) -> Result<Option<Record>, StoreError> {
        validate_collection(collection)?;
        Ok(self
            .collections
            .get(collection)
            .and_then(|docs| docs.get(id).cloned()))
    }

    async fn list_documents(&self, collection: &str) -> Result<Vec<StoredDocument>, StoreError> {
        validate_collection(collection)?;
        Ok(self
            .collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, record)| StoredDocument {
                        id: id.clone(),
                        record: record.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn clear_collection(&self, collection: &str) -> Result<usize, StoreError> {
        self.check_writable(collection)?;
        Ok(self
            .collections
            .remove(collection)
            .map_or(0, |(_, docs)| docs.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(n: usize) -> Vec<Record> {
        (0..n).map(|i| Record::new().with("n", i)).collect()
    }

    #[tokio::test]
    async fn bulk_write_assigns_ids_in_order() {
        let store = MemoryStore::new();
        let ids = store.bulk_write("projects", records(3)).await.unwrap();
        assert_eq!(ids.len(), 3);

        let listed = store.list_documents("projects").await.unwrap();
        let listed_ids: Vec<_> = listed.iter().map(|d| d.id.clone()).collect();
        assert_eq!(listed_ids, ids);
        assert_eq!(listed[2].record.get("n"), Some(&serde_json::json!(2)));
    }

    #[tokio::test]
    async fn oversized_batch_is_rejected_whole() {
        let store = MemoryStore::new().with_max_batch_size(Some(2));
        let result = store.bulk_write("skills", records(3)).await;
        assert!(matches!(
            result,
            Err(StoreError::BatchTooLarge { limit: 2, actual: 3 })
        ));
        assert!(store.is_empty("skills"));
    }

    #[tokio::test]
    async fn unlimited_batches() {
        let store = MemoryStore::new().with_max_batch_size(None);
        store.bulk_write("skills", records(600)).await.unwrap();
        assert_eq!(store.len("skills"), 600);
    }

    #[tokio::test]
    async fn read_only_collection_rejects_writes() {
        let store = MemoryStore::new().with_read_only("experiences");
        let result = store.bulk_write("experiences", records(1)).await;
        assert!(matches!(result, Err(StoreError::PermissionDenied(c)) if c == "experiences"));

        let result = store
            .set_document("experiences", &DocumentId::new("x"), Record::new())
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn set_document_overwrites() {
        let store = MemoryStore::new();
        let id = DocumentId::new("home");
        store
            .set_document("site_content", &id, Record::new().with("title", "old"))
            .await
            .unwrap();
        store
            .set_document("site_content", &id, Record::new().with("title", "new"))
            .await
            .unwrap();

        let doc = store.get_document("site_content", &id).await.unwrap().unwrap();
        assert_eq!(doc.get_str("title"), Some("new"));
        assert_eq!(store.len("site_content"), 1);
    }

    #[tokio::test]
    async fn clear_collection_reports_count() {
        let store = MemoryStore::new();
        store.bulk_write("formations", records(4)).await.unwrap();
        assert_eq!(store.clear_collection("formations").await.unwrap(), 4);
        assert_eq!(store.clear_collection("formations").await.unwrap(), 0);
        assert!(store.collection_names().is_empty());
    }

    #[tokio::test]
    async fn invalid_collection_name() {
        let store = MemoryStore::new();
        let result = store.bulk_write("../escape", records(1)).await;
        assert!(matches!(result, Err(StoreError::InvalidCollection(_))));
    }
}
