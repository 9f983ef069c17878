//! File-backed document store
//!
//! Each collection is one pretty-printed JSON object `{ id: record, ... }`
//! at `<root>/<collection>.json`. Writes go to a temporary sibling file
//! which is then renamed over the original, so a batch is visible either
//! completely or not at all.

use crate::error::StoreError;
use crate::record::{DocumentId, Record, StoredDocument};
use crate::store::{validate_collection, DocumentStore};
use async_trait::async_trait;
use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

type Collection = IndexMap<DocumentId, Record>;

/// Document store persisted as JSON files in a directory
#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
    /// Serializes read-modify-write cycles within this process
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Open (and create if needed) a store rooted at `root`
    ///
    /// # Errors
    /// Returns error if the directory cannot be created
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(|e| StoreError::io_error(&root, e))?;
        Ok(Self {
            root,
            write_lock: Mutex::new(()),
        })
    }

    /// Directory holding the collection files
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn collection_path(&self, collection: &str) -> PathBuf {
        self.root.join(format!("{collection}.json"))
    }

    async fn load(&self, collection: &str) -> Result<Collection, StoreError> {
        validate_collection(collection)?;
        let path = self.collection_path(collection);
        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt { path, source })
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Collection::new()),
            Err(e) => Err(StoreError::io_error(path, e)),
        }
    }

    async fn save(&self, collection: &str, docs: &Collection) -> Result<(), StoreError> {
        let path = self.collection_path(collection);
        let tmp = self.root.join(format!("{collection}.json.tmp"));
        let json = serde_json::to_vec_pretty(docs)?;
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| StoreError::io_error(&tmp, e))?;
        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(StoreError::io_error(&path, e));
        }
        tracing::debug!("Wrote {} documents to {}", docs.len(), path.display());
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for FileStore {
    async fn bulk_write(
        &self,
        collection: &str,
        records: Vec<Record>,
    ) -> Result<Vec<DocumentId>, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut docs = self.load(collection).await?;
        let ids: Vec<_> = records
            .into_iter()
            .map(|record| {
                let id = DocumentId::generate();
                docs.insert(id.clone(), record);
                id
            })
            .collect();
        self.save(collection, &docs).await?;
        Ok(ids)
    }

    async fn set_document(
        &self,
        collection: &str,
        id: &DocumentId,
        record: Record,
    ) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut docs = self.load(collection).await?;
        docs.insert(id.clone(), record);
        self.save(collection, &docs).await
    }

    async fn get_document(
        &self,
        collection: &str,
        id: &DocumentId,
    ) -> Result<Option<Record>, StoreError> {
        let mut docs = self.load(collection).await?;
        Ok(docs.swap_remove(id))
    }

    async fn list_documents(&self, collection: &str) -> Result<Vec<StoredDocument>, StoreError> {
        let docs = self.load(collection).await?;
        Ok(docs
            .into_iter()
            .map(|(id, record)| StoredDocument { id, record })
            .collect())
    }

    async fn clear_collection(&self, collection: &str) -> Result<usize, StoreError> {
        let _guard = self.write_lock.lock().await;
        let docs = self.load(collection).await?;
        if docs.is_empty() {
            return Ok(0);
        }
        let path = self.collection_path(collection);
        tokio::fs::remove_file(&path)
            .await
            .map_err(|e| StoreError::io_error(&path, e))?;
        Ok(docs.len())
    }
}
