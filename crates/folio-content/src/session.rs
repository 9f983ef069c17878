//! Editing sessions over stored documents
//!
//! A session loads one document, applies structural edits in memory and
//! persists the whole document on save. There is no partial-field
//! persistence: the store always receives the complete edited root.

use crate::cache::PageCache;
use crate::edit::{self, EditError};
use crate::fields::{form_entries_with, FormEntry};
use crate::hash::ContentHash;
use crate::path::EditPath;
use folio_store::{DocumentId, DocumentStore, Record, StoreError};
use serde_json::Value;

/// Errors from loading or saving a session
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Document does not exist
    #[error("document '{id}' not found in '{collection}'")]
    NotFound { collection: String, id: DocumentId },

    /// Stored documents must be JSON objects
    #[error("document root must be an object, found {0}")]
    RootNotObject(&'static str),

    /// Edit rejected
    #[error("edit failed: {0}")]
    Edit(#[from] EditError),

    /// Store rejected the read or write
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Result of a save
#[derive(Debug, Clone, PartialEq)]
pub struct SaveOutcome {
    /// Whether anything was written (clean sessions skip the write)
    pub written: bool,
    /// Hash of the persisted document
    pub hash: ContentHash,
    /// Page paths dropped from the page cache
    pub invalidated: Vec<String>,
}

/// In-memory editing session for one document
#[derive(Debug, Clone)]
pub struct EditSession {
    collection: String,
    id: DocumentId,
    root: Value,
    /// Hash of the last loaded or saved version
    base_hash: ContentHash,
}

impl EditSession {
    /// Start a session on a document that is already in memory
    #[must_use]
    pub fn new(collection: impl Into<String>, id: DocumentId, root: Value) -> Self {
        let base_hash = ContentHash::of_value(&root);
        Self {
            collection: collection.into(),
            id,
            root,
            base_hash,
        }
    }

    /// Load a document from the store
    ///
    /// # Errors
    /// - [`SessionError::NotFound`] if the document does not exist
    /// - [`SessionError::Store`] if the store cannot be read
    pub async fn load<S>(store: &S, collection: &str, id: DocumentId) -> Result<Self, SessionError>
    where
        S: DocumentStore + ?Sized,
    {
        let record = store
            .get_document(collection, &id)
            .await?
            .ok_or_else(|| SessionError::NotFound {
                collection: collection.to_string(),
                id: id.clone(),
            })?;
        tracing::debug!("Loaded {}/{} for editing", collection, id);
        Ok(Self::new(collection, id, record.into_value()))
    }

    /// Collection the document belongs to
    #[inline]
    #[must_use]
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Document id
    #[inline]
    #[must_use]
    pub fn id(&self) -> &DocumentId {
        &self.id
    }

    /// Current document
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Read the node at `path`
    #[inline]
    #[must_use]
    pub fn get(&self, path: &EditPath) -> Option<&Value> {
        edit::get(&self.root, path)
    }

    /// Replace the node at `path`
    ///
    /// # Errors
    /// See [`edit::set_value`]; the session is unchanged on error
    pub fn set(&mut self, path: &EditPath, value: Value) -> Result<(), EditError> {
        self.root = edit::set_value(&self.root, path, value)?;
        tracing::debug!("Set {} in {}/{}", path, self.collection, self.id);
        Ok(())
    }

    /// Append an item to the array at `path`
    ///
    /// # Errors
    /// See [`edit::append_array_item`]
    pub fn append(&mut self, path: &EditPath) -> Result<(), EditError> {
        self.root = edit::append_array_item(&self.root, path)?;
        tracing::debug!("Appended item to {} in {}/{}", path, self.collection, self.id);
        Ok(())
    }

    /// Remove an item from the array at `path`
    ///
    /// # Errors
    /// See [`edit::remove_array_item`]
    pub fn remove(&mut self, path: &EditPath, index: usize) -> Result<(), EditError> {
        self.root = edit::remove_array_item(&self.root, path, index)?;
        tracing::debug!("Removed item {} of {} in {}/{}", index, path, self.collection, self.id);
        Ok(())
    }

    /// Form describing the current document
    #[inline]
    #[must_use]
    pub fn form(&self, long_text_threshold: usize) -> Vec<FormEntry> {
        form_entries_with(&self.root, long_text_threshold)
    }

    /// Check if the document differs from the last loaded or saved version
    #[inline]
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        ContentHash::of_value(&self.root) != self.base_hash
    }

    /// Discard unsaved edits by replacing the root
    #[inline]
    pub fn reset(&mut self, root: Value) {
        self.base_hash = ContentHash::of_value(&root);
        self.root = root;
    }

    /// Persist the whole document, then invalidate affected pages
    ///
    /// A clean session writes nothing.
    ///
    /// # Errors
    /// - [`SessionError::RootNotObject`] if the root is not a JSON object
    /// - [`SessionError::Store`] if the store rejects the write
    pub async fn save<S>(
        &mut self,
        store: &S,
        cache: Option<&PageCache>,
    ) -> Result<SaveOutcome, SessionError>
    where
        S: DocumentStore + ?Sized,
    {
        let hash = ContentHash::of_value(&self.root);
        if hash == self.base_hash {
            return Ok(SaveOutcome {
                written: false,
                hash,
                invalidated: Vec::new(),
            });
        }

        let record = Record::from_value(self.root.clone())
            .map_err(|other| SessionError::RootNotObject(crate::classify(&other).as_str()))?;
        store.set_document(&self.collection, &self.id, record).await?;
        self.base_hash = hash;

        let invalidated = match cache {
            Some(cache) => cache.invalidate_collection(&self.collection).await,
            None => Vec::new(),
        };
        tracing::info!(
            "Saved {}/{} ({}), {} page(s) invalidated",
            self.collection,
            self.id,
            hash.short(),
            invalidated.len()
        );

        Ok(SaveOutcome {
            written: true,
            hash,
            invalidated,
        })
    }
}
