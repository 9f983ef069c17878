//! Testing utilities for the Folio workspace
//!
//! Shared fixtures and a store wrapper that records and fails writes.

#![allow(missing_docs)]

use async_trait::async_trait;
use folio_import::{SourceGroup, SourceGroups};
use folio_store::{DocumentId, DocumentStore, MemoryStore, Record, StoreError, StoredDocument};
use parking_lot::Mutex;
use serde_json::json;

/// Home page document with a nested object and a two-item array
pub fn sample_home_content() -> Record {
    Record::new()
        .with(
            "hero",
            json!({
                "title": "Hi, I'm Ada",
                "subtitle": "Backend developer and occasional film editor.\nBased in Lyon.",
            }),
        )
        .with(
            "highlights",
            json!([
                {"label": "Years of experience", "count": 8},
                {"label": "Shipped projects", "count": 23},
            ]),
        )
        .with("available", true)
}

pub fn experience(title: &str, company: &str) -> Record {
    Record::new()
        .with("title", title)
        .with("company", company)
        .with("period", "2020 - 2023")
}

/// Seed with the Work / Film / Work experience groups
///
/// "Lead developer @ Acme" appears in the first and third groups.
pub fn sample_source_groups() -> SourceGroups {
    SourceGroups {
        contact_info: vec![Record::new()
            .with("email", "ada@example.com")
            .with("city", "Lyon")],
        formations: vec![
            Record::new().with("school", "INSA Lyon").with("degree", "MSc"),
            Record::new().with("school", "IUT Lyon").with("degree", "DUT"),
        ],
        experiences: vec![
            SourceGroup::new(
                "Work",
                vec![
                    experience("Lead developer", "Acme"),
                    experience("Developer", "Beta"),
                ],
            ),
            SourceGroup::new("Film", vec![experience("Editor", "Short Films Co")]),
            SourceGroup::new("Work", vec![experience("lead developer ", "ACME")]),
        ],
        projects: vec![
            SourceGroup::new("Web", vec![Record::new().with("title", "Folio")]),
            SourceGroup::new("Tools", vec![Record::new().with("title", "seedctl")]),
        ],
        skills: vec![SourceGroup::new(
            "Languages",
            vec![
                Record::new().with("name", "Rust"),
                Record::new().with("name", "SQL"),
            ],
        )],
        home: sample_home_content(),
        social_links: Record::new().with("github", "https://github.com/ada"),
        statistics: Record::new().with("visitors", 0),
    }
}

/// A store call observed by [`RecordingStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    BulkWrite { collection: String, count: usize },
    SetDocument { collection: String, id: String },
}

impl StoreCall {
    pub fn collection(&self) -> &str {
        match self {
            Self::BulkWrite { collection, .. } | Self::SetDocument { collection, .. } => collection,
        }
    }
}

/// [`MemoryStore`] wrapper that logs every write attempt
///
/// Writes to the collection passed to [`RecordingStore::failing_on`] are
/// logged, then rejected with [`StoreError::PermissionDenied`].
#[derive(Debug, Default)]
pub struct RecordingStore {
    inner: MemoryStore,
    fail_on: Option<String>,
    calls: Mutex<Vec<StoreCall>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(collection: &str) -> Self {
        Self {
            fail_on: Some(collection.to_string()),
            ..Self::default()
        }
    }

    /// Write attempts in call order, including the rejected one
    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().clone()
    }

    /// Collections in the order they were written to
    pub fn attempted_collections(&self) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .map(|c| c.collection().to_string())
            .collect()
    }

    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }

    fn check(&self, collection: &str) -> Result<(), StoreError> {
        if self.fail_on.as_deref() == Some(collection) {
            return Err(StoreError::PermissionDenied(collection.to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for RecordingStore {
    async fn bulk_write(
        &self,
        collection: &str,
        records: Vec<Record>,
    ) -> Result<Vec<DocumentId>, StoreError> {
        self.calls.lock().push(StoreCall::BulkWrite {
            collection: collection.to_string(),
            count: records.len(),
        });
        self.check(collection)?;
        self.inner.bulk_write(collection, records).await
    }

    async fn set_document(
        &self,
        collection: &str,
        id: &DocumentId,
        record: Record,
    ) -> Result<(), StoreError> {
        self.calls.lock().push(StoreCall::SetDocument {
            collection: collection.to_string(),
            id: id.as_str().to_string(),
        });
        self.check(collection)?;
        self.inner.set_document(collection, id, record).await
    }

    async fn get_document(
        &self,
        collection: &str,
        id: &DocumentId,
    ) -> Result<Option<Record>, StoreError> {
        self.inner.get_document(collection, id).await
    }

    async fn list_documents(&self, collection: &str) -> Result<Vec<StoredDocument>, StoreError> {
        self.inner.list_documents(collection).await
    }

    async fn clear_collection(&self, collection: &str) -> Result<usize, StoreError> {
        self.inner.clear_collection(collection).await
    }
}
