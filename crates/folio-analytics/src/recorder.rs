//! Event ingestion against the document store

use crate::error::AnalyticsError;
use crate::event::AnalyticsEvent;
use crate::summary::{aggregate, DashboardSummary};
use folio_store::{DocumentId, DocumentStore};

/// Collection holding analytics events
pub const DEFAULT_COLLECTION: &str = "analytics";

/// Validates events and stores one document per event
#[derive(Debug)]
pub struct AnalyticsRecorder<'a, S: ?Sized> {
    store: &'a S,
    collection: String,
}

impl<'a, S> AnalyticsRecorder<'a, S>
where
    S: DocumentStore + ?Sized,
{
    /// Recorder writing to the `analytics` collection
    #[inline]
    #[must_use]
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            collection: DEFAULT_COLLECTION.to_string(),
        }
    }

    /// With a different target collection
    #[inline]
    #[must_use]
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    /// Target collection
    #[inline]
    #[must_use]
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Validate and store one event
    ///
    /// # Errors
    /// Returns error if the event is invalid or the store rejects the write
    pub async fn record(&self, event: &AnalyticsEvent) -> Result<DocumentId, AnalyticsError> {
        event.validate()?;
        let id = DocumentId::generate();
        self.store
            .set_document(&self.collection, &id, event.to_record()?)
            .await?;
        tracing::debug!("Recorded {} event {}", event.kind.as_str(), id);
        Ok(id)
    }

    /// Validate every event, then store them as one batch
    ///
    /// Nothing is written if any event is invalid.
    ///
    /// # Errors
    /// Returns the first validation error, or the store error
    pub async fn record_batch(&self, events: &[AnalyticsEvent]) -> Result<usize, AnalyticsError> {
        let records = events
            .iter()
            .map(|event| {
                event.validate()?;
                event.to_record()
            })
            .collect::<Result<Vec<_>, _>>()?;
        let ids = self.store.bulk_write(&self.collection, records).await?;
        tracing::info!("Recorded {} analytics events", ids.len());
        Ok(ids.len())
    }

    /// All stored events in write order
    ///
    /// Documents that do not decode as events are skipped with a warning.
    ///
    /// # Errors
    /// Returns error if the collection cannot be read
    pub async fn events(&self) -> Result<Vec<AnalyticsEvent>, AnalyticsError> {
        let documents = self.store.list_documents(&self.collection).await?;
        let events = documents
            .into_iter()
            .filter_map(|doc| match AnalyticsEvent::from_record(doc.record) {
                Ok(event) => Some(event),
                Err(e) => {
                    tracing::warn!("Skipping analytics document {}: {}", doc.id, e);
                    None
                }
            })
            .collect();
        Ok(events)
    }

    /// Aggregate every stored event
    ///
    /// # Errors
    /// Returns error if the collection cannot be read
    pub async fn summary(&self) -> Result<DashboardSummary, AnalyticsError> {
        Ok(aggregate(&self.events().await?))
    }
}
