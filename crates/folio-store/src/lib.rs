//! Folio Document Store
//!
//! The single external collaborator of the content editor and the seed
//! migration: a schema-less document database addressed by collection name.
//!
//! # Core Concepts
//!
//! - [`Record`]: Flat, insertion-ordered JSON object stored as one document
//! - [`DocumentId`]: Store-assigned (or caller-chosen, for singletons) document key
//! - [`DocumentStore`]: Async trait for bulk writes and singleton documents
//! - [`MemoryStore`]: In-process store with hosted-database batch limits
//! - [`FileStore`]: One JSON file per collection, used by the CLI
//!
//! # Example
//!
//! ```rust,ignore
//! use folio_store::{DocumentStore, MemoryStore, Record};
//!
//! let store = MemoryStore::new();
//! let ids = store
//!     .bulk_write("projects", vec![Record::new().with("title", "Folio")])
//!     .await?;
//! assert_eq!(ids.len(), 1);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod error;
mod file;
mod memory;
mod record;
mod store;

pub use error::StoreError;
pub use file::FileStore;
pub use memory::{MemoryStore, DEFAULT_MAX_BATCH_SIZE};
pub use record::{DocumentId, Record, StoredDocument};
pub use store::{validate_collection, DocumentStore};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
