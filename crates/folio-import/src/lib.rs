//! Folio Seed Import
//!
//! Moves the site's static seed content into the document store in one
//! migration pass.
//!
//! # Core Concepts
//!
//! - [`SourceGroups`]: Seed content, loaded from YAML or JSON
//! - [`tag_group`]: Stamp a group's category onto each of its records
//! - [`dedupe_by_key`]: Last write wins, first-seen position
//! - [`MigrationPlan`]: Tagged and deduplicated writes in execution order
//! - [`run_migration`]: Fail-fast sequential writes with a per-step report
//!
//! # Example
//!
//! ```rust,ignore
//! use folio_import::{run_migration, MigrationConfig, SourceGroups};
//! use folio_store::MemoryStore;
//!
//! let seed = SourceGroups::load("seed.yaml").await?;
//! let report = run_migration(&MemoryStore::new(), &seed, &MigrationConfig::default()).await?;
//! println!("{} documents written", report.total_written());
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod config;
mod dedupe;
pub mod error;
mod migration;
mod source;

pub use config::{CollectionNames, DedupKeyFields, MigrationConfig, SingletonDocs};
pub use dedupe::{dedupe_by_key, experience_key, tag_group, DEDUP_KEY_SEPARATOR};
pub use error::{ConfigError, MigrationError, SeedError};
pub use migration::{
    bulk_write, merge_experiences, run_migration, MigrationPlan, MigrationReport, MigrationStep,
    PlannedStep, PlannedWrite, StepReport,
};
pub use source::{SourceGroup, SourceGroups};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
