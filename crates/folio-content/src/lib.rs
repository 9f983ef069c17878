//! Folio Content Editor
//!
//! Generic structural editing of schema-less site-content documents.
//!
//! # Core Concepts
//!
//! - [`EditPath`]: Key/index path addressing a node from the root
//! - [`classify`]: Shape of a node, selecting how it is edited and rendered
//! - [`set_value`], [`append_array_item`], [`remove_array_item`]: Pure edits
//!   returning a new root
//! - [`form_entries`]: Recursive form description for the admin dashboard
//! - [`EditSession`]: Load, edit and save a stored document wholesale
//! - [`PageCache`]: Page data cache invalidated by collection writes
//!
//! # Example
//!
//! ```rust,ignore
//! use folio_content::{append_array_item, set_value, EditPath};
//! use serde_json::json;
//!
//! let doc = json!({"experience": [{"title": "Dev", "company": "Acme"}]});
//! let doc = append_array_item(&doc, &"experience".parse()?)?;
//! let doc = set_value(&doc, &"experience[1].title".parse()?, json!("Lead"))?;
//! assert_eq!(doc["experience"][1], json!({"title": "Lead", "company": ""}));
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
mod edit;
mod hash;
mod path;
mod value;

pub mod cache;
pub mod config;
pub mod fields;
pub mod session;

// Re-exports
pub use cache::{CacheStats, PageCache};
pub use config::{ConfigError, ContentConfig};
pub use edit::{append_array_item, get, remove_array_item, set_value, EditError};
pub use fields::{form_entries, form_entries_with, humanize, FormEntry, FormField};
pub use hash::ContentHash;
pub use path::{EditPath, PathError, PathSegment};
pub use session::{EditSession, SaveOutcome, SessionError};
pub use value::{
    classify, is_zeroed, placeholder_item, text_hint, text_hint_with, zeroed, TextHint, ValueKind,
    LONG_TEXT_THRESHOLD, PLACEHOLDER_KEY,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
