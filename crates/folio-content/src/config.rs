//! Editor configuration
//!
//! Loaded from TOML; every field has a default so an empty file is valid.

use crate::value::LONG_TEXT_THRESHOLD;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Content editor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Collection holding the singleton site-content documents
    pub collection: String,
    /// Strings longer than this render as text areas
    pub long_text_threshold: usize,
    /// Collection name -> page paths to invalidate after a write
    pub revalidate: IndexMap<String, Vec<String>>,
    /// Maximum number of cached pages
    pub cache_capacity: u64,
    /// Page cache time-to-live in seconds (0 = no expiry)
    pub cache_ttl_secs: u64,
}

impl ContentConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from TOML
    ///
    /// # Errors
    /// Returns error if the TOML is malformed or a field has the wrong type
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml)?)
    }

    /// With long-text threshold
    #[inline]
    #[must_use]
    pub fn with_long_text_threshold(mut self, threshold: usize) -> Self {
        self.long_text_threshold = threshold;
        self
    }

    /// With pages to invalidate when `collection` changes
    #[inline]
    #[must_use]
    pub fn with_revalidate(mut self, collection: impl Into<String>, pages: Vec<String>) -> Self {
        self.revalidate.insert(collection.into(), pages);
        self
    }
}

impl Default for ContentConfig {
    fn default() -> Self {
        let revalidate = [
            ("site_content", vec!["/"]),
            ("contact_info", vec!["/"]),
            ("experiences", vec!["/experience", "/"]),
            ("formations", vec!["/education"]),
            ("projects", vec!["/projects", "/"]),
            ("skills", vec!["/skills"]),
        ]
        .into_iter()
        .map(|(collection, pages)| {
            (
                collection.to_string(),
                pages.into_iter().map(str::to_string).collect(),
            )
        })
        .collect();

        Self {
            collection: "site_content".to_string(),
            long_text_threshold: LONG_TEXT_THRESHOLD,
            revalidate,
            cache_capacity: 256,
            cache_ttl_secs: 3600,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Malformed TOML
    #[error("invalid config: {0}")]
    InvalidToml(#[from] toml::de::Error),
}
