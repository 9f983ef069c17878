//! Seed data for the migration
//!
//! [`SourceGroups`] is the static content the site shipped with before it
//! moved to the document store: plain record lists, category-tagged groups,
//! and three singleton documents. It is read from a YAML or JSON seed file.

use crate::error::SeedError;
use folio_store::Record;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Records sharing one category value
///
/// Every record of the group is tagged with `category` before it is written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceGroup {
    pub category: String,
    #[serde(default)]
    pub records: Vec<Record>,
}

impl SourceGroup {
    /// Create group
    #[inline]
    #[must_use]
    pub fn new(category: impl Into<String>, records: Vec<Record>) -> Self {
        Self {
            category: category.into(),
            records,
        }
    }
}

/// All seed content of one migration pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceGroups {
    pub contact_info: Vec<Record>,
    pub formations: Vec<Record>,
    /// Experience groups in precedence order: later groups win on dedup
    pub experiences: Vec<SourceGroup>,
    pub projects: Vec<SourceGroup>,
    pub skills: Vec<SourceGroup>,
    pub home: Record,
    pub social_links: Record,
    pub statistics: Record,
}

impl SourceGroups {
    /// Parse from YAML
    ///
    /// # Errors
    /// Returns error if the YAML is invalid or does not match the seed shape
    pub fn from_yaml_str(yaml: &str) -> Result<Self, SeedError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parse from JSON
    ///
    /// # Errors
    /// Returns error if the JSON is invalid or does not match the seed shape
    pub fn from_json_str(json: &str) -> Result<Self, SeedError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a seed file, choosing the format by extension
    ///
    /// # Errors
    /// Returns error if the file cannot be read, has an unknown extension or
    /// does not parse
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, SeedError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let parse: fn(&str) -> Result<Self, SeedError> = match extension.as_deref() {
            Some("yaml" | "yml") => Self::from_yaml_str,
            Some("json") => Self::from_json_str,
            _ => return Err(SeedError::UnsupportedFormat(path.to_path_buf())),
        };

        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| SeedError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        parse(&text)
    }

    /// Number of records across every group (singletons excluded)
    #[must_use]
    pub fn record_count(&self) -> usize {
        let grouped = |groups: &[SourceGroup]| groups.iter().map(|g| g.records.len()).sum::<usize>();
        self.contact_info.len()
            + self.formations.len()
            + grouped(&self.experiences)
            + grouped(&self.projects)
            + grouped(&self.skills)
    }
}
