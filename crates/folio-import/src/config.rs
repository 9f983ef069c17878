//! Migration configuration
//!
//! Collection names, discriminator fields and dedup key fields. Defaults
//! match the portfolio site's collections; every field can be overridden
//! from TOML.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Migration configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MigrationConfig {
    /// Target collections for record groups
    pub collections: CollectionNames,
    /// Target of the singleton documents
    pub singletons: SingletonDocs,
    /// Discriminator added to experience records
    pub experience_category_field: String,
    /// Discriminator added to project records
    pub project_category_field: String,
    /// Discriminator added to skill records
    pub skill_category_field: String,
    /// Fields forming the experience dedup key
    pub experience_key: DedupKeyFields,
}

impl MigrationConfig {
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

    /// With experience dedup key fields
    #[inline]
    #[must_use]
    pub fn with_experience_key(
        mut self,
        primary: impl Into<String>,
        secondary: impl Into<String>,
    ) -> Self {
        self.experience_key = DedupKeyFields {
            primary: primary.into(),
            secondary: secondary.into(),
        };
        self
    }

    /// With experience discriminator field
    #[inline]
    #[must_use]
    pub fn with_experience_category_field(mut self, field: impl Into<String>) -> Self {
        self.experience_category_field = field.into();
        self
    }
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            collections: CollectionNames::default(),
            singletons: SingletonDocs::default(),
            experience_category_field: "type".to_string(),
            project_category_field: "category".to_string(),
            skill_category_field: "category".to_string(),
            experience_key: DedupKeyFields::default(),
        }
    }
}

/// Collection written for each record group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionNames {
    pub contact_info: String,
    pub formations: String,
    pub experiences: String,
    pub projects: String,
    pub skills: String,
}

impl Default for CollectionNames {
    fn default() -> Self {
        Self {
            contact_info: "contact_info".to_string(),
            formations: "formations".to_string(),
            experiences: "experiences".to_string(),
            projects: "projects".to_string(),
            skills: "skills".to_string(),
        }
    }
}

/// Collection and ids of the singleton documents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SingletonDocs {
    pub collection: String,
    pub home: String,
    pub social_links: String,
    pub statistics: String,
}

impl Default for SingletonDocs {
    fn default() -> Self {
        Self {
            collection: "site_content".to_string(),
            home: "home".to_string(),
            social_links: "social_links".to_string(),
            statistics: "statistics".to_string(),
        }
    }
}

/// Two fields whose normalized values identify a logical entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DedupKeyFields {
    pub primary: String,
    pub secondary: String,
}

impl Default for DedupKeyFields {
    fn default() -> Self {
        Self {
            primary: "title".to_string(),
            secondary: "company".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(
            MigrationConfig::from_toml_str("").unwrap(),
            MigrationConfig::default()
        );
    }

    #[test]
    fn partial_tables_keep_other_defaults() {
        let config = MigrationConfig::from_toml_str(
            r#"
            experience_category_field = "kind"

            [collections]
            experiences = "jobs"

            [experience_key]
            primary = "role"
            secondary = "employer"
            "#,
        )
        .unwrap();
        assert_eq!(config.experience_category_field, "kind");
        assert_eq!(config.collections.experiences, "jobs");
        assert_eq!(config.collections.projects, "projects");
        assert_eq!(config.experience_key.primary, "role");
        assert_eq!(config.singletons.home, "home");
    }

    #[test]
    fn builders() {
        let config = MigrationConfig::new()
            .with_experience_key("role", "org")
            .with_experience_category_field("source");
        assert_eq!(config.experience_key.secondary, "org");
        assert_eq!(config.experience_category_field, "source");
    }
}
