//! `folio.toml`

use anyhow::Context;
use folio_content::ContentConfig;
use folio_import::MigrationConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Combined configuration file
///
/// ```toml
/// [content]
/// long_text_threshold = 80
///
/// [migration.collections]
/// experiences = "jobs"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct CliConfig {
    pub(crate) content: ContentConfig,
    pub(crate) migration: MigrationConfig,
}

impl CliConfig {
    pub(crate) fn from_toml_str(toml: &str) -> anyhow::Result<Self> {
        toml::from_str(toml).context("invalid configuration")
    }

    /// Read `path`, or use defaults when no file is given
    pub(crate) async fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("in {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_are_optional() {
        assert_eq!(CliConfig::from_toml_str("").unwrap(), CliConfig::default());

        let config = CliConfig::from_toml_str(
            r#"
            [content]
            long_text_threshold = 80

            [migration.collections]
            experiences = "jobs"
            "#,
        )
        .unwrap();
        assert_eq!(config.content.long_text_threshold, 80);
        assert_eq!(config.migration.collections.experiences, "jobs");
        assert_eq!(config.migration.collections.skills, "skills");
    }

    #[test]
    fn rejects_bad_types() {
        assert!(CliConfig::from_toml_str("[content]\nlong_text_threshold = \"x\"").is_err());
    }
}
