//! Error types for the seed migration
//!
//! Provides error handling for:
//! - Seed file loading
//! - Configuration parsing
//! - Store write failures (fatal to the run)

use crate::migration::MigrationStep;
use folio_store::StoreError;
use std::path::PathBuf;

/// Migration run errors
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    /// The store rejected a write; the run stopped at this step
    ///
    /// Steps in `completed` were written and are not rolled back.
    #[error("write failed at step '{step}' (collection '{collection}'): {source}")]
    WriteFailure {
        step: MigrationStep,
        collection: String,
        completed: Vec<MigrationStep>,
        #[source]
        source: StoreError,
    },
}

impl MigrationError {
    /// Step that failed
    #[inline]
    #[must_use]
    pub fn failed_step(&self) -> MigrationStep {
        match self {
            Self::WriteFailure { step, .. } => *step,
        }
    }

    /// Steps that were written before the failure
    #[inline]
    #[must_use]
    pub fn completed_steps(&self) -> &[MigrationStep] {
        match self {
            Self::WriteFailure { completed, .. } => completed,
        }
    }
}

/// Seed file errors
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    /// IO error reading the seed file
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid YAML
    #[error("invalid YAML seed: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Invalid JSON
    #[error("invalid JSON seed: {0}")]
    Json(#[from] serde_json::Error),

    /// Extension is neither YAML nor JSON
    #[error("unsupported seed format: {0} (expected .yaml, .yml or .json)")]
    UnsupportedFormat(PathBuf),
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Malformed TOML
    #[error("invalid config: {0}")]
    InvalidToml(#[from] toml::de::Error),
}
