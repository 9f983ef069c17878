//! One-shot migration of seed content into the document store
//!
//! A run is split in two phases:
//! - [`MigrationPlan::build`] tags and deduplicates the seed groups (pure)
//! - [`MigrationPlan::execute`] issues the writes in a fixed order, stopping
//!   at the first failure
//!
//! Writes that succeeded before a failure are not rolled back. Running the
//! migration again after a partial failure duplicates the collections that
//! were already written unless they are cleared first.

use crate::config::MigrationConfig;
use crate::dedupe::{dedupe_by_key, experience_key, tag_group};
use crate::error::MigrationError;
use crate::source::{SourceGroup, SourceGroups};
use folio_store::{DocumentId, DocumentStore, Record, StoreError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Migration steps in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MigrationStep {
    ContactInfo,
    Formations,
    Experiences,
    Projects,
    Skills,
    HomeContent,
    SocialLinks,
    Statistics,
}

impl MigrationStep {
    /// Every step, in the order a run executes them
    pub const ALL: [Self; 8] = [
        Self::ContactInfo,
        Self::Formations,
        Self::Experiences,
        Self::Projects,
        Self::Skills,
        Self::HomeContent,
        Self::SocialLinks,
        Self::Statistics,
    ];

    /// Human-readable name
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ContactInfo => "contact info",
            Self::Formations => "formations",
            Self::Experiences => "experiences",
            Self::Projects => "projects",
            Self::Skills => "skills",
            Self::HomeContent => "home content",
            Self::SocialLinks => "social links",
            Self::Statistics => "statistics",
        }
    }

    /// Whether the step writes a single document under a fixed id
    #[inline]
    #[must_use]
    pub fn is_singleton(self) -> bool {
        matches!(self, Self::HomeContent | Self::SocialLinks | Self::Statistics)
    }
}

impl fmt::Display for MigrationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A single write of the plan
#[derive(Debug, Clone, PartialEq)]
pub enum PlannedWrite {
    /// Bulk write with store-generated ids
    Collection {
        collection: String,
        records: Vec<Record>,
    },
    /// Singleton document under a fixed id
    Document {
        collection: String,
        id: DocumentId,
        record: Record,
    },
}

impl PlannedWrite {
    /// Target collection
    #[inline]
    #[must_use]
    pub fn collection(&self) -> &str {
        match self {
            Self::Collection { collection, .. } | Self::Document { collection, .. } => collection,
        }
    }

    /// Number of documents the write creates
    #[inline]
    #[must_use]
    pub fn record_count(&self) -> usize {
        match self {
            Self::Collection { records, .. } => records.len(),
            Self::Document { .. } => 1,
        }
    }
}

/// Planned step
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedStep {
    pub step: MigrationStep,
    pub write: PlannedWrite,
}

/// Prepared writes of one migration run
#[derive(Debug, Clone, PartialEq)]
pub struct MigrationPlan {
    steps: Vec<PlannedStep>,
    experiences_collapsed: usize,
}

impl MigrationPlan {
    /// Tag, deduplicate and order the seed content
    ///
    /// Empty groups still produce a step (an empty bulk write), so every run
    /// has the same eight steps.
    #[must_use]
    pub fn build(source: &SourceGroups, config: &MigrationConfig) -> Self {
        let names = &config.collections;
        let singletons = &config.singletons;

        let (experiences, experiences_collapsed) = merge_experiences(&source.experiences, config);

        let collection = |step, collection: &str, records| PlannedStep {
            step,
            write: PlannedWrite::Collection {
                collection: collection.to_string(),
                records,
            },
        };
        let document = |step, id: &str, record: &Record| PlannedStep {
            step,
            write: PlannedWrite::Document {
                collection: singletons.collection.clone(),
                id: DocumentId::new(id),
                record: record.clone(),
            },
        };

        let steps = vec![
            collection(
                MigrationStep::ContactInfo,
                &names.contact_info,
                source.contact_info.clone(),
            ),
            collection(
                MigrationStep::Formations,
                &names.formations,
                source.formations.clone(),
            ),
            collection(MigrationStep::Experiences, &names.experiences, experiences),
            collection(
                MigrationStep::Projects,
                &names.projects,
                tag_groups(&source.projects, &config.project_category_field),
            ),
            collection(
                MigrationStep::Skills,
                &names.skills,
                tag_groups(&source.skills, &config.skill_category_field),
            ),
            document(MigrationStep::HomeContent, &singletons.home, &source.home),
            document(
                MigrationStep::SocialLinks,
                &singletons.social_links,
                &source.social_links,
            ),
            document(
                MigrationStep::Statistics,
                &singletons.statistics,
                &source.statistics,
            ),
        ];

        Self {
            steps,
            experiences_collapsed,
        }
    }

    /// Planned steps in execution order
    #[inline]
    #[must_use]
    pub fn steps(&self) -> &[PlannedStep] {
        &self.steps
    }

    /// Experience records removed by deduplication
    #[inline]
    #[must_use]
    pub fn experiences_collapsed(&self) -> usize {
        self.experiences_collapsed
    }

    /// Documents the plan creates
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.steps.iter().map(|s| s.write.record_count()).sum()
    }

    /// Issue the writes in order, stopping at the first failure
    ///
    /// # Errors
    /// Returns [`MigrationError::WriteFailure`] naming the failed step and
    /// the steps already written
    pub async fn execute<S>(self, store: &S) -> Result<MigrationReport, MigrationError>
    where
        S: DocumentStore + ?Sized,
    {
        let mut report = MigrationReport {
            steps: Vec::with_capacity(self.steps.len()),
            experiences_collapsed: self.experiences_collapsed,
        };

        for PlannedStep { step, write } in self.steps {
            let collection = write.collection().to_string();
            tracing::info!("Migrating {} into '{}'", step, collection);

            let result = match write {
                PlannedWrite::Collection {
                    collection,
                    records,
                } => bulk_write(store, &collection, records).await,
                PlannedWrite::Document {
                    collection,
                    id,
                    record,
                } => store
                    .set_document(&collection, &id, record)
                    .await
                    .map(|()| 1),
            };

            match result {
                Ok(written) => {
                    tracing::info!("Wrote {} document(s) for {}", written, step);
                    report.steps.push(StepReport {
                        step,
                        collection,
                        written,
                    });
                }
                Err(source) => {
                    tracing::error!("Migration stopped at {}: {}", step, source);
                    return Err(MigrationError::WriteFailure {
                        step,
                        collection,
                        completed: report.completed_steps(),
                        source,
                    });
                }
            }
        }

        tracing::info!(
            "Migration completed: {} documents in {} steps",
            report.total_written(),
            report.steps.len()
        );
        Ok(report)
    }
}

/// Outcome of one successful step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepReport {
    pub step: MigrationStep,
    pub collection: String,
    pub written: usize,
}

/// Outcome of a completed migration run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationReport {
    pub steps: Vec<StepReport>,
    pub experiences_collapsed: usize,
}

impl MigrationReport {
    /// Documents written across all steps
    #[must_use]
    pub fn total_written(&self) -> usize {
        self.steps.iter().map(|s| s.written).sum()
    }

    /// Report of a single step
    #[must_use]
    pub fn step(&self, step: MigrationStep) -> Option<&StepReport> {
        self.steps.iter().find(|s| s.step == step)
    }

    fn completed_steps(&self) -> Vec<MigrationStep> {
        self.steps.iter().map(|s| s.step).collect()
    }
}

/// Write every record to `collection` as one batch
///
/// # Errors
/// Returns the store error unchanged; the batch is all-or-nothing
pub async fn bulk_write<S>(
    store: &S,
    collection: &str,
    records: Vec<Record>,
) -> Result<usize, StoreError>
where
    S: DocumentStore + ?Sized,
{
    let ids = store.bulk_write(collection, records).await?;
    tracing::debug!("Bulk write to '{}' assigned {} ids", collection, ids.len());
    Ok(ids.len())
}

/// Plan and execute a migration
///
/// # Errors
/// See [`MigrationPlan::execute`]
pub async fn run_migration<S>(
    store: &S,
    source: &SourceGroups,
    config: &MigrationConfig,
) -> Result<MigrationReport, MigrationError>
where
    S: DocumentStore + ?Sized,
{
    MigrationPlan::build(source, config).execute(store).await
}

/// Tag each experience group, concatenate in group order and deduplicate
///
/// Returns the merged records and how many were collapsed.
#[must_use]
pub fn merge_experiences(groups: &[SourceGroup], config: &MigrationConfig) -> (Vec<Record>, usize) {
    let tagged = tag_groups(groups, &config.experience_category_field);
    let before = tagged.len();
    let merged = dedupe_by_key(tagged, |r| experience_key(r, &config.experience_key));
    let collapsed = before - merged.len();
    if collapsed > 0 {
        tracing::debug!("Collapsed {} duplicate experience(s)", collapsed);
    }
    (merged, collapsed)
}

fn tag_groups(groups: &[SourceGroup], field: &str) -> Vec<Record> {
    groups
        .iter()
        .flat_map(|g| tag_group(&g.records, field, &g.category))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_store::MemoryStore;

    fn exp(title: &str, company: &str) -> Record {
        Record::new().with("title", title).with("company", company)
    }

    fn source() -> SourceGroups {
        SourceGroups {
            contact_info: vec![Record::new().with("email", "ada@example.com")],
            experiences: vec![
                SourceGroup::new("Work", vec![exp("Dev", "Acme")]),
                SourceGroup::new("Film", vec![exp("Dev", "ACME "), exp("Editor", "Studio")]),
            ],
            projects: vec![SourceGroup::new("Web", vec![Record::new().with("title", "Folio")])],
            home: Record::new().with("headline", "Hi"),
            ..SourceGroups::default()
        }
    }

    #[test]
    fn step_order_and_names() {
        assert_eq!(MigrationStep::ALL[2], MigrationStep::Experiences);
        assert_eq!(MigrationStep::HomeContent.to_string(), "home content");
        assert!(MigrationStep::Statistics.is_singleton());
        assert!(!MigrationStep::Skills.is_singleton());
    }

    #[test]
    fn plan_covers_every_step_in_order() {
        let plan = MigrationPlan::build(&source(), &MigrationConfig::default());
        let steps: Vec<_> = plan.steps().iter().map(|s| s.step).collect();
        assert_eq!(steps, MigrationStep::ALL.to_vec());
        assert_eq!(plan.experiences_collapsed(), 1);
        // 1 contact + 2 experiences + 1 project + 3 singletons
        assert_eq!(plan.record_count(), 7);
    }

    #[test]
    fn plan_tags_projects_with_category_field() {
        let plan = MigrationPlan::build(&source(), &MigrationConfig::default());
        let PlannedWrite::Collection { records, .. } = &plan.steps()[3].write else {
            panic!("projects should be a bulk write");
        };
        assert_eq!(records[0].get_str("category"), Some("Web"));
    }

    #[test]
    fn merge_keeps_first_position_and_last_category() {
        let (merged, collapsed) = merge_experiences(&source().experiences, &MigrationConfig::default());
        assert_eq!(collapsed, 1);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].get_str("company"), Some("ACME "));
        assert_eq!(merged[0].get_str("type"), Some("Film"));
        assert_eq!(merged[1].get_str("title"), Some("Editor"));
    }

    #[tokio::test]
    async fn run_writes_collections_and_singletons() {
        let store = MemoryStore::new();
        let report = run_migration(&store, &source(), &MigrationConfig::default())
            .await
            .unwrap();

        assert_eq!(report.steps.len(), 8);
        assert_eq!(report.total_written(), 7);
        assert_eq!(store.len("experiences"), 2);
        assert_eq!(store.len("skills"), 0);
        let home = store
            .get_document("site_content", &DocumentId::new("home"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(home.get_str("headline"), Some("Hi"));
    }

    #[tokio::test]
    async fn read_only_collection_stops_the_run() {
        let store = MemoryStore::new().with_read_only("experiences");
        let err = run_migration(&store, &source(), &MigrationConfig::default())
            .await
            .unwrap_err();

        assert_eq!(err.failed_step(), MigrationStep::Experiences);
        assert_eq!(
            err.completed_steps(),
            &[MigrationStep::ContactInfo, MigrationStep::Formations]
        );
        assert_eq!(store.len("contact_info"), 1);
        assert!(store.is_empty("projects"));
        assert!(store.is_empty("site_content"));
    }
}
