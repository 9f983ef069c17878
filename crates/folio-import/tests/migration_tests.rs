//! End-to-end migration runs.
//!
//! Uses the shared Work / Film / Work seed and a recording store to check
//! the write order, the experience merge and fail-fast behavior.

use folio_import::{
    run_migration, MigrationConfig, MigrationError, MigrationPlan, MigrationStep, SourceGroups,
};
use folio_store::{DocumentId, DocumentStore, MemoryStore, StoreError};
use folio_test_utils::{sample_source_groups, RecordingStore, StoreCall};
use pretty_assertions::assert_eq;

/// Collapsing Work / Film / Work
///
/// "Lead developer @ Acme" appears in both Work groups. It must collapse to
/// one record that keeps the first group's position but carries the third
/// group's fields. The Film record keeps its own type.
#[tokio::test]
async fn work_film_work_collapses_to_last_occurrence() {
    let store = MemoryStore::new();
    let report = run_migration(&store, &sample_source_groups(), &MigrationConfig::default())
        .await
        .unwrap();

    let experiences = store.records("experiences");
    let summary: Vec<(&str, &str, &str)> = experiences
        .iter()
        .map(|r| {
            (
                r.get_str("title").unwrap(),
                r.get_str("company").unwrap(),
                r.get_str("type").unwrap(),
            )
        })
        .collect();
    assert_eq!(
        summary,
        vec![
            ("lead developer ", "ACME", "Work"),
            ("Developer", "Beta", "Work"),
            ("Editor", "Short Films Co", "Film"),
        ]
    );
    assert_eq!(report.experiences_collapsed, 1);
    assert_eq!(report.step(MigrationStep::Experiences).unwrap().written, 3);
}

#[tokio::test]
async fn writes_follow_fixed_order() {
    let store = RecordingStore::new();
    run_migration(&store, &sample_source_groups(), &MigrationConfig::default())
        .await
        .unwrap();

    assert_eq!(
        store.calls(),
        vec![
            StoreCall::BulkWrite { collection: "contact_info".into(), count: 1 },
            StoreCall::BulkWrite { collection: "formations".into(), count: 2 },
            StoreCall::BulkWrite { collection: "experiences".into(), count: 3 },
            StoreCall::BulkWrite { collection: "projects".into(), count: 2 },
            StoreCall::BulkWrite { collection: "skills".into(), count: 2 },
            StoreCall::SetDocument { collection: "site_content".into(), id: "home".into() },
            StoreCall::SetDocument { collection: "site_content".into(), id: "social_links".into() },
            StoreCall::SetDocument { collection: "site_content".into(), id: "statistics".into() },
        ]
    );
}

/// Failure at experiences stops the run
///
/// Nothing after the experiences write is attempted; the two collections
/// written before it stay written.
#[tokio::test]
async fn failure_at_experiences_is_fail_fast() {
    let store = RecordingStore::failing_on("experiences");
    let err = run_migration(&store, &sample_source_groups(), &MigrationConfig::default())
        .await
        .unwrap_err();

    assert_eq!(
        store.attempted_collections(),
        vec!["contact_info", "formations", "experiences"]
    );
    match &err {
        MigrationError::WriteFailure {
            step,
            collection,
            completed,
            source,
        } => {
            assert_eq!(*step, MigrationStep::Experiences);
            assert_eq!(collection, "experiences");
            assert_eq!(completed, &vec![MigrationStep::ContactInfo, MigrationStep::Formations]);
            assert!(matches!(source, StoreError::PermissionDenied(_)));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("experiences"));
    assert_eq!(store.inner().len("formations"), 2);
    assert!(store.inner().is_empty("projects"));
}

#[tokio::test]
async fn oversized_batch_fails_the_step() {
    let store = MemoryStore::new().with_max_batch_size(Some(1));
    let err = run_migration(&store, &sample_source_groups(), &MigrationConfig::default())
        .await
        .unwrap_err();

    assert_eq!(err.failed_step(), MigrationStep::Formations);
    assert_eq!(store.len("contact_info"), 1);
}

/// Retrying after a partial failure duplicates written collections
/// unless they are cleared first.
#[tokio::test]
async fn retry_after_clearing_partial_state() {
    let store = MemoryStore::new();
    let seed = sample_source_groups();
    let config = MigrationConfig::default();

    run_migration(&store, &seed, &config).await.unwrap();
    run_migration(&store, &seed, &config).await.unwrap();
    assert_eq!(store.len("contact_info"), 2);
    // singletons are keyed and overwrite
    assert_eq!(store.len("site_content"), 3);

    let plan = MigrationPlan::build(&seed, &config);
    for planned in plan.steps() {
        store.clear_collection(planned.write.collection()).await.unwrap();
    }
    run_migration(&store, &seed, &config).await.unwrap();
    assert_eq!(store.len("contact_info"), 1);
    assert_eq!(store.len("experiences"), 3);
}

#[tokio::test]
async fn custom_config_targets_other_collections() {
    let config = MigrationConfig::from_toml_str(
        r#"
        experience_category_field = "source"

        [collections]
        experiences = "jobs"

        [singletons]
        collection = "pages"
        "#,
    )
    .unwrap();
    let store = MemoryStore::new();
    run_migration(&store, &sample_source_groups(), &config)
        .await
        .unwrap();

    assert_eq!(store.records("jobs")[2].get_str("source"), Some("Film"));
    assert!(store
        .get_document("pages", &DocumentId::new("home"))
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn empty_seed_writes_only_singletons() {
    let store = MemoryStore::new();
    let report = run_migration(&store, &SourceGroups::default(), &MigrationConfig::default())
        .await
        .unwrap();
    assert_eq!(report.steps.len(), 8);
    assert_eq!(report.total_written(), 3);
    assert_eq!(store.collection_names(), vec!["site_content".to_string()]);
}
