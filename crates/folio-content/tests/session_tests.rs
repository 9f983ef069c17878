//! Edit sessions against an in-memory store.
//!
//! Covers the dashboard flow: fetch a document, edit it through paths taken
//! from the generated form, save it wholesale and drop the cached pages that
//! render it.

use folio_content::{
    ContentConfig, EditPath, EditSession, FormEntry, PageCache, SessionError,
};
use folio_store::{DocumentId, DocumentStore, MemoryStore, Record};
use folio_test_utils::sample_home_content;
use pretty_assertions::assert_eq;
use serde_json::json;

fn p(s: &str) -> EditPath {
    s.parse().expect("valid path")
}

async fn seeded_store() -> MemoryStore {
    let store = MemoryStore::new();
    store
        .set_document("site_content", &DocumentId::new("home"), sample_home_content())
        .await
        .expect("seed home");
    store
}

#[tokio::test]
async fn load_edit_save_round_trip() {
    let store = seeded_store().await;
    let mut session = EditSession::load(&store, "site_content", DocumentId::new("home"))
        .await
        .unwrap();
    assert!(!session.is_dirty());

    session.set(&p("hero.title"), json!("Hello again")).unwrap();
    session.append(&p("highlights")).unwrap();
    session.set(&p("highlights[2].label"), json!("Talks")).unwrap();
    assert!(session.is_dirty());

    let outcome = session.save(&store, None).await.unwrap();
    assert!(outcome.written);
    assert!(!session.is_dirty());

    let stored = store
        .get_document("site_content", &DocumentId::new("home"))
        .await
        .unwrap()
        .unwrap()
        .into_value();
    assert_eq!(stored["hero"]["title"], json!("Hello again"));
    assert_eq!(stored["highlights"][2], json!({"label": "Talks", "count": 0}));
}

#[tokio::test]
async fn clean_session_skips_write() {
    let store = MemoryStore::new().with_read_only("site_content");
    let mut session = EditSession::new("site_content", DocumentId::new("home"), json!({"a": 1}));
    // a write would be rejected by the read-only collection
    let outcome = session.save(&store, None).await.unwrap();
    assert!(!outcome.written);
}

#[tokio::test]
async fn save_invalidates_pages() {
    let store = seeded_store().await;
    let cache = PageCache::from_config(&ContentConfig::default());
    cache.insert("/", json!({"stale": true})).await;

    let mut session = EditSession::load(&store, "site_content", DocumentId::new("home"))
        .await
        .unwrap();
    session.remove(&p("highlights"), 0).unwrap();
    let outcome = session.save(&store, Some(&cache)).await.unwrap();

    assert_eq!(outcome.invalidated, vec!["/".to_string()]);
    assert!(cache.get("/").await.is_none());
}

#[tokio::test]
async fn failed_edit_leaves_session_unchanged() {
    let store = seeded_store().await;
    let mut session = EditSession::load(&store, "site_content", DocumentId::new("home"))
        .await
        .unwrap();
    let before = session.root().clone();

    assert!(session.remove(&p("highlights"), 10).is_err());
    assert!(session.append(&p("hero")).is_err());
    assert!(session.set(&p("nope.deeper"), json!(1)).is_err());
    assert_eq!(session.root(), &before);
    assert!(!session.is_dirty());
}

#[tokio::test]
async fn missing_document() {
    let store = MemoryStore::new();
    let result = EditSession::load(&store, "site_content", DocumentId::new("ghost")).await;
    assert!(matches!(result, Err(SessionError::NotFound { .. })));
}

#[tokio::test]
async fn non_object_root_cannot_be_saved() {
    let store = MemoryStore::new();
    let mut session = EditSession::new("site_content", DocumentId::new("list"), json!([1]));
    session.append(&EditPath::root()).unwrap();
    let result = session.save(&store, None).await;
    assert!(matches!(result, Err(SessionError::RootNotObject("array"))));
}

#[tokio::test]
async fn form_paths_are_editable() {
    let store = seeded_store().await;
    let mut session = EditSession::load(&store, "site_content", DocumentId::new("home"))
        .await
        .unwrap();

    let field_paths: Vec<EditPath> = session
        .form(60)
        .into_iter()
        .filter_map(|entry| match entry {
            FormEntry::Field(field) if field.value.is_string() => Some(field.path),
            _ => None,
        })
        .collect();
    assert!(!field_paths.is_empty());

    for path in &field_paths {
        session.set(path, json!("edited")).unwrap();
    }
    for path in &field_paths {
        assert_eq!(session.get(path), Some(&json!("edited")));
    }
}

#[tokio::test]
async fn reset_discards_edits() {
    let mut session = EditSession::new("site_content", DocumentId::new("x"), json!({"a": 1}));
    session.set(&p("a"), json!(2)).unwrap();
    assert!(session.is_dirty());
    session.reset(Record::new().with("a", 3).into_value());
    assert!(!session.is_dirty());
    assert_eq!(session.root(), &json!({"a": 3}));
}
