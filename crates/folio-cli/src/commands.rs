//! Subcommand implementations
//!
//! Each command returns the text to print so it can be tested without
//! capturing stdout.

use crate::config::CliConfig;
use anyhow::{bail, Context};
use folio_analytics::{AnalyticsEvent, AnalyticsRecorder, DashboardSummary, EventKind};
use folio_content::{EditPath, EditSession, FormEntry, SaveOutcome, TextHint};
use folio_import::{MigrationPlan, PlannedWrite, SourceGroups};
use folio_store::{DocumentId, DocumentStore};
use serde_json::Value;
use std::fmt::Write as _;
use std::path::Path;

/// Options of `folio migrate`
#[derive(Debug, Clone, Default)]
pub(crate) struct MigrateOptions {
    pub(crate) dry_run: bool,
    pub(crate) clear: bool,
}

pub(crate) async fn migrate<S>(
    store: &S,
    seed: &Path,
    config: &CliConfig,
    options: &MigrateOptions,
) -> anyhow::Result<String>
where
    S: DocumentStore + ?Sized,
{
    let source = SourceGroups::load(seed)
        .await
        .with_context(|| format!("loading seed {}", seed.display()))?;
    let plan = MigrationPlan::build(&source, &config.migration);

    if options.dry_run {
        return Ok(describe_plan(&plan));
    }

    if options.clear {
        let mut cleared: Vec<&str> = Vec::new();
        for planned in plan.steps() {
            // singletons are overwritten by id
            let PlannedWrite::Collection { collection, .. } = &planned.write else {
                continue;
            };
            let collection = collection.as_str();
            if cleared.contains(&collection) {
                continue;
            }
            let removed = store
                .clear_collection(collection)
                .await
                .with_context(|| format!("clearing '{collection}'"))?;
            tracing::info!("Cleared {} document(s) from '{}'", removed, collection);
            cleared.push(collection);
        }
    }

    let report = plan
        .execute(store)
        .await
        .context("migration aborted; earlier steps stay written, rerun with --clear")?;

    let mut out = String::new();
    for step in &report.steps {
        let _ = writeln!(out, "{:<14} {:<14} {:>4}", step.step, step.collection, step.written);
    }
    let _ = write!(
        out,
        "{} documents written, {} duplicate experience(s) collapsed",
        report.total_written(),
        report.experiences_collapsed
    );
    Ok(out)
}

fn describe_plan(plan: &MigrationPlan) -> String {
    let mut out = String::from("dry run, nothing written\n");
    for planned in plan.steps() {
        let target = match &planned.write {
            PlannedWrite::Collection { collection, .. } => collection.clone(),
            PlannedWrite::Document { collection, id, .. } => format!("{collection}/{id}"),
        };
        let _ = writeln!(
            out,
            "{:<14} {:<24} {:>4}",
            planned.step,
            target,
            planned.write.record_count()
        );
    }
    let _ = write!(
        out,
        "{} documents planned, {} duplicate experience(s) collapsed",
        plan.record_count(),
        plan.experiences_collapsed()
    );
    out
}

/// Edits applied by `folio content`
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ContentEdit {
    Set(EditPath, Value),
    Append(EditPath),
    Remove(EditPath, usize),
}

pub(crate) async fn content_fields<S>(
    store: &S,
    collection: &str,
    id: &str,
    config: &CliConfig,
) -> anyhow::Result<String>
where
    S: DocumentStore + ?Sized,
{
    let session = load_session(store, collection, id).await?;
    let mut out = String::new();
    for entry in session.form(config.content.long_text_threshold) {
        match entry {
            FormEntry::Section { path, label, depth } => {
                let _ = writeln!(out, "{}{label}  ({path})", indent(depth));
            }
            FormEntry::List {
                path,
                label,
                depth,
                len,
            } => {
                let _ = writeln!(out, "{}{label}  ({path}, {len} items)", indent(depth));
            }
            FormEntry::Field(field) => {
                let widget = match field.hint {
                    Some(TextHint::Long) => "textarea",
                    Some(TextHint::Short) => "input",
                    None => field.kind.as_str(),
                };
                let _ = writeln!(
                    out,
                    "{}{}  ({}, {widget}) = {}",
                    indent(field.depth),
                    field.label,
                    field.path,
                    field.value
                );
            }
        }
    }
    Ok(out.trim_end().to_string())
}

pub(crate) async fn content_get<S>(
    store: &S,
    collection: &str,
    id: &str,
    path: &EditPath,
) -> anyhow::Result<String>
where
    S: DocumentStore + ?Sized,
{
    let session = load_session(store, collection, id).await?;
    let Some(value) = session.get(path) else {
        bail!("path not found: '{path}'");
    };
    Ok(serde_json::to_string_pretty(value)?)
}

pub(crate) async fn content_edit<S>(
    store: &S,
    collection: &str,
    id: &str,
    edit: ContentEdit,
) -> anyhow::Result<String>
where
    S: DocumentStore + ?Sized,
{
    let mut session = load_session(store, collection, id).await?;
    match edit {
        ContentEdit::Set(path, value) => session.set(&path, value),
        ContentEdit::Append(path) => session.append(&path),
        ContentEdit::Remove(path, index) => session.remove(&path, index),
    }?;
    let SaveOutcome {
        written,
        hash,
        invalidated,
    } = session.save(store, None).await?;

    if !written {
        return Ok(format!("{collection}/{id} unchanged"));
    }
    let mut out = format!("saved {collection}/{id} ({})", hash.short());
    if !invalidated.is_empty() {
        let _ = write!(out, ", invalidated {}", invalidated.join(" "));
    }
    Ok(out)
}

/// Parse an edit value: JSON when it parses, otherwise a plain string
pub(crate) fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

async fn load_session<S>(store: &S, collection: &str, id: &str) -> anyhow::Result<EditSession>
where
    S: DocumentStore + ?Sized,
{
    EditSession::load(store, collection, DocumentId::new(id))
        .await
        .with_context(|| format!("opening {collection}/{id}"))
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}

pub(crate) async fn analytics_record<S>(
    store: &S,
    kind: EventKind,
    path: Option<String>,
    referrer: Option<String>,
) -> anyhow::Result<String>
where
    S: DocumentStore + ?Sized,
{
    let mut event = match kind {
        EventKind::PageView => {
            AnalyticsEvent::page_view(path.context("page_view events need --path")?)
        }
        EventKind::CvDownload => AnalyticsEvent::cv_download(),
    };
    if let Some(referrer) = referrer {
        event = event.with_referrer(referrer);
    }
    let id = AnalyticsRecorder::new(store).record(&event).await?;
    Ok(format!("recorded {} ({id})", kind.as_str()))
}

pub(crate) async fn analytics_summary<S>(store: &S, json: bool) -> anyhow::Result<String>
where
    S: DocumentStore + ?Sized,
{
    let summary = AnalyticsRecorder::new(store).summary().await?;
    if json {
        return Ok(serde_json::to_string_pretty(&summary)?);
    }
    Ok(render_summary(&summary))
}

fn render_summary(summary: &DashboardSummary) -> String {
    let mut out = format!(
        "page views: {}\ncv downloads: {}\n",
        summary.total_page_views, summary.cv_downloads
    );
    if !summary.views_by_page.is_empty() {
        out.push_str("top pages:\n");
        for (page, views) in summary.views_by_page.iter().take(10) {
            let _ = writeln!(out, "  {views:>6}  {page}");
        }
    }
    if !summary.by_day.is_empty() {
        out.push_str("by day:\n");
        for (day, counts) in &summary.by_day {
            let _ = writeln!(
                out,
                "  {day}  {:>6} views  {:>4} downloads",
                counts.page_views, counts.cv_downloads
            );
        }
    }
    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_store::{FileStore, Record};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const SEED: &str = r"
contact_info:
  - email: ada@example.com
experiences:
  - category: Work
    records:
      - {title: Dev, company: Acme}
  - category: Film
    records:
      - {title: Editor, company: Studio}
  - category: Work
    records:
      - {title: dev, company: ACME}
home:
  hero:
    title: Hello
  highlights:
    - {label: Projects, count: 3}
";

    async fn setup() -> (tempfile::TempDir, FileStore, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let seed = dir.path().join("seed.yaml");
        std::fs::write(&seed, SEED).unwrap();
        let store = FileStore::open(dir.path().join("store")).await.unwrap();
        (dir, store, seed)
    }

    fn p(s: &str) -> EditPath {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn dry_run_writes_nothing() {
        let (_dir, store, seed) = setup().await;
        let options = MigrateOptions {
            dry_run: true,
            ..MigrateOptions::default()
        };
        let out = migrate(&store, &seed, &CliConfig::default(), &options)
            .await
            .unwrap();

        assert!(out.starts_with("dry run"));
        assert!(out.contains("1 duplicate experience(s) collapsed"));
        assert!(store.list_documents("experiences").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn migrate_twice_with_clear_does_not_duplicate() {
        let (_dir, store, seed) = setup().await;
        let config = CliConfig::default();
        migrate(&store, &seed, &config, &MigrateOptions::default())
            .await
            .unwrap();
        let options = MigrateOptions {
            clear: true,
            ..MigrateOptions::default()
        };
        migrate(&store, &seed, &config, &options).await.unwrap();

        let experiences = store.list_documents("experiences").await.unwrap();
        assert_eq!(experiences.len(), 2);
        assert_eq!(experiences[0].record.get_str("title"), Some("dev"));
    }

    #[tokio::test]
    async fn clear_keeps_other_site_content_documents() {
        let (_dir, store, seed) = setup().await;
        let about = DocumentId::new("about");
        store
            .set_document("site_content", &about, Record::new().with("headline", "Hi"))
            .await
            .unwrap();
        let options = MigrateOptions {
            clear: true,
            ..MigrateOptions::default()
        };
        migrate(&store, &seed, &CliConfig::default(), &options)
            .await
            .unwrap();

        let kept = store.get_document("site_content", &about).await.unwrap();
        assert_eq!(kept.unwrap().get_str("headline"), Some("Hi"));
        let home = store
            .get_document("site_content", &DocumentId::new("home"))
            .await
            .unwrap();
        assert!(home.is_some());
    }

    #[tokio::test]
    async fn edit_home_content() {
        let (_dir, store, seed) = setup().await;
        migrate(&store, &seed, &CliConfig::default(), &MigrateOptions::default())
            .await
            .unwrap();

        let out = content_edit(&store, "site_content", "home", ContentEdit::Append(p("highlights")))
            .await
            .unwrap();
        assert!(out.starts_with("saved site_content/home"));

        let edit = ContentEdit::Set(p("highlights[1].label"), parse_value("Talks"));
        content_edit(&store, "site_content", "home", edit).await.unwrap();

        let item = content_get(&store, "site_content", "home", &p("highlights[1]"))
            .await
            .unwrap();
        let item: Value = serde_json::from_str(&item).unwrap();
        assert_eq!(item, json!({"label": "Talks", "count": 0}));

        let fields = content_fields(&store, "site_content", "home", &CliConfig::default())
            .await
            .unwrap();
        assert!(fields.contains("(highlights, 2 items)"));
        assert!(fields.contains("(hero.title, input) = \"Hello\""));
    }

    #[tokio::test]
    async fn invalid_edit_is_reported() {
        let (_dir, store, seed) = setup().await;
        migrate(&store, &seed, &CliConfig::default(), &MigrateOptions::default())
            .await
            .unwrap();
        let result = content_edit(
            &store,
            "site_content",
            "home",
            ContentEdit::Remove(p("highlights"), 5),
        )
        .await;
        assert!(result.is_err());
        assert!(content_get(&store, "site_content", "home", &p("nope"))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn analytics_round_trip() {
        let (_dir, store, _seed) = setup().await;
        analytics_record(&store, EventKind::PageView, Some("/".into()), None)
            .await
            .unwrap();
        analytics_record(&store, EventKind::CvDownload, None, Some("linkedin".into()))
            .await
            .unwrap();
        assert!(analytics_record(&store, EventKind::PageView, None, None)
            .await
            .is_err());

        let text = analytics_summary(&store, false).await.unwrap();
        assert!(text.starts_with("page views: 1\ncv downloads: 1"));

        let json: Value = serde_json::from_str(&analytics_summary(&store, true).await.unwrap()).unwrap();
        assert_eq!(json["views_by_page"]["/"], json!(1));
    }

    #[test]
    fn values_fall_back_to_strings() {
        assert_eq!(parse_value("42"), json!(42));
        assert_eq!(parse_value("[1, 2]"), json!([1, 2]));
        assert_eq!(parse_value("hello world"), json!("hello world"));
    }
}
