//! `folio`: content editing, seed migration and analytics against a
//! file-backed document store.

mod commands;
mod config;

use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use commands::{ContentEdit, MigrateOptions};
use config::CliConfig;
use folio_analytics::EventKind;
use folio_content::EditPath;
use folio_store::FileStore;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    let document_args = [
        Arg::new("collection")
            .long("collection")
            .help("Collection holding the document [default: content.collection from the config]"),
        Arg::new("id")
            .long("id")
            .default_value("home")
            .help("Document id"),
    ];
    let path_arg = Arg::new("path")
        .required(true)
        .value_parser(value_parser!(EditPath))
        .help("Node path, e.g. experience[2].title (empty string for the root)");

    Command::new("folio")
        .version(folio_content::VERSION)
        .about("Structured content editing, seed migration and analytics for a portfolio site")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("store-dir")
                .long("store-dir")
                .global(true)
                .default_value(".folio")
                .value_parser(value_parser!(PathBuf))
                .help("Directory of the document store"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("folio.toml with [content] and [migration] tables"),
        )
        .arg(
            Arg::new("json-logs")
                .long("json-logs")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::Count)
                .help("More logging (-v debug, -vv trace); RUST_LOG overrides"),
        )
        .subcommand(
            Command::new("migrate")
                .about("Import seed content into the store")
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Seed file (.yaml, .yml or .json)"),
                )
                .arg(
                    Arg::new("dry-run")
                        .long("dry-run")
                        .action(ArgAction::SetTrue)
                        .help("Print the planned writes without writing"),
                )
                .arg(
                    Arg::new("clear")
                        .long("clear")
                        .action(ArgAction::SetTrue)
                        .help("Empty the target collections first (use when retrying)"),
                ),
        )
        .subcommand(
            Command::new("content")
                .about("Inspect and edit a stored document")
                .subcommand_required(true)
                .subcommand(
                    Command::new("fields")
                        .about("List the editable form")
                        .args(document_args.clone()),
                )
                .subcommand(
                    Command::new("get")
                        .about("Print the value at a path")
                        .args(document_args.clone())
                        .arg(path_arg.clone()),
                )
                .subcommand(
                    Command::new("set")
                        .about("Replace the value at a path")
                        .args(document_args.clone())
                        .arg(path_arg.clone())
                        .arg(
                            Arg::new("value")
                                .required(true)
                                .help("JSON value; anything else is stored as a string"),
                        ),
                )
                .subcommand(
                    Command::new("append")
                        .about("Append an empty item shaped like the first one")
                        .args(document_args.clone())
                        .arg(path_arg.clone()),
                )
                .subcommand(
                    Command::new("remove")
                        .about("Remove an array item")
                        .args(document_args)
                        .arg(path_arg)
                        .arg(
                            Arg::new("index")
                                .required(true)
                                .value_parser(value_parser!(usize)),
                        ),
                ),
        )
        .subcommand(
            Command::new("analytics")
                .about("Record or summarize visitor events")
                .subcommand_required(true)
                .subcommand(
                    Command::new("record")
                        .about("Record one event")
                        .arg(
                            Arg::new("kind")
                                .required(true)
                                .value_parser(["page_view", "cv_download"]),
                        )
                        .arg(Arg::new("path").long("path").help("Visited page"))
                        .arg(Arg::new("referrer").long("referrer")),
                )
                .subcommand(
                    Command::new("summary")
                        .about("Dashboard figures")
                        .arg(
                            Arg::new("json")
                                .long("json")
                                .action(ArgAction::SetTrue)
                                .help("Output as JSON"),
                        ),
                ),
        )
}

fn init_tracing(json: bool, verbosity: u8) {
    let default_level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn required<'a, T>(args: &'a ArgMatches, name: &str) -> anyhow::Result<&'a T>
where
    T: Clone + Send + Sync + 'static,
{
    args.get_one::<T>(name)
        .with_context(|| format!("missing argument '{name}'"))
}

/// `--collection` falls back to the configured site-content collection
fn document<'a>(args: &'a ArgMatches, config: &'a CliConfig) -> anyhow::Result<(&'a str, &'a str)> {
    let collection = args
        .get_one::<String>("collection")
        .unwrap_or(&config.content.collection);
    Ok((collection.as_str(), required::<String>(args, "id")?.as_str()))
}

async fn run(matches: &ArgMatches) -> anyhow::Result<String> {
    let store_dir = required::<PathBuf>(matches, "store-dir")?;
    let config = CliConfig::load(matches.get_one::<PathBuf>("config").map(PathBuf::as_path)).await?;
    let store = FileStore::open(store_dir)
        .await
        .with_context(|| format!("opening store at {}", store_dir.display()))?;

    match matches.subcommand() {
        Some(("migrate", args)) => {
            let options = MigrateOptions {
                dry_run: args.get_flag("dry-run"),
                clear: args.get_flag("clear"),
            };
            let seed = required::<PathBuf>(args, "seed")?;
            commands::migrate(&store, seed, &config, &options).await
        }
        Some(("content", content)) => {
            let Some((name, args)) = content.subcommand() else {
                anyhow::bail!("missing content subcommand");
            };
            let (collection, id) = document(args, &config)?;
            let edit = match name {
                "fields" => {
                    return commands::content_fields(&store, collection, id, &config).await;
                }
                "get" => {
                    let path = required::<EditPath>(args, "path")?;
                    return commands::content_get(&store, collection, id, path).await;
                }
                "set" => ContentEdit::Set(
                    required::<EditPath>(args, "path")?.clone(),
                    commands::parse_value(required::<String>(args, "value")?),
                ),
                "append" => ContentEdit::Append(required::<EditPath>(args, "path")?.clone()),
                "remove" => ContentEdit::Remove(
                    required::<EditPath>(args, "path")?.clone(),
                    *required::<usize>(args, "index")?,
                ),
                other => anyhow::bail!("unknown content subcommand '{other}'"),
            };
            commands::content_edit(&store, collection, id, edit).await
        }
        Some(("analytics", analytics)) => match analytics.subcommand() {
            Some(("record", args)) => {
                let kind: EventKind = required::<String>(args, "kind")?.parse()?;
                commands::analytics_record(
                    &store,
                    kind,
                    args.get_one::<String>("path").cloned(),
                    args.get_one::<String>("referrer").cloned(),
                )
                .await
            }
            Some(("summary", args)) => {
                commands::analytics_summary(&store, args.get_flag("json")).await
            }
            _ => anyhow::bail!("missing analytics subcommand"),
        },
        _ => anyhow::bail!("missing subcommand"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("json-logs"), matches.get_count("verbose"));

    let output = run(&matches).await?;
    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}
