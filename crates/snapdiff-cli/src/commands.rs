use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use colored::Colorize;
use snapdiff_diff::{DiffAction, DiffEntry, DiffOptions, DiffResult, ExclusionSet};
use snapdiff_monitor::{ChangeMonitor, MonitorConfig, MonitorResult, Observation};
use snapdiff_notify::HttpNotificationSink;
use snapdiff_store::{FileSnapshotStore, SnapshotStore};
use snapdiff_types::{Document, Snapshot};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let format = cli.format;
    match cli.command {
        Command::Diff(args) => cmd_diff(args, format),
        Command::Observe(args) => cmd_observe(args, format),
        Command::Show(args) => cmd_show(args, format),
        Command::List(args) => cmd_list(args, format),
        Command::Forget(args) => cmd_forget(args),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<MonitorConfig> {
    match path {
        Some(path) => MonitorConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(MonitorConfig::default()),
    }
}

fn read_document(path: &Path) -> anyhow::Result<Document> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Document::parse(&text).with_context(|| format!("{} is not a valid document", path.display()))
}

fn open_store(
    store: Option<PathBuf>,
    config: &MonitorConfig,
) -> anyhow::Result<FileSnapshotStore> {
    let Some(root) = store.or_else(|| config.store_dir.clone()) else {
        bail!("no snapshot store configured; pass --store or set store_dir");
    };
    FileSnapshotStore::open(&root)
        .with_context(|| format!("failed to open snapshot store {}", root.display()))
}

fn cmd_diff(args: DiffArgs, format: OutputFormat) -> anyhow::Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if args.no_exclude {
        config.excluded = ExclusionSet::default();
    } else if !args.exclude.is_empty() {
        config.excluded = args.exclude.iter().cloned().collect();
    }
    let mut options = DiffOptions {
        max_depth: config.max_depth,
    };
    if let Some(max_depth) = args.max_depth {
        options.max_depth = max_depth;
    }
    let engine = config.diff_engine().with_options(options);

    let previous = read_document(&args.previous)?;
    let current = read_document(&args.current)?;

    if args.entries {
        let entries = engine.compute(&previous, &current)?;
        match format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
            OutputFormat::Text => print!("{}", render_entries(&entries)),
        }
        return Ok(());
    }

    let result = engine.diff(&previous, &current)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Text => print!("{}", render_result(&result)),
    }
    Ok(())
}

fn cmd_observe(args: ObserveArgs, format: OutputFormat) -> anyhow::Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if !args.targets.is_empty() {
        config.targets = args.targets;
    }
    let store = open_store(args.store, &config)?;
    let sink = HttpNotificationSink::new(config.request_timeout())?;
    let monitor = ChangeMonitor::new(Arc::new(store), Arc::new(sink), &config)?;

    let snapshots = args
        .snapshots
        .iter()
        .map(|path| {
            let document = read_document(path)?;
            Snapshot::from_document(document)
                .with_context(|| format!("{} is not a snapshot", path.display()))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let runtime = tokio::runtime::Runtime::new()?;
    let results = runtime.block_on(monitor.observe_batch(&snapshots));

    let failed = results.iter().filter(|(_, r)| r.is_err()).count();
    match format {
        OutputFormat::Json => {
            let report: Vec<serde_json::Value> = results
                .iter()
                .map(|(id, r)| observation_json(id, r))
                .collect();
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            for (id, outcome) in &results {
                println!("{}", render_observation(id, outcome));
            }
        }
    }

    if failed > 0 {
        bail!("{failed} of {} observations failed", results.len());
    }
    Ok(())
}

fn cmd_show(args: ShowArgs, format: OutputFormat) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let store = open_store(args.store, &config)?;
    let Some(snapshot) = store.fetch_previous(&args.id)? else {
        bail!("no snapshot stored for {}", args.id);
    };
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&snapshot)?),
        OutputFormat::Text => {
            println!("{} {}", "Snapshot".bold(), snapshot.id.yellow());
            println!("  Last edited: {}", snapshot.last_edited_time.cyan());
            println!("{}", pretty(&snapshot.document));
        }
    }
    Ok(())
}

fn cmd_list(args: ListArgs, format: OutputFormat) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let store = open_store(args.store, &config)?;
    let ids = store.ids()?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&ids)?),
        OutputFormat::Text if ids.is_empty() => println!("No snapshots stored."),
        OutputFormat::Text => {
            for id in ids {
                println!("{id}");
            }
        }
    }
    Ok(())
}

fn cmd_forget(args: ForgetArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let store = open_store(args.store, &config)?;
    if store.delete(&args.id)? {
        println!("{} Forgot {}", "✓".green().bold(), args.id.yellow());
    } else {
        println!("No snapshot stored for {}", args.id.yellow());
    }
    Ok(())
}

fn pretty(document: &Document) -> String {
    serde_json::to_string_pretty(&document.to_json()).unwrap_or_else(|_| document.to_string())
}

fn indent(text: &str) -> String {
    text.lines()
        .map(|line| format!("    {line}\n"))
        .collect()
}

pub(crate) fn render_result(result: &DiffResult) -> String {
    if result.is_empty() {
        return "No changes.\n".to_string();
    }
    let mut out = String::new();
    if !result.added.is_empty_map() {
        out.push_str(&format!("{}\n", "added:".green().bold()));
        out.push_str(&indent(&pretty(&result.added)));
    }
    if !result.changed.is_empty() {
        out.push_str(&format!("{}\n", "changed:".yellow().bold()));
        out.push_str(&format!("  {}\n", "old:".dimmed()));
        out.push_str(&indent(&pretty(&result.changed.old)));
        out.push_str(&format!("  {}\n", "new:".dimmed()));
        out.push_str(&indent(&pretty(&result.changed.new)));
    }
    if !result.deleted.is_empty_map() {
        out.push_str(&format!("{}\n", "deleted:".red().bold()));
        out.push_str(&indent(&pretty(&result.deleted)));
    }
    out
}

pub(crate) fn render_entries(entries: &[DiffEntry]) -> String {
    if entries.is_empty() {
        return "No changes.\n".to_string();
    }
    entries
        .iter()
        .map(|entry| {
            let path = entry.path.to_string();
            match entry.action {
                DiffAction::ItemAdded | DiffAction::IterableItemAdded => {
                    format!("{} {} {}\n", "+".green(), path.bold(), entry.value)
                }
                DiffAction::ItemRemoved | DiffAction::IterableItemRemoved => {
                    format!("{} {} {}\n", "-".red(), path.bold(), entry.value)
                }
                DiffAction::ValueChanged => {
                    let old = entry
                        .old_value
                        .as_ref()
                        .map(ToString::to_string)
                        .unwrap_or_default();
                    format!("{} {} {} → {}\n", "~".yellow(), path.bold(), old, entry.value)
                }
            }
        })
        .collect()
}

pub(crate) fn render_observation(id: &str, outcome: &MonitorResult<Observation>) -> String {
    match outcome {
        Ok(Observation::NewDocument) => format!("{} {} stored (new)", "✓".green(), id.yellow()),
        Ok(Observation::Unchanged) => format!("{} {} unchanged", "✓".green(), id.yellow()),
        Ok(Observation::Notified { delivered, .. }) => format!(
            "{} {} changed, notified {} target(s)",
            "✓".green().bold(),
            id.yellow(),
            delivered
        ),
        Err(e) => format!("{} {} {}", "✗".red().bold(), id.yellow(), e),
    }
}

fn observation_json(id: &str, outcome: &MonitorResult<Observation>) -> serde_json::Value {
    match outcome {
        Ok(Observation::NewDocument) => serde_json::json!({"id": id, "outcome": "new_document"}),
        Ok(Observation::Unchanged) => serde_json::json!({"id": id, "outcome": "unchanged"}),
        Ok(Observation::Notified {
            notification,
            delivered,
        }) => serde_json::json!({
            "id": id,
            "outcome": "notified",
            "delivered": delivered,
            "notification": notification,
        }),
        Err(e) => serde_json::json!({"id": id, "outcome": "failed", "error": e.to_string()}),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use snapdiff_diff::DiffEngine;
    use snapdiff_monitor::MonitorError;

    fn doc(value: serde_json::Value) -> Document {
        Document::from_json(&value).unwrap()
    }

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn renders_empty_result() {
        plain();
        assert_eq!(render_result(&DiffResult::default()), "No changes.\n");
        assert_eq!(render_entries(&[]), "No changes.\n");
    }

    #[test]
    fn renders_sections() {
        plain();
        let engine = DiffEngine::new(ExclusionSet::reference());
        let result = engine
            .diff(
                &doc(json!({"a": 1, "b": {"c": "x"}, "gone": true})),
                &doc(json!({"a": 2, "b": {"c": "x", "d": null}})),
            )
            .unwrap();
        let text = render_result(&result);

        assert!(text.contains("added:"));
        assert!(text.contains("changed:"));
        assert!(text.contains("deleted:"));
        assert!(text.contains("\"d\": null"));
        assert!(text.contains("\"gone\": true"));
    }

    #[test]
    fn renders_entries() {
        plain();
        let engine = DiffEngine::default();
        let entries = engine
            .compute(&doc(json!({"a": 1, "l": []})), &doc(json!({"a": 2, "l": [true]})))
            .unwrap();
        let text = render_entries(&entries);
        assert!(text.contains("~ a 1 → 2"));
        assert!(text.contains("+ l[0] true"));
    }

    #[test]
    fn renders_observations() {
        plain();
        assert_eq!(
            render_observation("p1", &Ok(Observation::Unchanged)),
            "✓ p1 unchanged"
        );
        let err: MonitorResult<Observation> = Err(MonitorError::Config("bad".into()));
        assert!(render_observation("p1", &err).contains("configuration error: bad"));
        assert_eq!(observation_json("p1", &err)["outcome"], "failed");
    }

    #[test]
    fn store_is_required() {
        let err = open_store(None, &MonitorConfig::default()).unwrap_err();
        assert!(err.to_string().contains("--store"));

        let dir = tempfile::tempdir().unwrap();
        let config = MonitorConfig {
            store_dir: Some(dir.path().to_path_buf()),
            ..MonitorConfig::default()
        };
        assert!(open_store(None, &config).is_ok());
    }

    #[test]
    fn reads_documents_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.json");
        let bad = dir.path().join("bad.json");
        fs::write(&good, r#"{"id": "p1", "n": 1.5}"#).unwrap();
        fs::write(&bad, "{not json").unwrap();

        assert_eq!(read_document(&good).unwrap(), doc(json!({"id": "p1", "n": 1.5})));
        assert!(read_document(&bad).is_err());
        assert!(read_document(&dir.path().join("missing.json")).is_err());
    }
}
