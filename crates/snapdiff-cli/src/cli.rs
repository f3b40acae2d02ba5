use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "snapdiff",
    about = "Structural change detection for JSON document snapshots",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// trace, debug, info, warn or error
    #[arg(long, global = true, env = "SNAPDIFF_LOG", default_value = "info")]
    pub log_level: tracing::Level,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compare two JSON documents
    Diff(DiffArgs),
    /// Store snapshots and notify targets about changes
    Observe(ObserveArgs),
    /// Show the stored snapshot of a document
    Show(ShowArgs),
    /// List the ids in a snapshot store
    List(ListArgs),
    /// Remove a stored snapshot
    Forget(ForgetArgs),
}

#[derive(Args)]
pub struct DiffArgs {
    pub previous: PathBuf,
    pub current: PathBuf,
    /// Field name to ignore at any depth; replaces the configured set
    #[arg(long = "exclude", value_name = "KEY")]
    pub exclude: Vec<String>,
    /// Compare every field
    #[arg(long, conflicts_with = "exclude")]
    pub no_exclude: bool,
    #[arg(long)]
    pub max_depth: Option<usize>,
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Print the flat entry list instead of the assembled fragments
    #[arg(long)]
    pub entries: bool,
}

#[derive(Args)]
pub struct ObserveArgs {
    /// Snapshot files; each holds one document with top-level `id` and `last_edited_time`
    #[arg(required = true)]
    pub snapshots: Vec<PathBuf>,
    #[arg(long)]
    pub store: Option<PathBuf>,
    /// Subscriber URL; replaces the configured targets
    #[arg(long = "target", value_name = "URL")]
    pub targets: Vec<String>,
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct ShowArgs {
    pub id: String,
    #[arg(long)]
    pub store: Option<PathBuf>,
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct ListArgs {
    #[arg(long)]
    pub store: Option<PathBuf>,
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct ForgetArgs {
    pub id: String,
    #[arg(long)]
    pub store: Option<PathBuf>,
    #[arg(long)]
    pub config: Option<PathBuf>,
}
