use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pressroom", about = "Pressroom content store tools", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// SQLite file holding the store
    #[arg(long, global = true, default_value = "pressroom.sqlite3")]
    pub db: PathBuf,

    /// Absolute directory for rolling log files; logging is off when omitted
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    /// Storage key namespace
    #[arg(long, global = true, default_value = pressroom_core::config::DEFAULT_NAMESPACE)]
    pub namespace: String,
}

#[derive(Subcommand)]
pub enum Command {
    /// Write a full snapshot as JSON
    Export(ExportArgs),
    /// Replace the store with a snapshot file
    Import(ImportArgs),
    /// Reapply the last backup snapshot to every sub-store
    Restore,
    /// Print the derived homepage views
    Show,
    /// Print crate version
    Version,
}

#[derive(Args)]
pub struct ExportArgs {
    /// Output file; stdout when omitted
    #[arg(long, short)]
    pub out: Option<PathBuf>,
}

#[derive(Args)]
pub struct ImportArgs {
    /// Snapshot JSON file
    pub file: PathBuf,
}
