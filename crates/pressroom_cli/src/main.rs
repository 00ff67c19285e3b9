//! Command-line entry point for inspecting and migrating a SQLite-backed
//! content store.

use clap::Parser;

mod cli;
mod commands;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    commands::run(cli)
}
