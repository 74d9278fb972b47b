//! # App Repos CLI
//!
//! This is the binary entry point for the `app-repos` command-line tool.
//!
//! It parses arguments with `clap`, dispatches to the subcommand, and turns
//! hard errors into a non-zero exit. All registry and sync behavior lives in
//! the `app_repos` library crate.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
