//! # List Command Implementation
//!
//! Prints the effective registered repositories, one per line, or as a JSON
//! array with `--json`. An empty registry lists the primary repository.

use anyhow::Result;
use clap::Args;

use app_repos::config::Settings;
use app_repos::registry::RegistryStore;

/// List registered repositories
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Print a JSON array instead of one URL per line
    #[arg(long)]
    pub json: bool,
}

/// Execute the `list` command.
pub fn execute(args: ListArgs, settings: &Settings) -> Result<()> {
    let repos = RegistryStore::new(settings).list();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&repos)?);
    } else {
        for url in repos {
            println!("{}", url);
        }
    }
    Ok(())
}
