//! # Path Command Implementation
//!
//! Prints the local clone directory a URL maps to. The URL does not need to be
//! registered or cloned.

use anyhow::Result;
use clap::Args;

use app_repos::config::Settings;

/// Print the local clone path for a repository URL
#[derive(Args, Debug)]
pub struct PathArgs {
    /// Repository URL
    #[arg(value_name = "URL")]
    pub url: Option<String>,
}

/// Execute the `path` command.
pub fn execute(args: PathArgs, settings: &Settings) -> Result<()> {
    let url = args.url.unwrap_or_default();
    println!("{}", settings.paths().path_for(&url).display());
    Ok(())
}
