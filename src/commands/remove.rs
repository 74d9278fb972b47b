//! # Remove Command Implementation
//!
//! Unregisters a repository URL and deletes its local clone. Removing a URL
//! that is not registered is reported and treated as success.

use anyhow::Result;
use clap::Args;

use app_repos::config::Settings;
use app_repos::registry::RegistryStore;

use super::{required, soft_ok};

/// Unregister a repository and delete its clone
#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Registered repository URL
    #[arg(value_name = "URL")]
    pub url: Option<String>,
}

/// Execute the `remove` command.
pub fn execute(args: RemoveArgs, settings: &Settings) -> Result<()> {
    let url = required(args.url, "URL")?;
    let registry = RegistryStore::new(settings);

    let removed = registry.remove(&url);
    if removed.is_ok() {
        println!("🗑️  Removed {}", url);
    }
    soft_ok(removed)
}
