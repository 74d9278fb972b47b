//! # Id Command Implementation
//!
//! Prints the app store id declared by a repository's clone, or nothing when
//! the clone is missing or has no valid manifest.

use anyhow::Result;
use clap::Args;

use app_repos::config::Settings;
use app_repos::identity::IdentityIndex;
use app_repos::registry::RegistryStore;

use super::required;

/// Print the app store id declared by a repository's clone
#[derive(Args, Debug)]
pub struct IdArgs {
    /// Repository URL
    #[arg(value_name = "URL")]
    pub url: Option<String>,
}

/// Execute the `id` command.
pub fn execute(args: IdArgs, settings: &Settings) -> Result<()> {
    let url = required(args.url, "URL")?;
    let registry = RegistryStore::new(settings);
    if let Some(id) = IdentityIndex::new(&registry).identity_of(&url) {
        println!("{}", id);
    }
    Ok(())
}
