//! # Locate Command Implementation
//!
//! Prints the clone of the first registered repository that provides an app
//! directory. Nothing is printed when no clone has it.

use anyhow::Result;
use clap::Args;

use app_repos::config::Settings;
use app_repos::identity::IdentityIndex;
use app_repos::registry::RegistryStore;

/// Print the clone that provides an app
#[derive(Args, Debug)]
pub struct LocateArgs {
    /// App directory name (e.g., bitcoin)
    #[arg(value_name = "APP")]
    pub app: Option<String>,
}

/// Execute the `locate` command.
pub fn execute(args: LocateArgs, settings: &Settings) -> Result<()> {
    let registry = RegistryStore::new(settings);
    let app = args.app.unwrap_or_default();
    if let Some(clone_dir) = IdentityIndex::new(&registry).locate_app(&app) {
        println!("{}", clone_dir.display());
    }
    Ok(())
}
