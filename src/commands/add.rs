//! # Add Command Implementation
//!
//! Registers an app store repository. The argument is a descriptor: a full
//! URL, or `owner/name` shorthand for a GitHub repository, optionally followed
//! by `#branch`. Registering an already registered URL is reported and treated
//! as success. The clone is made by the next `update`.

use anyhow::Result;
use clap::Args;

use app_repos::config::Settings;
use app_repos::descriptor::RepoDescriptor;
use app_repos::registry::RegistryStore;

use super::{required, soft_ok};

/// Register an app store repository
#[derive(Args, Debug)]
pub struct AddArgs {
    /// Repository to add (e.g., https://github.com/org/repo.git or org/repo#branch)
    #[arg(value_name = "DESCRIPTOR")]
    pub descriptor: Option<String>,
}

/// Execute the `add` command.
pub fn execute(args: AddArgs, settings: &Settings) -> Result<()> {
    let descriptor = RepoDescriptor::parse(&required(args.descriptor, "DESCRIPTOR")?);
    let registry = RegistryStore::new(settings);

    let added = registry.add(&descriptor.url);
    if added.is_ok() {
        println!("✅ Added {}", descriptor.url);
    }
    soft_ok(added)
}
