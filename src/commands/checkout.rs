//! # Checkout Command Implementation
//!
//! Tries an alternate app store in place: the descriptor's repository is added
//! as a remote of the primary repository's clone and its branch is checked
//! out there. The source is not registered.

use anyhow::Result;
use clap::Args;

use app_repos::branch::BranchSwitcher;
use app_repos::config::Settings;
use app_repos::descriptor::RepoDescriptor;

use super::{open, required};

/// Check out an alternate app store inside the primary clone
#[derive(Args, Debug)]
pub struct CheckoutArgs {
    /// Source repository (e.g., org/repo#branch)
    #[arg(value_name = "DESCRIPTOR")]
    pub descriptor: Option<String>,
}

/// Execute the `checkout` command.
pub fn execute(args: CheckoutArgs, settings: &Settings) -> Result<()> {
    let descriptor = RepoDescriptor::parse(&required(args.descriptor, "DESCRIPTOR")?);
    let (registry, git) = open(settings);

    BranchSwitcher::new(&registry, &git, settings.owner).checkout(&descriptor)?;
    println!("✅ Checked out {}", descriptor);
    Ok(())
}
