//! # Branch Command Implementation
//!
//! Switches the clone of a repository to another branch of its origin and then
//! synchronizes it. The clone must already exist; run `update` first.

use anyhow::Result;
use clap::Args;

use app_repos::branch::BranchSwitcher;
use app_repos::config::Settings;

use super::update::print_report;
use super::{open, required};

/// Switch a clone to another branch, then update it
#[derive(Args, Debug)]
pub struct BranchArgs {
    /// Registered repository URL
    #[arg(value_name = "URL")]
    pub url: Option<String>,

    /// Branch (or any ref) to check out
    #[arg(value_name = "BRANCH")]
    pub branch: Option<String>,
}

/// Execute the `branch` command.
pub fn execute(args: BranchArgs, settings: &Settings) -> Result<()> {
    let url = required(args.url, "URL")?;
    let branch = required(args.branch, "BRANCH")?;
    let (registry, git) = open(settings);

    let report = BranchSwitcher::new(&registry, &git, settings.owner)
        .switch_branch(&url, &branch)?;
    print_report(&report);
    Ok(())
}
