//! # Update Command Implementation
//!
//! Synchronizes every registered repository, or only the given URL: clones
//! what is missing, pulls what is healthy, repairs corrupt clones and drops
//! repositories that violate the identity rules.
//!
//! Failures of individual repositories are logged and summarized but never
//! fail the command, so a single unreachable mirror cannot block platform
//! startup.

use anyhow::Result;
use clap::Args;

use app_repos::config::Settings;
use app_repos::sync::{RepoOutcome, SyncEngine, SyncReport};

use super::open;

/// Clone or pull registered repositories
#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Only synchronize this repository URL
    #[arg(value_name = "URL")]
    pub url: Option<String>,

    /// Do not print the per-repository summary
    #[arg(short, long)]
    pub quiet: bool,
}

/// Execute the `update` command.
pub fn execute(args: UpdateArgs, settings: &Settings) -> Result<()> {
    let (registry, git) = open(settings);
    let urls = match args.url {
        Some(url) => vec![url],
        None => registry.list(),
    };

    let report = SyncEngine::new(&registry, &git, settings.owner).synchronize(&urls);
    if !args.quiet {
        print_report(&report);
    }
    Ok(())
}

pub(crate) fn print_report(report: &SyncReport) {
    for repo in &report.repos {
        let marker = match repo.outcome {
            RepoOutcome::Cloned | RepoOutcome::Repaired | RepoOutcome::Updated { .. } => "✅",
            RepoOutcome::Skipped { .. } => "⚠️ ",
            RepoOutcome::Removed { .. } => "❌",
        };
        println!("{} {}: {}", marker, repo.url, repo.outcome);
    }
}
