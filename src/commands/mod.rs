//! # CLI Command Implementations
//!
//! One module per subcommand of the `app-repos` tool. Each module has an
//! `Args` struct derived with `clap` and an `execute` function that calls into
//! the `app_repos` library.
//!
//! Required positional arguments are declared optional and checked here so a
//! missing argument is reported as a validation error (exit code 1) before any
//! side effect is attempted.

pub mod add;
pub mod branch;
pub mod checkout;
pub mod completions;
pub mod id;
pub mod list;
pub mod locate;
pub mod path;
pub mod remove;
pub mod update;

use anyhow::Result;

use app_repos::config::Settings;
use app_repos::error::Error;
use app_repos::registry::RegistryStore;
use app_repos::repository::DefaultGitOperations;

/// Unwrap a required argument or fail with a validation error.
pub(crate) fn required(value: Option<String>, name: &str) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(Error::Validation {
            message: format!("missing required argument <{}>", name),
        }
        .into()),
    }
}

/// Print soft outcomes and succeed; propagate everything else.
pub(crate) fn soft_ok(result: app_repos::error::Result<()>) -> Result<()> {
    match result {
        Err(e) if e.is_soft() => {
            println!("{}", e);
            Ok(())
        }
        other => Ok(other?),
    }
}

pub(crate) fn open(settings: &Settings) -> (RegistryStore, DefaultGitOperations) {
    (
        RegistryStore::new(settings),
        DefaultGitOperations::new(settings.git_timeout),
    )
}
