//! # Version Control Seam
//!
//! The sync engine and branch switcher never call `git` directly. They go
//! through the [`GitOperations`] trait, which separates the reconciliation
//! logic from the concrete git invocations.
//!
//! In the main application, [`DefaultGitOperations`] wraps the system `git`
//! binary (see [`crate::git`]) and applies the configured network timeout.
//! In tests, a mock implementation simulates remotes, unreachable hosts and
//! corrupt clones without touching the network.

use std::path::Path;
use std::time::Duration;

use log::debug;

use crate::error::Result;
use crate::git::{self, CloneHealth, WIDE_FETCH_REFSPEC};

/// Trait for git operations - allows mocking in tests
pub trait GitOperations: Send + Sync {
    /// Register `path` as a trusted directory, once.
    fn ensure_safe_directory(&self, path: &Path) -> Result<()>;

    /// Classify an existing clone.
    fn probe(&self, path: &Path) -> CloneHealth;

    /// Clone `url` into `target_dir`.
    fn clone_repo(&self, url: &str, target_dir: &Path) -> Result<()>;

    /// Name of the checked out branch.
    fn current_branch(&self, path: &Path) -> Result<String>;

    /// Fast-forward `branch` from `origin`.
    fn pull(&self, path: &Path, branch: &str) -> Result<()>;

    /// Make `origin` fetch every branch. Returns whether the refspec changed.
    fn widen_fetch_refspec(&self, path: &Path) -> Result<bool>;

    /// Fetch from `remote`.
    fn fetch(&self, path: &Path, remote: &str) -> Result<()>;

    /// Check out a branch or commit. Fails with `CheckoutFailed`.
    fn checkout(&self, path: &Path, target: &str) -> Result<()>;

    /// Make sure `name` is a remote pointing at `url`.
    fn ensure_remote(&self, path: &Path, name: &str, url: &str) -> Result<()>;

    /// Check out local `branch` reset to `remote/branch`.
    fn checkout_remote_branch(&self, path: &Path, remote: &str, branch: &str) -> Result<()>;
}

/// The default implementation of `GitOperations`, which uses the system's
/// `git` command.
#[derive(Debug, Clone)]
pub struct DefaultGitOperations {
    timeout: Duration,
}

impl DefaultGitOperations {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl GitOperations for DefaultGitOperations {
    fn ensure_safe_directory(&self, path: &Path) -> Result<()> {
        let wanted = path.to_string_lossy();
        if git::safe_directories()?
            .iter()
            .any(|dir| dir == "*" || *dir == wanted)
        {
            return Ok(());
        }
        debug!("Trusting {}", path.display());
        git::add_safe_directory(path)
    }

    fn probe(&self, path: &Path) -> CloneHealth {
        git::probe(path, self.timeout)
    }

    fn clone_repo(&self, url: &str, target_dir: &Path) -> Result<()> {
        git::clone(url, target_dir, self.timeout)
    }

    fn current_branch(&self, path: &Path) -> Result<String> {
        git::current_branch(path)
    }

    fn pull(&self, path: &Path, branch: &str) -> Result<()> {
        git::pull(path, branch, self.timeout)
    }

    fn widen_fetch_refspec(&self, path: &Path) -> Result<bool> {
        let current = git::config_get_all(path, "remote.origin.fetch")?;
        if current.len() == 1 && current[0] == WIDE_FETCH_REFSPEC {
            return Ok(false);
        }
        git::config_replace_all(path, "remote.origin.fetch", WIDE_FETCH_REFSPEC)?;
        Ok(true)
    }

    fn fetch(&self, path: &Path, remote: &str) -> Result<()> {
        git::fetch(path, remote, self.timeout)
    }

    fn checkout(&self, path: &Path, target: &str) -> Result<()> {
        git::checkout(path, target)
    }

    fn ensure_remote(&self, path: &Path, name: &str, url: &str) -> Result<()> {
        match git::remote_url(path, name)? {
            Some(existing) if existing == url => Ok(()),
            Some(_) => git::set_remote_url(path, name, url),
            None => git::add_remote(path, name, url),
        }
    }

    fn checkout_remote_branch(&self, path: &Path, remote: &str, branch: &str) -> Result<()> {
        git::checkout_reset(path, branch, &format!("{}/{}", remote, branch))
    }
}
