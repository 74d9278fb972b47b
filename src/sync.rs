//! # Sync Engine
//!
//! Reconciles the local clone of each repository URL with its remote. Every
//! URL is handled independently and a failure never stops the loop:
//!
//! 1. Resolve the clone path and make sure git trusts it.
//! 2. If the clone exists, probe it. A transient failure leaves it alone
//!    until the next pass; a corrupt clone is deleted and rebuilt below.
//! 3. If there is no clone, clone it. A repository other than the default
//!    must then declare an app store identity that no other registered
//!    repository uses, otherwise it is unregistered and its clone deleted.
//! 4. If the clone existed and is healthy, pull its current branch.
//! 5. Whatever happened, re-own the clone for the service account.
//!
//! Identity checks only run right after a clone. A conflict introduced later
//! by an upstream manifest change goes unnoticed until the repository is
//! re-cloned.
//!
//! Per repository, across passes:
//!
//! ```text
//! Unregistered -> Cloning -> Healthy (pull on every pass)
//!                         -> CorruptPendingRepair -> Cloning
//!                         -> IdentityConflictRemoved (terminal)
//! ```

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, error, info, warn};

use crate::config::Owner;
use crate::error::{Error, Result};
use crate::git::CloneHealth;
use crate::identity::IdentityIndex;
use crate::manifest;
use crate::ownership;
use crate::registry::RegistryStore;
use crate::repository::GitOperations;

/// What a sync pass did to one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoOutcome {
    /// Freshly cloned.
    Cloned,
    /// A corrupt clone was deleted and cloned again.
    Repaired,
    /// An existing clone was pulled.
    Updated { branch: String },
    /// A transient failure. An existing clone is left as it was and a failed
    /// fresh clone is discarded.
    Skipped { reason: String },
    /// The repository violated the identity rules and was unregistered.
    Removed { reason: String },
}

impl fmt::Display for RepoOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepoOutcome::Cloned => write!(f, "cloned"),
            RepoOutcome::Repaired => write!(f, "repaired"),
            RepoOutcome::Updated { branch } => write!(f, "updated ({})", branch),
            RepoOutcome::Skipped { reason } => write!(f, "skipped: {}", reason),
            RepoOutcome::Removed { reason } => write!(f, "removed: {}", reason),
        }
    }
}

/// Result of syncing one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSync {
    pub url: String,
    pub path: PathBuf,
    pub outcome: RepoOutcome,
}

/// Result of a whole pass, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub repos: Vec<RepoSync>,
}

impl SyncReport {
    pub fn outcome_of(&self, url: &str) -> Option<&RepoOutcome> {
        self.repos.iter().find(|r| r.url == url).map(|r| &r.outcome)
    }
}

/// Keeps clones in step with their remotes.
pub struct SyncEngine<'a> {
    registry: &'a RegistryStore,
    git: &'a dyn GitOperations,
    owner: Option<Owner>,
}

impl<'a> SyncEngine<'a> {
    pub fn new(
        registry: &'a RegistryStore,
        git: &'a dyn GitOperations,
        owner: Option<Owner>,
    ) -> Self {
        Self {
            registry,
            git,
            owner,
        }
    }

    /// Synchronize every URL in `urls`, one at a time.
    pub fn synchronize(&self, urls: &[String]) -> SyncReport {
        let repos = urls
            .iter()
            .map(|url| {
                let repo = self.sync_one(url);
                info!("{}: {}", repo.url, repo.outcome);
                repo
            })
            .collect();
        SyncReport { repos }
    }

    fn sync_one(&self, url: &str) -> RepoSync {
        let path = self.registry.paths().path_for(url);
        if let Err(e) = self.git.ensure_safe_directory(&path) {
            warn!("Could not mark {} as a safe directory: {}", path.display(), e);
        }

        let outcome = self.reconcile(url, &path);

        if path.exists() {
            if let Some(owner) = self.owner {
                if let Err(e) = ownership::chown_tree(&path, owner) {
                    warn!("{}", e);
                }
            }
        }

        RepoSync {
            url: url.to_string(),
            path,
            outcome,
        }
    }

    fn reconcile(&self, url: &str, path: &Path) -> RepoOutcome {
        let mut repaired = false;

        if path.exists() {
            match self.git.probe(path) {
                CloneHealth::Healthy => return self.pull(url, path),
                CloneHealth::Unreachable => {
                    warn!(
                        "Could not inspect {}, leaving it for the next pass",
                        path.display()
                    );
                    return RepoOutcome::Skipped {
                        reason: "clone status unavailable".to_string(),
                    };
                }
                CloneHealth::Corrupt => {
                    warn!("Clone of {} is corrupt, re-cloning", url);
                    if let Err(e) = fs::remove_dir_all(path) {
                        warn!("Could not delete corrupt clone {}: {}", path.display(), e);
                        return RepoOutcome::Skipped {
                            reason: e.to_string(),
                        };
                    }
                    repaired = true;
                }
            }
        }

        info!("Cloning {}", url);
        if let Err(e) = self.git.clone_repo(url, path) {
            warn!("Failed to clone {}: {}", url, e);
            discard_clone(path);
            return RepoOutcome::Skipped {
                reason: e.to_string(),
            };
        }

        if url != self.registry.default_repo() {
            match self.verify_identity(url, path) {
                Ok(()) => {}
                Err(violation) if violation.is_setup_violation() => {
                    return self.drop_repo(url, violation);
                }
                Err(e) => {
                    warn!("Could not verify identity of {}: {}", url, e);
                    discard_clone(path);
                    return RepoOutcome::Skipped {
                        reason: e.to_string(),
                    };
                }
            }
        }

        if repaired {
            RepoOutcome::Repaired
        } else {
            RepoOutcome::Cloned
        }
    }

    fn pull(&self, url: &str, path: &Path) -> RepoOutcome {
        let result = self.git.current_branch(path).and_then(|branch| {
            debug!("Pulling {} ({})", url, branch);
            self.git.pull(path, &branch).map(|_| branch)
        });
        match result {
            Ok(branch) => RepoOutcome::Updated { branch },
            Err(e) => {
                warn!("Failed to update {}: {}", url, e);
                RepoOutcome::Skipped {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// The fresh clone must declare an identity nobody else uses.
    fn verify_identity(&self, url: &str, path: &Path) -> Result<()> {
        let manifest = manifest::read(path)?.ok_or_else(|| Error::MissingManifest {
            url: url.to_string(),
        })?;

        let taken = IdentityIndex::new(self.registry).identities_excluding(url);
        if taken.contains(&manifest.id) {
            return Err(Error::IdentityConflict {
                url: url.to_string(),
                id: manifest.id,
            });
        }
        Ok(())
    }

    fn drop_repo(&self, url: &str, violation: Error) -> RepoOutcome {
        error!("{}; unregistering it", violation);

        let removed = match self.registry.remove(url) {
            Err(Error::NotFound { .. }) => self.registry.delete_clone(url),
            other => other,
        };
        if let Err(e) = removed {
            warn!("Failed to unregister {}: {}", url, e);
        }

        RepoOutcome::Removed {
            reason: violation.to_string(),
        }
    }
}

/// Remove what a failed clone left behind so the next pass clones afresh.
///
/// A killed `git clone` can leave a `.git` with an unborn HEAD that probes
/// healthy but can never be pulled.
fn discard_clone(path: &Path) {
    if !path.exists() {
        return;
    }
    match fs::remove_dir_all(path) {
        Ok(()) => debug!("Discarded partial clone {}", path.display()),
        Err(e) => warn!("Could not delete partial clone {}: {}", path.display(), e),
    }
}
