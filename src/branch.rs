//! # Branch Switching
//!
//! Two ways to point a clone at different content:
//!
//! - [`BranchSwitcher::switch_branch`] moves any registered clone to another
//!   branch or commit of its own `origin`, widening the fetch refspec first
//!   because clones made from a single branch only know that branch.
//! - [`BranchSwitcher::checkout`] grafts an alternate app store into the
//!   *default* repository's clone: the descriptor's URL becomes an extra
//!   remote and the requested branch of that remote is checked out in place.
//!
//! Both are direct user requests, so failures are returned rather than logged.

use log::info;

use crate::config::Owner;
use crate::descriptor::RepoDescriptor;
use crate::error::{Error, Result};
use crate::ownership;
use crate::path::slugify;
use crate::registry::RegistryStore;
use crate::repository::GitOperations;
use crate::sync::{SyncEngine, SyncReport};

pub struct BranchSwitcher<'a> {
    registry: &'a RegistryStore,
    git: &'a dyn GitOperations,
    owner: Option<Owner>,
}

impl<'a> BranchSwitcher<'a> {
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

    /// Check out `branch` in the clone of `url`, then sync that clone.
    pub fn switch_branch(&self, url: &str, branch: &str) -> Result<SyncReport> {
        let path = self.registry.paths().path_for(url);
        if !path.exists() {
            return Err(Error::NotCloned {
                url: url.to_string(),
            });
        }

        if self.git.widen_fetch_refspec(&path)? {
            info!("{} now fetches all branches", url);
        }
        self.git.fetch(&path, "origin")?;
        self.git.checkout(&path, branch)?;
        info!("Switched {} to {}", url, branch);

        let engine = SyncEngine::new(self.registry, self.git, self.owner);
        Ok(engine.synchronize(&[url.to_string()]))
    }

    /// Check out `descriptor`'s branch from its URL inside the default clone.
    pub fn checkout(&self, descriptor: &RepoDescriptor) -> Result<()> {
        let default_repo = self.registry.default_repo();
        let path = self.registry.paths().path_for(default_repo);
        if !path.exists() {
            return Err(Error::NotCloned {
                url: default_repo.to_string(),
            });
        }

        let remote = slugify(&descriptor.url);
        let branch = descriptor.branch();
        self.git.ensure_remote(&path, &remote, &descriptor.url)?;
        self.git.fetch(&path, &remote)?;
        self.git.checkout_remote_branch(&path, &remote, branch)?;
        info!(
            "Checked out {} from {} in {}",
            branch,
            descriptor.url,
            path.display()
        );

        if let Some(owner) = self.owner {
            ownership::chown_tree(&path, owner)?;
        }
        Ok(())
    }
}
