//! # App Store Repository Library
//!
//! This library keeps a home server's collection of git-backed app store
//! repositories registered, cloned and up to date. It is the engine behind
//! the `app-repos` command-line tool.
//!
//! ## Quick Example
//!
//! ```
//! use app_repos::config::Settings;
//! use app_repos::descriptor::RepoDescriptor;
//! use app_repos::registry::RegistryStore;
//!
//! let root = tempfile::tempdir().unwrap();
//! let registry = RegistryStore::new(&Settings::new(root.path()));
//!
//! // Nothing registered yet: the default repository is implied
//! assert_eq!(registry.list().len(), 1);
//!
//! let descriptor = RepoDescriptor::parse("coolapp/umbrel-apps#staging");
//! registry.add(&descriptor.url).unwrap();
//! assert!(registry.contains("https://github.com/coolapp/umbrel-apps.git"));
//! ```
//!
//! ## Core Concepts
//!
//! - **Paths (`path`)**: every URL maps to a clone directory named by its slug.
//! - **Descriptors (`descriptor`)**: user input such as `owner/name#branch`
//!   normalized to an absolute URL and optional branch.
//! - **Registry (`registry`, `lock`)**: the persisted list of URLs, mutated
//!   only inside a lock-guarded transaction.
//! - **Sync (`sync`, `repository`, `git`)**: clone, pull, repair and prune
//!   clones through a mockable git seam.
//! - **Identity (`identity`, `manifest`)**: app store ids declared by each
//!   clone, which must be unique.
//! - **Branches (`branch`)**: retarget a clone to another branch or to an
//!   alternate remote.
//!
//! ## Execution Flow
//!
//! A command reads the registry for its working set of URLs and hands them to
//! the `SyncEngine`, which resolves each clone path, consults the
//! `IdentityIndex` after fresh clones, and unregisters repositories that break
//! the identity rules. Failures are isolated per repository.

pub mod branch;
pub mod config;
pub mod defaults;
pub mod descriptor;
pub mod error;
pub mod git;
pub mod identity;
pub mod lock;
pub mod manifest;
pub mod ownership;
pub mod path;
pub mod registry;
pub mod repository;
pub mod sync;

#[cfg(test)]
mod path_proptest;
