//! # Repository Registry
//!
//! The set of registered repository URLs lives in the `repos` field of the
//! platform's user settings document (`db/user.json`). Other fields in that
//! document belong to unrelated subsystems and are carried through untouched.
//!
//! ## Reads
//!
//! [`RegistryStore::list`] never locks and never fails. A missing document, a
//! malformed document, a missing field or an empty list all yield the default
//! repository as the only entry.
//!
//! ## Writes
//!
//! Every mutation is a [`RegistryStore::update`] transaction: take the
//! [`RegistryLock`], load the effective list, apply a transformation,
//! deduplicate, write the document to a sibling temp file and rename it over
//! the original. Readers therefore see either the old or the new document.
//! The lock is released when the transaction scope ends, whatever the outcome.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, info};
use serde_json::{Map, Value};
use tempfile::NamedTempFile;

use crate::config::Settings;
use crate::error::{Error, Result};
use crate::lock::RegistryLock;
use crate::path::RepoPaths;

const REPOS_FIELD: &str = "repos";

/// Durable registry of repository URLs.
#[derive(Debug, Clone)]
pub struct RegistryStore {
    document: PathBuf,
    lock_file: PathBuf,
    lock_poll: Duration,
    default_repo: String,
    paths: RepoPaths,
}

impl RegistryStore {
    pub fn new(settings: &Settings) -> Self {
        Self {
            document: settings.registry_file(),
            lock_file: settings.lock_file(),
            lock_poll: settings.lock_poll,
            default_repo: settings.default_repo.clone(),
            paths: settings.paths(),
        }
    }

    pub fn document(&self) -> &Path {
        &self.document
    }

    pub fn default_repo(&self) -> &str {
        &self.default_repo
    }

    pub fn paths(&self) -> &RepoPaths {
        &self.paths
    }

    /// The effective list of registered URLs, in registration order.
    pub fn list(&self) -> Vec<String> {
        let repos = fs::read_to_string(&self.document)
            .ok()
            .and_then(|content| serde_json::from_str::<Value>(&content).ok())
            .map(|doc| repos_from(&doc))
            .unwrap_or_default();
        self.or_default(repos)
    }

    pub fn contains(&self, url: &str) -> bool {
        self.list().iter().any(|u| u == url)
    }

    /// Register `url`. Fails with [`Error::AlreadyExists`] if present.
    pub fn add(&self, url: &str) -> Result<()> {
        if self.contains(url) {
            return Err(Error::AlreadyExists {
                url: url.to_string(),
            });
        }

        self.update(|repos| {
            if repos.iter().any(|u| u == url) {
                return Err(Error::AlreadyExists {
                    url: url.to_string(),
                });
            }
            repos.push(url.to_string());
            Ok(())
        })?;

        info!("Registered {}", url);
        Ok(())
    }

    /// Unregister `url` and delete its clone. Fails with [`Error::NotFound`]
    /// if absent.
    pub fn remove(&self, url: &str) -> Result<()> {
        if !self.contains(url) {
            return Err(Error::NotFound {
                url: url.to_string(),
            });
        }

        self.update(|repos| {
            let before = repos.len();
            repos.retain(|u| u != url);
            if repos.len() == before {
                return Err(Error::NotFound {
                    url: url.to_string(),
                });
            }
            Ok(())
        })?;
        info!("Unregistered {}", url);

        self.delete_clone(url)
    }

    /// Delete the local clone of `url`, if any.
    pub fn delete_clone(&self, url: &str) -> Result<()> {
        let path = self.paths.path_for(url);
        if path.exists() {
            debug!("Deleting clone {}", path.display());
            fs::remove_dir_all(&path)?;
        }
        Ok(())
    }

    /// Run `f` against the registered URLs under the registry lock and
    /// persist the result.
    ///
    /// Nothing is written when `f` returns an error.
    pub fn update<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Vec<String>) -> Result<T>,
    {
        let _lock = RegistryLock::acquire(&self.lock_file, self.lock_poll)?;

        let mut doc = self.load_document()?;
        let mut repos = self.or_default(repos_from(&Value::Object(doc.clone())));

        let outcome = f(&mut repos)?;

        dedup_in_order(&mut repos);
        doc.insert(
            REPOS_FIELD.to_string(),
            Value::Array(repos.into_iter().map(Value::String).collect()),
        );
        self.persist(&doc)?;

        Ok(outcome)
    }

    /// Load the document for a rewrite. Unlike `list`, a document that exists
    /// but cannot be parsed is an error, so it is never clobbered.
    fn load_document(&self) -> Result<Map<String, Value>> {
        let content = match fs::read_to_string(&self.document) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(Error::Registry {
                path: self.document.clone(),
                message: "top-level value is not an object".to_string(),
            }),
            Err(e) => Err(Error::Registry {
                path: self.document.clone(),
                message: e.to_string(),
            }),
        }
    }

    fn persist(&self, doc: &Map<String, Value>) -> Result<()> {
        let parent = match self.document.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)?;

        let mut content = serde_json::to_string_pretty(doc)?;
        content.push('\n');

        // Dropped unpersisted, the temp file removes itself
        let mut temp = NamedTempFile::new_in(parent)?;
        temp.write_all(content.as_bytes())?;
        temp.as_file().sync_all()?;
        temp.persist(&self.document).map_err(|e| e.error)?;
        debug!("Wrote registry {}", self.document.display());
        Ok(())
    }

    fn or_default(&self, mut repos: Vec<String>) -> Vec<String> {
        dedup_in_order(&mut repos);
        if repos.is_empty() {
            repos.push(self.default_repo.clone());
        }
        repos
    }
}

fn repos_from(doc: &Value) -> Vec<String> {
    doc.get(REPOS_FIELD)
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn dedup_in_order(repos: &mut Vec<String>) {
    let mut seen = std::collections::HashSet::new();
    repos.retain(|url| seen.insert(url.clone()));
}
