//! # Identity Index
//!
//! Read-only queries over the clones of registered repositories:
//!
//! - which app store identities the *other* repositories declare, used by the
//!   sync engine to reject a freshly cloned duplicate
//! - which clone provides a given app directory
//!
//! A clone without a readable manifest contributes nothing here. Deciding
//! whether that is an error is the caller's business.

use std::path::{Component, Path, PathBuf};

use log::debug;

use crate::manifest;
use crate::registry::RegistryStore;

/// Queries over registered clones.
#[derive(Debug, Clone, Copy)]
pub struct IdentityIndex<'a> {
    registry: &'a RegistryStore,
}

impl<'a> IdentityIndex<'a> {
    pub fn new(registry: &'a RegistryStore) -> Self {
        Self { registry }
    }

    /// Declared identity of the clone of `url`, if it has one.
    pub fn identity_of(&self, url: &str) -> Option<String> {
        let clone_dir = self.registry.paths().path_for(url);
        if !clone_dir.is_dir() {
            return None;
        }
        match manifest::read(&clone_dir) {
            Ok(manifest) => manifest.map(|m| m.id),
            Err(e) => {
                debug!("Ignoring manifest of {}: {}", url, e);
                None
            }
        }
    }

    /// Identities declared by every registered repository except `url`.
    pub fn identities_excluding(&self, url: &str) -> Vec<String> {
        self.registry
            .list()
            .iter()
            .filter(|other| other.as_str() != url)
            .filter_map(|other| self.identity_of(other))
            .collect()
    }

    /// Clone directory of the first registered repository that contains
    /// `app` as a subdirectory.
    pub fn locate_app(&self, app: &str) -> Option<PathBuf> {
        if !is_plain_name(app) {
            return None;
        }
        self.registry
            .list()
            .iter()
            .map(|url| self.registry.paths().path_for(url))
            .find(|clone_dir| clone_dir.join(app).is_dir())
    }
}

/// A single normal path component: no separators, no `.` or `..`.
fn is_plain_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.contains('/')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::defaults::{DEFAULT_REPO_URL, MANIFEST_FILENAME};
    use std::fs;
    use tempfile::TempDir;

    const COOLAPP: &str = "https://github.com/coolapp/umbrel-apps.git";
    const OTHER: &str = "https://github.com/other/umbrel-apps.git";

    fn setup(temp_dir: &TempDir) -> RegistryStore {
        let store = RegistryStore::new(&Settings::new(temp_dir.path()));
        store.add(COOLAPP).unwrap();
        store.add(OTHER).unwrap();
        store
    }

    fn clone_with_manifest(store: &RegistryStore, url: &str, manifest: Option<&str>) -> PathBuf {
        let dir = store.paths().path_for(url);
        fs::create_dir_all(&dir).unwrap();
        if let Some(content) = manifest {
            fs::write(dir.join(MANIFEST_FILENAME), content).unwrap();
        }
        dir
    }

    #[test]
    fn test_identities_excluding_skips_self_and_missing() {
        let temp_dir = TempDir::new().unwrap();
        let store = setup(&temp_dir);
        clone_with_manifest(&store, DEFAULT_REPO_URL, Some("id: umbrel\n"));
        clone_with_manifest(&store, COOLAPP, Some("id: coolapp\n"));
        clone_with_manifest(&store, OTHER, None);
        let index = IdentityIndex::new(&store);

        let mut ids = index.identities_excluding(COOLAPP);
        ids.sort();
        assert_eq!(ids, vec!["umbrel".to_string()]);

        let mut ids = index.identities_excluding(OTHER);
        ids.sort();
        assert_eq!(ids, vec!["coolapp".to_string(), "umbrel".to_string()]);
    }

    #[test]
    fn test_identities_excluding_ignores_invalid_manifest() {
        let temp_dir = TempDir::new().unwrap();
        let store = setup(&temp_dir);
        clone_with_manifest(&store, COOLAPP, Some("name: no id here\n"));

        let index = IdentityIndex::new(&store);
        assert!(index.identities_excluding(OTHER).is_empty());
        assert_eq!(index.identity_of(COOLAPP), None);
    }

    #[test]
    fn test_identities_excluding_ignores_unregistered_clones() {
        let temp_dir = TempDir::new().unwrap();
        let store = setup(&temp_dir);
        clone_with_manifest(
            &store,
            "https://github.com/stranger/apps.git",
            Some("id: stranger\n"),
        );

        assert!(IdentityIndex::new(&store)
            .identities_excluding(COOLAPP)
            .is_empty());
    }

    #[test]
    fn test_locate_app_first_match_wins() {
        let temp_dir = TempDir::new().unwrap();
        let store = setup(&temp_dir);
        let coolapp = clone_with_manifest(&store, COOLAPP, None);
        let other = clone_with_manifest(&store, OTHER, None);
        fs::create_dir_all(coolapp.join("sparkles-hello-world")).unwrap();
        fs::create_dir_all(other.join("sparkles-hello-world")).unwrap();
        fs::create_dir_all(other.join("only-here")).unwrap();

        let index = IdentityIndex::new(&store);
        assert_eq!(index.locate_app("sparkles-hello-world"), Some(coolapp));
        assert_eq!(index.locate_app("only-here"), Some(other));
        assert_eq!(index.locate_app("nowhere"), None);
    }

    #[test]
    fn test_locate_app_ignores_files_and_traversal() {
        let temp_dir = TempDir::new().unwrap();
        let store = setup(&temp_dir);
        let coolapp = clone_with_manifest(&store, COOLAPP, Some("id: coolapp\n"));
        fs::create_dir_all(coolapp.join("nested/app")).unwrap();

        let index = IdentityIndex::new(&store);
        assert_eq!(index.locate_app(MANIFEST_FILENAME), None);
        assert_eq!(index.locate_app("nested/app"), None);
        assert_eq!(index.locate_app(".."), None);
        assert_eq!(index.locate_app("."), None);
        assert_eq!(index.locate_app(""), None);
    }
}
