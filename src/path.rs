//! Mapping from repository URLs to local clone directories

use std::path::{Path, PathBuf};

/// Encode a URL as a filesystem-safe directory name
///
/// Every character outside `[A-Za-z0-9]` becomes `-`. The mapping is pure and
/// stable across restarts, since it is the join key between registry entries
/// and clones on disk.
pub fn slugify(url: &str) -> String {
    url.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect()
}

/// Resolves clone locations under a fixed repos root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoPaths {
    root: PathBuf,
}

impl RepoPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Local clone directory for `url`.
    pub fn path_for(&self, url: &str) -> PathBuf {
        self.root.join(slugify(url))
    }
}
