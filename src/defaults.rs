//! Default values for app-repos.
//!
//! This module provides centralized default values used across commands,
//! ensuring consistency and avoiding duplication.

use std::path::PathBuf;
use std::time::Duration;

/// The platform's official app store repository.
pub const DEFAULT_REPO_URL: &str = "https://github.com/getumbrel/umbrel-apps.git";

/// Prefix used to expand `owner/name` shorthand descriptors.
pub const DEFAULT_FORGE_PREFIX: &str = "https://github.com/";

/// Branch assumed when a descriptor carries no `#branch` suffix.
pub const DEFAULT_BRANCH: &str = "master";

/// Manifest file declaring a repository's app store identity.
pub const MANIFEST_FILENAME: &str = "umbrel-app-store.yml";

/// Registry document, relative to the platform root.
pub const REGISTRY_FILE: &str = "db/user.json";

/// Directory holding one clone per registered repository, relative to the root.
pub const REPOS_DIR: &str = "repos";

/// Wall-clock budget for a single clone, fetch or pull.
pub const GIT_TIMEOUT: Duration = Duration::from_secs(30);

/// Interval between attempts to take the registry lock.
pub const LOCK_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Service account that must own every clone.
pub const SERVICE_UID: u32 = 1000;
pub const SERVICE_GID: u32 = 1000;

/// Returns the default platform root directory.
///
/// The platform lives in `~/umbrel`. Falls back to `./umbrel` if the home
/// directory cannot be determined.
///
/// This can be overridden by the `--root` CLI flag or the `APP_REPOS_ROOT`
/// environment variable.
pub fn default_root() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("umbrel")
}
