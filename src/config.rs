//! # Runtime Settings
//!
//! `Settings` gathers everything that locates the platform on disk and tunes
//! the synchronization engine. The binary builds it from CLI flags (each with
//! an environment variable fallback); tests build it directly around a
//! temporary root.
//!
//! All derived locations hang off a single root directory:
//!
//! - `<root>/db/user.json` - the registry document
//! - `<root>/db/user.json.lock` - the registry lock marker
//! - `<root>/repos/<slug>` - one clone per registered repository

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::defaults;
use crate::path::RepoPaths;

/// Owner applied recursively to every clone after a sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Owner {
    pub uid: u32,
    pub gid: u32,
}

impl Owner {
    pub fn new(uid: u32, gid: u32) -> Self {
        Self { uid, gid }
    }

    /// The platform's fixed service account.
    pub fn service() -> Self {
        Self::new(defaults::SERVICE_UID, defaults::SERVICE_GID)
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.uid, self.gid)
    }
}

impl FromStr for Owner {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (uid, gid) = s
            .split_once(':')
            .ok_or_else(|| format!("expected UID:GID, got '{}'", s))?;
        let uid = uid
            .trim()
            .parse()
            .map_err(|_| format!("invalid uid '{}'", uid))?;
        let gid = gid
            .trim()
            .parse()
            .map_err(|_| format!("invalid gid '{}'", gid))?;
        Ok(Self { uid, gid })
    }
}

/// Parse an `--owner` value. `none` disables ownership normalization.
pub fn parse_owner(s: &str) -> Result<Option<Owner>, String> {
    if s.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    s.parse().map(Some)
}

/// Resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Platform root directory.
    pub root: PathBuf,
    /// The primary repository, always eligible and exempt from identity checks.
    pub default_repo: String,
    /// Ownership applied to clones, if any.
    pub owner: Option<Owner>,
    /// Budget for each clone, fetch or pull.
    pub git_timeout: Duration,
    /// Interval between lock acquisition attempts.
    pub lock_poll: Duration,
}

impl Settings {
    /// Settings rooted at `root` with every other value at its default.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            default_repo: defaults::DEFAULT_REPO_URL.to_string(),
            owner: Some(Owner::service()),
            git_timeout: defaults::GIT_TIMEOUT,
            lock_poll: defaults::LOCK_POLL_INTERVAL,
        }
    }

    pub fn with_default_repo(mut self, url: impl Into<String>) -> Self {
        self.default_repo = url.into();
        self
    }

    pub fn with_owner(mut self, owner: Option<Owner>) -> Self {
        self.owner = owner;
        self
    }

    pub fn with_git_timeout(mut self, timeout: Duration) -> Self {
        self.git_timeout = timeout;
        self
    }

    pub fn with_lock_poll(mut self, poll: Duration) -> Self {
        self.lock_poll = poll;
        self
    }

    pub fn registry_file(&self) -> PathBuf {
        self.root.join(defaults::REGISTRY_FILE)
    }

    /// The lock marker sits next to the registry document.
    pub fn lock_file(&self) -> PathBuf {
        let mut name = self.registry_file().into_os_string();
        name.push(".lock");
        PathBuf::from(name)
    }

    pub fn repos_root(&self) -> PathBuf {
        self.root.join(defaults::REPOS_DIR)
    }

    pub fn paths(&self) -> RepoPaths {
        RepoPaths::new(self.repos_root())
    }
}
