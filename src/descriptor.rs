//! # Repository Descriptors
//!
//! Users name repositories in a few different ways:
//!
//! - `owner/name` shorthand, expanded against the default forge
//! - a full URL (`https://...`, `ssh://...`, `git@host:owner/name.git`)
//! - either of the above followed by `#branch`
//!
//! [`RepoDescriptor::parse`] normalizes all of them into an absolute URL plus
//! an optional branch. Parsing never fails: a nonsensical descriptor becomes a
//! well-formed URL that the network layer will later fail to reach.

use std::fmt;

use crate::defaults::{DEFAULT_BRANCH, DEFAULT_FORGE_PREFIX};

/// A normalized `(url, branch)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoDescriptor {
    /// Absolute repository URL. Never contains the branch suffix.
    pub url: String,
    /// Explicit branch override, if the descriptor had one.
    pub branch: Option<String>,
}

impl RepoDescriptor {
    /// Parse a user-supplied descriptor.
    pub fn parse(descriptor: &str) -> Self {
        let (candidate, branch) = match descriptor.split_once('#') {
            Some((url, branch)) => (url, Some(branch)),
            None => (descriptor, None),
        };

        let url = if is_absolute(candidate) {
            candidate.to_string()
        } else {
            expand_shorthand(candidate)
        };

        Self {
            url,
            branch: branch
                .map(str::trim)
                .filter(|b| !b.is_empty())
                .map(str::to_string),
        }
    }

    /// The branch to track, falling back to the default branch.
    pub fn branch(&self) -> &str {
        self.branch.as_deref().unwrap_or(DEFAULT_BRANCH)
    }
}

impl fmt::Display for RepoDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.branch {
            Some(branch) => write!(f, "{}#{}", self.url, branch),
            None => write!(f, "{}", self.url),
        }
    }
}

fn is_absolute(candidate: &str) -> bool {
    candidate.contains("://") || candidate.contains('@')
}

/// `owner/name` -> `https://github.com/owner/name.git`
fn expand_shorthand(candidate: &str) -> String {
    let path = candidate.trim_matches('/');
    if path.ends_with(".git") {
        format!("{}{}", DEFAULT_FORGE_PREFIX, path)
    } else {
        format!("{}{}.git", DEFAULT_FORGE_PREFIX, path)
    }
}
