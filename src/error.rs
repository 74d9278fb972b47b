//! # Error Handling
//!
//! This module defines the centralized error type for `app-repos`. It uses
//! `thiserror` to build a single `Error` enum whose variants follow the way
//! failures are treated by the callers:
//!
//! - **Validation**: a required argument is missing. Fatal, nothing is touched.
//! - **Soft outcomes** (`AlreadyExists`, `NotFound`): reported to the user,
//!   the process still exits successfully. See [`Error::is_soft`].
//! - **Direct-request failures** (`NotCloned`, `CheckoutFailed`): propagated
//!   verbatim to the user.
//! - **Transient sync failures** (`GitCommand`, `GitTimeout`): swallowed per
//!   repository by the sync engine and only logged.
//! - **Setup violations** (`MissingManifest`, `Manifest`, `IdentityConflict`): trigger
//!   automatic unregistration of the offending repository.
//!
//! The `Result` alias is used throughout the library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for app-repos operations
#[derive(Error, Debug)]
pub enum Error {
    /// A required argument was not supplied.
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// The repository is already part of the registry.
    #[error("Repository {url} is already registered")]
    AlreadyExists { url: String },

    /// The repository is not part of the registry.
    #[error("Repository {url} is not registered")]
    NotFound { url: String },

    /// The repository has no local clone yet.
    #[error("Repository {url} has not been cloned yet\n  hint: run `app-repos update` first")]
    NotCloned { url: String },

    /// `git checkout` refused the requested ref.
    #[error("Checkout of {target} failed in {}: {stderr}", path.display())]
    CheckoutFailed {
        path: PathBuf,
        target: String,
        stderr: String,
    },

    /// A git invocation exited unsuccessfully or could not be spawned.
    #[error("Git command failed: git {command} - {stderr}")]
    GitCommand { command: String, stderr: String },

    /// A network git operation exceeded its wall-clock budget.
    #[error("Git command timed out after {seconds}s: git {command}")]
    GitTimeout { command: String, seconds: u64 },

    /// The registry document exists but cannot be safely rewritten.
    #[error("Registry document {} is malformed: {message}", path.display())]
    Registry { path: PathBuf, message: String },

    /// A manifest file exists but could not be interpreted.
    #[error("Manifest {} is invalid: {message}", path.display())]
    Manifest { path: PathBuf, message: String },

    /// A freshly cloned repository does not declare an app store identity.
    #[error("Repository {url} has no app store manifest")]
    MissingManifest { url: String },

    /// A freshly cloned repository reuses another repository's identity.
    #[error("Repository {url} declares app store id '{id}' which is already in use")]
    IdentityConflict { url: String, id: String },

    /// Ownership of a clone could not be normalized.
    #[error("Failed to change ownership of {}: {message}", path.display())]
    Ownership { path: PathBuf, message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON error, wrapped from `serde_json::Error`.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// Whether this error describes an idempotent no-op rather than a failure.
    pub fn is_soft(&self) -> bool {
        matches!(self, Error::AlreadyExists { .. } | Error::NotFound { .. })
    }

    /// Whether this error is a setup violation that unregisters the repository.
    pub fn is_setup_violation(&self) -> bool {
        matches!(
            self,
            Error::MissingManifest { .. }
                | Error::IdentityConflict { .. }
                | Error::Manifest { .. }
        )
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
