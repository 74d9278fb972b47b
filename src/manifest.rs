//! App store manifest (`umbrel-app-store.yml`) at the root of each clone

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::defaults::MANIFEST_FILENAME;
use crate::error::{Error, Result};

/// The fields of a manifest this crate cares about. Unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppStoreManifest {
    /// App store identity. Unique across registered repositories.
    pub id: String,
    /// Human readable store name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

pub fn manifest_path(clone_dir: &Path) -> PathBuf {
    clone_dir.join(MANIFEST_FILENAME)
}

/// Read the manifest of a clone. `Ok(None)` when the file does not exist.
pub fn read(clone_dir: &Path) -> Result<Option<AppStoreManifest>> {
    let path = manifest_path(clone_dir);
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let manifest: AppStoreManifest =
        serde_yaml::from_str(&content).map_err(|e| Error::Manifest {
            path: path.clone(),
            message: e.to_string(),
        })?;

    if manifest.id.trim().is_empty() {
        return Err(Error::Manifest {
            path,
            message: "id is empty".to_string(),
        });
    }
    Ok(Some(manifest))
}
