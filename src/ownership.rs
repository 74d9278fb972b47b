//! Recursive ownership normalization of clones
//!
//! Clones are created by whoever runs the sync (often root), but consumers
//! run as the platform's service account. Every entry below a clone is
//! re-owned without following symlinks.

use std::fs::File;
use std::path::Path;

use log::debug;
use nix::fcntl::AtFlags;
use nix::unistd::{self, Gid, Uid};
use walkdir::WalkDir;

use crate::config::Owner;
use crate::error::{Error, Result};

/// Change ownership of `root` and everything below it to `owner`.
pub fn chown_tree(root: &Path, owner: Owner) -> Result<()> {
    if !root.exists() {
        return Ok(());
    }
    debug!("Setting ownership of {} to {}", root.display(), owner);

    let cwd_fd = File::open(".")?;
    let uid = Uid::from_raw(owner.uid);
    let gid = Gid::from_raw(owner.gid);

    for entry in WalkDir::new(root).follow_links(false) {
        let entry = entry.map_err(|e| Error::Ownership {
            path: root.to_path_buf(),
            message: e.to_string(),
        })?;
        unistd::fchownat(
            &cwd_fd,
            entry.path(),
            Some(uid),
            Some(gid),
            AtFlags::AT_SYMLINK_NOFOLLOW,
        )
        .map_err(|e| Error::Ownership {
            path: entry.path().to_path_buf(),
            message: e.to_string(),
        })?;
    }
    Ok(())
}
