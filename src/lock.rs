//! # Registry Lock
//!
//! Registry mutations are serialized across processes by a marker file next
//! to the registry document. The marker is created with create-if-absent
//! semantics and holds the owner's process id. A second acquirer polls at a
//! fixed interval until the marker disappears; there is no timeout and no
//! stale-lock detection, so release must be guaranteed:
//!
//! - normal scope exit and unwinding release through `Drop`
//! - `SIGINT`, `SIGTERM` and `SIGHUP` release through a signal handler that
//!   unlinks the marker and then re-raises the signal with default handling
//!
//! The lock is not reentrant. Acquiring it twice from the same process
//! deadlocks.

use std::ffi::{c_char, CStr, CString};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};
use std::ptr;
use std::sync::atomic::{AtomicPtr, Ordering};
use std::sync::Once;
use std::thread;
use std::time::Duration;

use log::{debug, info, warn};
use nix::libc::c_int;
use nix::sys::signal::{self, SigHandler, Signal};
use nix::unistd;

use crate::error::Result;

/// Marker path the signal handler removes. Owned by whichever party swaps it out.
static ACTIVE_MARKER: AtomicPtr<c_char> = AtomicPtr::new(ptr::null_mut());
static INSTALL_HANDLERS: Once = Once::new();

const CLEANUP_SIGNALS: [Signal; 3] = [Signal::SIGINT, Signal::SIGTERM, Signal::SIGHUP];

/// Exclusive hold on the registry. Released when dropped.
#[derive(Debug)]
pub struct RegistryLock {
    path: PathBuf,
    marker: *mut c_char,
}

impl RegistryLock {
    /// Block until the lock at `path` is ours, polling every `poll`.
    pub fn acquire(path: &Path, poll: Duration) -> Result<Self> {
        let mut announced = false;
        loop {
            if let Some(lock) = Self::try_acquire(path)? {
                return Ok(lock);
            }
            if !announced {
                info!(
                    "Waiting for registry lock {} (held by pid {})",
                    path.display(),
                    holder_pid(path).as_deref().unwrap_or("unknown")
                );
                announced = true;
            }
            thread::sleep(poll);
        }
    }

    /// Take the lock if nobody holds it.
    pub fn try_acquire(path: &Path) -> Result<Option<Self>> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let lock = Self {
            path: path.to_path_buf(),
            marker: register_marker(path),
        };
        writeln!(file, "{}", std::process::id())?;
        debug!("Acquired registry lock {}", path.display());
        Ok(Some(lock))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for RegistryLock {
    fn drop(&mut self) {
        if !self.marker.is_null()
            && ACTIVE_MARKER
                .compare_exchange(
                    self.marker,
                    ptr::null_mut(),
                    Ordering::SeqCst,
                    Ordering::SeqCst,
                )
                .is_ok()
        {
            // SAFETY: the pointer came from `CString::into_raw` in
            // `register_marker` and was just swapped out, so nothing else
            // can reach it.
            drop(unsafe { CString::from_raw(self.marker) });
        }

        match fs::remove_file(&self.path) {
            Ok(()) => debug!("Released registry lock {}", self.path.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(
                "Failed to remove registry lock {}: {}",
                self.path.display(),
                e
            ),
        }
    }
}

/// Publish `path` to the signal handler and make sure the handler is installed.
///
/// Only one marker is published per process; a second concurrent lock (another
/// registry in the same process) is released by `Drop` alone.
fn register_marker(path: &Path) -> *mut c_char {
    let Ok(marker) = CString::new(path.as_os_str().as_bytes()) else {
        return ptr::null_mut();
    };
    let marker = marker.into_raw();
    if ACTIVE_MARKER
        .compare_exchange(ptr::null_mut(), marker, Ordering::SeqCst, Ordering::SeqCst)
        .is_err()
    {
        // SAFETY: `marker` was never published, so we still own it.
        drop(unsafe { CString::from_raw(marker) });
        return ptr::null_mut();
    }

    INSTALL_HANDLERS.call_once(|| {
        for sig in CLEANUP_SIGNALS {
            // SAFETY: the handler only performs async-signal-safe work
            // (atomic swap, unlink, signal, raise).
            let installed = unsafe { signal::signal(sig, SigHandler::Handler(release_on_signal)) };
            if let Err(e) = installed {
                warn!("Failed to install {:?} cleanup handler: {}", sig, e);
            }
        }
    });

    marker
}

extern "C" fn release_on_signal(signum: c_int) {
    let marker = ACTIVE_MARKER.swap(ptr::null_mut(), Ordering::SeqCst);
    if !marker.is_null() {
        // SAFETY: non-null markers are valid NUL-terminated strings leaked by
        // `register_marker`. The process is about to die, so it stays leaked.
        let path = unsafe { CStr::from_ptr(marker) };
        let _ = unistd::unlink(path);
    }

    if let Ok(sig) = Signal::try_from(signum) {
        // SAFETY: restoring the default disposition is async-signal-safe.
        let _ = unsafe { signal::signal(sig, SigHandler::SigDfl) };
        let _ = signal::raise(sig);
    }
}

fn holder_pid(path: &Path) -> Option<String> {
    fs::read_to_string(path)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
