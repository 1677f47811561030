//! Single-instance lock file.
//!
//! Presence of the file means a pass is running. The file is created
//! exclusively, so two processes racing for it cannot both win.

use std::fs::{self, OpenOptions};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors from lock operations.
#[derive(Debug, Error)]
pub enum LockError {
    #[error("Lock file already exists: {}", .0.display())]
    AlreadyRunning(PathBuf),

    #[error("Failed to create lock file {}: {source}", .path.display())]
    CreateFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A guard owning the lock file.
///
/// The file is removed when the guard is dropped, on every exit path that
/// unwinds.
pub struct InstanceLock {
    path: PathBuf,
    released: bool,
}

impl InstanceLock {
    /// Create the lock file, failing if it already exists.
    pub fn acquire(path: impl Into<PathBuf>) -> Result<Self, LockError> {
        let path = path.into();

        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(LockError::AlreadyRunning(path));
            }
            Err(source) => return Err(LockError::CreateFailed { path, source }),
        };

        // Holder pid, for whoever finds a stale lock
        if let Err(e) = writeln!(file, "{}", std::process::id()) {
            tracing::debug!(path = %path.display(), error = %e, "Failed to write pid to lock file");
        }

        Ok(Self {
            path,
            released: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the lock file now, reporting failure.
    pub fn release(mut self) -> io::Result<()> {
        self.released = true;
        remove_lock_file(&self.path)
    }
}

fn remove_lock_file(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

impl Drop for InstanceLock {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        tracing::debug!(path = %self.path.display(), "Releasing instance lock");
        if let Err(e) = remove_lock_file(&self.path) {
            tracing::warn!(path = %self.path.display(), error = %e, "Failed to remove lock file");
        }
    }
}

impl std::fmt::Debug for InstanceLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstanceLock")
            .field("path", &self.path)
            .finish()
    }
}
