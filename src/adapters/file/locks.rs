//! Per-key write locks shared between processes
//!
//! Every key gets a lock file under `<root>/locks/`. Writers hold an exclusive
//! advisory lock on it, so a server and an admin CLI touching the same record
//! run one after the other. Nothing is kept in memory per key.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use fs4::fs_std::FileExt as _;

use crate::core::StoreError;

const LOCKS_DIR: &str = "locks";
const LOCK_EXT: &str = "lock";

/// Directory of lock files
#[derive(Debug)]
pub(crate) struct KeyLocks {
    dir: PathBuf,
}

/// An exclusive lock on one key, released on drop
#[derive(Debug)]
pub(crate) struct KeyLock {
    _file: File,
}

impl KeyLocks {
    /// Open (and create if needed) the lock directory under `root`
    pub(crate) fn open(root: &Path) -> Result<Self, StoreError> {
        let dir = root.join(LOCKS_DIR);
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Block until this process holds the lock for `file_stem`
    pub(crate) fn lock(&self, file_stem: &str) -> Result<KeyLock, StoreError> {
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.dir.join(format!("{file_stem}.{LOCK_EXT}")))?;
        file.lock_exclusive()?;
        Ok(KeyLock { _file: file })
    }

    #[cfg(test)]
    fn count(&self) -> usize {
        fs::read_dir(&self.dir).map_or(0, Iterator::count)
    }
}
