//! # Log File Locking
//!
//! Serializes overlapping rounds that touch the same timestamp log.
//!
//! Uses `fs2` for cross-platform advisory locking (flock on Unix, LockFile on
//! Windows). Appends take the lock exclusively, reads take it shared. The lock
//! lives for one open/access/close sequence and is released on drop (RAII).
//! Without the `locking` feature the guard is a no-op.

use std::fs::File;
use std::path::Path;

use crate::errors::LogError;

/// Scoped advisory lock on an open log file.
pub(crate) struct LogLock<'a> {
    #[cfg_attr(not(feature = "locking"), allow(dead_code))]
    file: &'a File,
}

#[cfg(feature = "locking")]
impl<'a> LogLock<'a> {
    /// Blocks until no other handle holds any lock on `file`.
    pub(crate) fn exclusive(file: &'a File, path: &Path) -> Result<Self, LogError> {
        fs2::FileExt::lock_exclusive(file).map_err(|source| LogError::Lock {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self { file })
    }

    /// Blocks until no other handle holds an exclusive lock on `file`.
    pub(crate) fn shared(file: &'a File, path: &Path) -> Result<Self, LogError> {
        fs2::FileExt::lock_shared(file).map_err(|source| LogError::Lock {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self { file })
    }
}

#[cfg(feature = "locking")]
impl Drop for LogLock<'_> {
    fn drop(&mut self) {
        // Closing the handle releases the lock too
        let _ = fs2::FileExt::unlock(self.file);
    }
}

#[cfg(not(feature = "locking"))]
impl<'a> LogLock<'a> {
    pub(crate) fn exclusive(file: &'a File, _path: &Path) -> Result<Self, LogError> {
        Ok(Self { file })
    }

    pub(crate) fn shared(file: &'a File, _path: &Path) -> Result<Self, LogError> {
        Ok(Self { file })
    }
}

// =============================================================================
// TESTS
// =============================================================================
