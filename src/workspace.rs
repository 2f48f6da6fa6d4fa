//! The local clone every operation works in.
//!
//! A workspace is the single directory `mirror-repo` under the directory the
//! tool was started from. It is derived, never stored: two `Workspace` values
//! built from the same base directory refer to the same clone. Running two
//! invocations from the same directory at once is unsupported because they
//! would share this path.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{Error, Result};

/// Name of the clone directory, relative to the base directory.
pub const WORKSPACE_DIR: &str = "mirror-repo";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    base: PathBuf,
}

impl Workspace {
    /// Workspace rooted at the process's current directory.
    pub fn in_current_dir() -> Result<Self> {
        Ok(Self::at(std::env::current_dir()?))
    }

    /// Workspace rooted at `base`.
    pub fn at(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Directory the clone is created from.
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Absolute path of the clone, `<base>/mirror-repo`.
    pub fn path(&self) -> PathBuf {
        self.base.join(WORKSPACE_DIR)
    }

    /// Remove the clone and everything in it.
    ///
    /// Returns whether anything was removed; a missing directory is not an
    /// error.
    pub fn cleanup(&self) -> Result<bool> {
        let path = self.path();
        let metadata = match fs::symlink_metadata(&path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
            Err(source) => return Err(Error::Workspace { path, source }),
        };

        // A stray file or symlink at the workspace path is removed too
        let removed = if metadata.is_dir() {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
        match removed {
            Ok(()) => {
                debug!("Removed workspace {}", path.display());
                Ok(true)
            }
            Err(source) => Err(Error::Workspace { path, source }),
        }
    }
}
