//! On-disk repository layout.

use crate::Result;
use grit_storage::ObjectStore;
use std::fs;
use std::path::{Path, PathBuf};

const HEAD_CONTENTS: &str = "ref: refs/heads/main\n";

/// Handle to a repository's `.git` directory.
#[derive(Debug, Clone)]
pub struct GitDir {
    path: PathBuf,
}

impl GitDir {
    /// Points at `<workdir>/.git` without touching the filesystem.
    pub fn at(workdir: impl AsRef<Path>) -> Self {
        Self {
            path: workdir.as_ref().join(".git"),
        }
    }

    /// Creates the repository skeleton under `<workdir>/.git`:
    /// `objects/`, `refs/`, and a `HEAD` pointing at `refs/heads/main`.
    /// Idempotent.
    pub fn init(workdir: impl AsRef<Path>) -> Result<Self> {
        let git_dir = Self::at(workdir);
        fs::create_dir_all(git_dir.path.join("objects"))?;
        fs::create_dir_all(git_dir.path.join("refs"))?;
        fs::write(git_dir.path.join("HEAD"), HEAD_CONTENTS)?;
        Ok(git_dir)
    }

    /// Path of the `.git` directory itself.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Opens the object database under this directory.
    pub fn store(&self) -> ObjectStore {
        ObjectStore::new(&self.path)
    }
}
