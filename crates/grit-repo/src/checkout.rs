//! Working-tree materialization.

use crate::{RepoError, Result};
use grit_storage::{parse_tree, tree_hash_of, EntryMode, ObjectKind, ObjectStore};
use std::fs;
use std::path::Path;

/// Materializes the tree of `commit_hex` under `dir`.
pub fn checkout_commit(store: &ObjectStore, commit_hex: &str, dir: &Path) -> Result<()> {
    let (kind, payload) = store.read(commit_hex)?;
    if kind != ObjectKind::Commit {
        return Err(RepoError::NotACommit(commit_hex.to_string()));
    }
    let tree_hex = tree_hash_of(&payload)?;
    checkout_tree(store, &tree_hex, dir)
}

/// Recursively writes the contents of `tree_hex` under `dir`.
///
/// Files are written with mode 0644 regardless of the recorded tree
/// mode. Symbolic links and unknown modes are skipped.
pub fn checkout_tree(store: &ObjectStore, tree_hex: &str, dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)?;

    let (kind, payload) = store.read(tree_hex)?;
    if kind != ObjectKind::Tree {
        return Err(RepoError::NotATree(tree_hex.to_string()));
    }

    for entry in parse_tree(&payload)? {
        let target = dir.join(&entry.name);
        let hex = entry.id.to_hex();

        match entry.mode {
            EntryMode::Directory => checkout_tree(store, &hex, &target)?,
            EntryMode::Regular | EntryMode::Executable => {
                let (kind, blob) = store.read(&hex)?;
                if kind != ObjectKind::Blob {
                    return Err(RepoError::NotABlob(hex));
                }
                fs::write(&target, &blob)?;
            }
            EntryMode::Symlink | EntryMode::Other(_) => {
                tracing::debug!(name = %entry.name, mode = ?entry.mode, "skipping unsupported entry mode");
            }
        }
    }

    Ok(())
}
