//! Working-tree snapshots.

use crate::Result;
use grit_storage::{encode_tree, EntryMode, ObjectId, ObjectKind, ObjectStore, TreeEntry};
use std::fs;
use std::path::Path;

/// Snapshots `dir` as a tree object, storing blobs and subtrees on the
/// way down and returning the root tree id.
///
/// `.git` is excluded. Every file is recorded as a regular file; the
/// executable bit is not sampled.
pub fn snapshot_tree(store: &ObjectStore, dir: &Path) -> Result<ObjectId> {
    let mut entries = Vec::new();

    for dir_entry in fs::read_dir(dir)? {
        let dir_entry = dir_entry?;
        let name = dir_entry.file_name().to_string_lossy().into_owned();
        let path = dir_entry.path();

        if dir_entry.file_type()?.is_dir() {
            if name == ".git" {
                continue;
            }
            let id = snapshot_tree(store, &path)?;
            entries.push(TreeEntry {
                mode: EntryMode::Directory,
                name,
                id,
            });
        } else {
            let id = store.write(ObjectKind::Blob, &fs::read(&path)?)?;
            entries.push(TreeEntry {
                mode: EntryMode::Regular,
                name,
                id,
            });
        }
    }

    Ok(store.write(ObjectKind::Tree, &encode_tree(entries))?)
}
