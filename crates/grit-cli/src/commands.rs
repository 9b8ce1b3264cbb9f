//! CLI command implementations.

use grit_repo::GitDir;
use grit_storage::{encode_commit, parse_tree, Identity, ObjectKind};
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Identity recorded on commits created by `commit-tree`. Identity
/// configuration is out of scope, so this is compiled in.
const COMMITTER_NAME: &str = "Grit User";
const COMMITTER_EMAIL: &str = "grit@localhost";

/// CLI errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Unsupported flag combination.
    #[error("usage: {0}")]
    Usage(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Object database failure.
    #[error("{0}")]
    Storage(#[from] grit_storage::StorageError),

    /// Repository operation failure.
    #[error("{0}")]
    Repo(#[from] grit_repo::RepoError),
}

/// Result type for CLI commands.
pub type Result<T> = std::result::Result<T, CliError>;

/// Initialize the repository skeleton in the current directory.
pub fn init() -> Result<()> {
    GitDir::init(".")?;
    println!("Initialized git directory");
    Ok(())
}

/// Print an object's payload to stdout.
pub fn cat_file(hash: &str, pretty: bool) -> Result<()> {
    if !pretty {
        return Err(CliError::Usage("cat-file requires -p".into()));
    }
    let store = GitDir::at(".").store();
    let (_, payload) = store.read(hash)?;
    std::io::stdout().write_all(&payload)?;
    Ok(())
}

/// Store a file as a blob and print its hash.
pub fn hash_object(path: &str) -> Result<()> {
    let store = GitDir::at(".").store();
    let id = store.write(ObjectKind::Blob, &std::fs::read(path)?)?;
    println!("{id}");
    Ok(())
}

/// Print the entries of a tree object.
pub fn ls_tree(hash: &str, name_only: bool) -> Result<()> {
    let store = GitDir::at(".").store();
    let (kind, payload) = store.read(hash)?;
    if kind != ObjectKind::Tree {
        return Err(grit_repo::RepoError::NotATree(hash.to_string()).into());
    }

    for entry in parse_tree(&payload)? {
        if name_only {
            println!("{}", entry.name);
        } else {
            println!(
                "{:06} {} {}  {}",
                entry.mode.as_decimal(),
                entry.mode.object_type(),
                entry.id,
                entry.name
            );
        }
    }
    Ok(())
}

/// Snapshot the working directory as a tree and print its hash.
pub fn write_tree() -> Result<()> {
    let store = GitDir::at(".").store();
    let id = grit_repo::snapshot_tree(&store, Path::new("."))?;
    println!("{id}");
    Ok(())
}

/// Create a commit object and print its hash.
pub fn commit_tree(tree: &str, message: &str, parent: Option<&str>) -> Result<()> {
    let store = GitDir::at(".").store();
    let identity = Identity::new(COMMITTER_NAME, COMMITTER_EMAIL);
    let payload = encode_commit(tree, parent, &identity, message);
    let id = store.write(ObjectKind::Commit, &payload)?;
    print!("{id}");
    Ok(())
}

/// Clone a repository over smart HTTP.
pub fn clone(url: &str, dir: &str) -> Result<()> {
    tracing::info!(url = %url, dir = %dir, "cloning repository");
    grit_repo::clone(url, Path::new(dir))?;
    Ok(())
}
