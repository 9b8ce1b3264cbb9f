//! # Grit Repo
//!
//! Repository-level operations: the `.git` skeleton, working-tree
//! snapshots, checkout, and the smart-HTTP clone pipeline.

#![forbid(unsafe_code)]

mod checkout;
mod clone;
mod error;
mod layout;
mod snapshot;

pub use checkout::{checkout_commit, checkout_tree};
pub use clone::clone;
pub use error::{RepoError, Result};
pub use layout::GitDir;
pub use snapshot::snapshot_tree;
