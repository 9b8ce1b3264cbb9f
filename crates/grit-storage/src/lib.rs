//! # Grit Storage
//!
//! Content-addressed object database for grit.
//!
//! Implements git's loose object format: zlib-compressed canonical
//! `<type> <size>\0<payload>` files keyed by SHA-1 under
//! `.git/objects/<xx>/<rest>`, plus the codecs for the three object
//! payloads the tool produces (blobs, trees, commits).

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod commit;
mod error;
mod object;
mod store;
mod tree;

pub use commit::{encode_commit, tree_hash_of, Identity};
pub use error::{Result, StorageError};
pub use object::{Object, ObjectId, ObjectKind};
pub use store::ObjectStore;
pub use tree::{encode_tree, parse_tree, EntryMode, TreeEntry};
