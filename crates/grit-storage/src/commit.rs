//! Commit payload assembly and header extraction.

use crate::{Result, StorageError};
use chrono::Local;

/// Author/committer identity, supplied by the caller as opaque strings.
#[derive(Debug, Clone)]
pub struct Identity {
    /// Display name.
    pub name: String,
    /// Email address (written between angle brackets).
    pub email: String,
}

impl Identity {
    /// Creates an identity.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// Builds a commit payload.
///
/// The `parent` line is omitted entirely when there is no parent; at most
/// one parent is supported. The signature timestamp is the local clock
/// with its UTC offset (`±HHMM`) at encode time.
pub fn encode_commit(
    tree_hex: &str,
    parent_hex: Option<&str>,
    identity: &Identity,
    message: &str,
) -> Vec<u8> {
    let now = Local::now();
    let signature = format!(
        "{} <{}> {} {}",
        identity.name,
        identity.email,
        now.timestamp(),
        now.format("%z")
    );

    let mut payload = format!("tree {tree_hex}\n");
    if let Some(parent) = parent_hex {
        payload.push_str(&format!("parent {parent}\n"));
    }
    payload.push_str(&format!("author {signature}\n"));
    payload.push_str(&format!("committer {signature}\n\n"));
    payload.push_str(message);
    payload.push('\n');
    payload.into_bytes()
}

/// Extracts the root tree hash from a commit payload.
///
/// Commit payloads begin with a `tree <40-hex>` line.
pub fn tree_hash_of(payload: &[u8]) -> Result<String> {
    let line_end = payload
        .iter()
        .position(|&b| b == b'\n')
        .unwrap_or(payload.len());
    let line = std::str::from_utf8(&payload[..line_end])
        .map_err(|_| StorageError::CorruptObject("commit header is not UTF-8".into()))?;

    let hex = line
        .strip_prefix("tree ")
        .ok_or_else(|| StorageError::CorruptObject("commit payload has no tree line".into()))?;
    if hex.len() != 40 {
        return Err(StorageError::CorruptObject(format!(
            "commit tree hash has length {}",
            hex.len()
        )));
    }
    Ok(hex.to_string())
}
