//! Tree payload codec.

use crate::{ObjectId, Result, StorageError};

/// File mode recorded for a tree entry.
///
/// Modes are parsed and serialized as decimal integers, matching the
/// objects this tool itself writes. Upstream git reads the field as
/// octal; changing this breaks compatibility with our own stored trees,
/// so it stays decimal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryMode {
    /// Subdirectory (40000).
    Directory,
    /// Regular file (100644).
    Regular,
    /// Executable file (100755).
    Executable,
    /// Symbolic link (120000).
    Symlink,
    /// Anything else; retained so callers can decide what to do.
    Other(u32),
}

impl EntryMode {
    /// Maps a decimal mode value to a known mode.
    pub fn from_decimal(mode: u32) -> Self {
        match mode {
            40000 => Self::Directory,
            100644 => Self::Regular,
            100755 => Self::Executable,
            120000 => Self::Symlink,
            other => Self::Other(other),
        }
    }

    /// Returns the decimal mode value.
    pub fn as_decimal(&self) -> u32 {
        match self {
            Self::Directory => 40000,
            Self::Regular => 100644,
            Self::Executable => 100755,
            Self::Symlink => 120000,
            Self::Other(mode) => *mode,
        }
    }

    /// Type column shown for this entry in a tree listing.
    pub fn object_type(&self) -> &'static str {
        match self {
            Self::Directory => "tree",
            _ => "blob",
        }
    }
}

/// A single `(mode, name, id)` tree entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    /// Recorded file mode.
    pub mode: EntryMode,
    /// Path component (no `/`).
    pub name: String,
    /// Id of the referenced object.
    pub id: ObjectId,
}

/// Parses a tree payload into its entries.
///
/// Each entry is `<decimal-mode> <name>\0<20 raw sha bytes>`.
pub fn parse_tree(payload: &[u8]) -> Result<Vec<TreeEntry>> {
    let mut entries = Vec::new();
    let mut offset = 0;

    while offset < payload.len() {
        let space = payload[offset..]
            .iter()
            .position(|&b| b == b' ')
            .ok_or_else(|| StorageError::CorruptObject("tree entry missing mode".into()))?;
        let mode: u32 = std::str::from_utf8(&payload[offset..offset + space])
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| StorageError::CorruptObject("tree entry mode is not decimal".into()))?;
        offset += space + 1;

        let nul = payload[offset..]
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| StorageError::CorruptObject("tree entry missing name".into()))?;
        let name = String::from_utf8(payload[offset..offset + nul].to_vec())
            .map_err(|_| StorageError::CorruptObject("tree entry name is not UTF-8".into()))?;
        offset += nul + 1;

        if offset + 20 > payload.len() {
            return Err(StorageError::CorruptObject(
                "tree entry sha is missing or incomplete".into(),
            ));
        }
        let mut raw = [0u8; 20];
        raw.copy_from_slice(&payload[offset..offset + 20]);
        offset += 20;

        entries.push(TreeEntry {
            mode: EntryMode::from_decimal(mode),
            name,
            id: ObjectId::from_bytes(raw),
        });
    }

    Ok(entries)
}

/// Serializes tree entries, sorted by name ascending in byte order.
///
/// The caller wraps the result with the canonical `tree <len>\0` header.
pub fn encode_tree(mut entries: Vec<TreeEntry>) -> Vec<u8> {
    entries.sort_by(|a, b| a.name.cmp(&b.name));

    let mut out = Vec::new();
    for entry in &entries {
        out.extend_from_slice(format!("{} {}\0", entry.mode.as_decimal(), entry.name).as_bytes());
        out.extend_from_slice(entry.id.as_bytes());
    }
    out
}
