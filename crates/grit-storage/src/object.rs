//! Object identifiers and the canonical object model.

use crate::{Result, StorageError};
use bytes::Bytes;
use sha1::{Digest, Sha1};
use std::fmt;

/// A 20-byte SHA-1 object identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId([u8; 20]);

impl ObjectId {
    /// Creates an ObjectId from raw bytes.
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Creates an ObjectId from a 40-character lowercase hex string.
    pub fn from_hex(hex: &str) -> Result<Self> {
        if hex.len() != 40 {
            return Err(StorageError::CorruptObject(format!(
                "invalid object id length: {}",
                hex.len()
            )));
        }
        let mut bytes = [0u8; 20];
        hex::decode_to_slice(hex, &mut bytes)
            .map_err(|e| StorageError::CorruptObject(e.to_string()))?;
        Ok(Self(bytes))
    }

    /// Returns the raw bytes.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Returns the hex representation.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Computes the id of an object: SHA-1 over `<type> <size>\0<payload>`.
    pub fn for_object(kind: ObjectKind, payload: &[u8]) -> Self {
        let mut hasher = Sha1::new();
        hasher.update(format!("{} {}\0", kind.as_str(), payload.len()).as_bytes());
        hasher.update(payload);
        let digest = hasher.finalize();
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&digest);
        Self(bytes)
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.to_hex())
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Git object types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    /// File content.
    Blob,
    /// Directory listing.
    Tree,
    /// Commit object.
    Commit,
    /// Annotated tag.
    Tag,
}

impl ObjectKind {
    /// Returns the string used in object headers.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blob => "blob",
            Self::Tree => "tree",
            Self::Commit => "commit",
            Self::Tag => "tag",
        }
    }

    /// Parses an object kind from a header token.
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "blob" => Ok(Self::Blob),
            "tree" => Ok(Self::Tree),
            "commit" => Ok(Self::Commit),
            "tag" => Ok(Self::Tag),
            _ => Err(StorageError::CorruptObject(format!(
                "unknown object type: {}",
                s
            ))),
        }
    }

    /// Returns the type code used in pack files.
    pub fn pack_code(&self) -> u8 {
        match self {
            Self::Commit => 1,
            Self::Tree => 2,
            Self::Blob => 3,
            Self::Tag => 4,
        }
    }

    /// Maps a pack type code back to a kind. Delta codes (6 and 7) are
    /// handled by the pack decoder and are not kinds.
    pub fn from_pack_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Commit),
            2 => Some(Self::Tree),
            3 => Some(Self::Blob),
            4 => Some(Self::Tag),
            _ => None,
        }
    }
}

/// A git object: identity, kind, and uncompressed payload.
#[derive(Debug, Clone)]
pub struct Object {
    /// The object's SHA-1 identifier.
    pub id: ObjectId,
    /// The kind of object.
    pub kind: ObjectKind,
    /// The payload (uncompressed, without the canonical header).
    pub payload: Bytes,
}

impl Object {
    /// Creates an object, computing its id from the payload.
    pub fn new(kind: ObjectKind, payload: impl Into<Bytes>) -> Self {
        let payload = payload.into();
        let id = ObjectId::for_object(kind, &payload);
        Self { id, kind, payload }
    }

    /// Creates a blob object from file content.
    pub fn blob(content: impl Into<Bytes>) -> Self {
        Self::new(ObjectKind::Blob, content)
    }

    /// Returns the canonical form: `<type> <size>\0<payload>`.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut out = format!("{} {}\0", self.kind.as_str(), self.payload.len()).into_bytes();
        out.extend_from_slice(&self.payload);
        out
    }
}
