//! On-disk object database.

use crate::{Object, ObjectId, ObjectKind, Result, StorageError};
use bytes::Bytes;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::fs;
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

/// Content-addressed object database rooted at a `.git` directory.
///
/// Writes are idempotent: an object's content determines its path, so
/// re-writing an existing object is a no-op in effect.
#[derive(Debug, Clone)]
pub struct ObjectStore {
    git_dir: PathBuf,
}

impl ObjectStore {
    /// Creates a store handle. Nothing is touched on disk until the
    /// first write.
    pub fn new(git_dir: impl Into<PathBuf>) -> Self {
        Self {
            git_dir: git_dir.into(),
        }
    }

    fn object_path(&self, hex: &str) -> PathBuf {
        self.git_dir.join("objects").join(&hex[..2]).join(&hex[2..])
    }

    /// Returns the `.git` directory this store is rooted at.
    pub fn git_dir(&self) -> &Path {
        &self.git_dir
    }

    /// Returns true if the object is present as a regular file.
    pub fn exists(&self, hex: &str) -> bool {
        hex.len() == 40 && self.object_path(hex).is_file()
    }

    /// Writes an object, returning its id.
    pub fn write(&self, kind: ObjectKind, payload: &[u8]) -> Result<ObjectId> {
        let object = Object::new(kind, payload.to_vec());
        let hex = object.id.to_hex();

        let dir = self.git_dir.join("objects").join(&hex[..2]);
        fs::create_dir_all(&dir)?;

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&object.canonical_bytes())?;
        let compressed = encoder.finish()?;
        fs::write(dir.join(&hex[2..]), compressed)?;

        Ok(object.id)
    }

    /// Reads an object, returning its kind and payload.
    ///
    /// The header is validated on the way out: the declared size must
    /// match the payload length and the type must be known.
    pub fn read(&self, hex: &str) -> Result<(ObjectKind, Bytes)> {
        if hex.len() != 40 {
            return Err(StorageError::ObjectNotFound(hex.to_string()));
        }
        let compressed = fs::read(self.object_path(hex)).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                StorageError::ObjectNotFound(hex.to_string())
            } else {
                StorageError::Io(e)
            }
        })?;

        let mut decoder = ZlibDecoder::new(&compressed[..]);
        let mut data = Vec::new();
        decoder
            .read_to_end(&mut data)
            .map_err(|e| StorageError::CorruptObject(format!("inflate failed: {e}")))?;

        let nul = data
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| StorageError::CorruptObject("missing header terminator".into()))?;
        let header = std::str::from_utf8(&data[..nul])
            .map_err(|_| StorageError::CorruptObject("header is not UTF-8".into()))?;
        let (kind_str, size_str) = header
            .split_once(' ')
            .ok_or_else(|| StorageError::CorruptObject(format!("malformed header: {header}")))?;

        let kind = ObjectKind::parse(kind_str)?;
        let size: usize = size_str
            .parse()
            .map_err(|_| StorageError::CorruptObject(format!("invalid size: {size_str}")))?;

        let payload = Bytes::from(data).slice(nul + 1..);
        if payload.len() != size {
            return Err(StorageError::CorruptObject(format!(
                "header declares {size} bytes, payload has {}",
                payload.len()
            )));
        }

        Ok((kind, payload))
    }
}
