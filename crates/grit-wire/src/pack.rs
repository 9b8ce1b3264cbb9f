//! Packfile verification and decoding.
//!
//! Packs are walked record by record. Whole objects go straight to the
//! store in pack order; ref-deltas are buffered and resolved once their
//! bases are visible. See: https://git-scm.com/docs/pack-format

use crate::delta::apply_delta;
use crate::{Result, WireError};
use flate2::read::ZlibDecoder;
use grit_storage::{ObjectKind, ObjectStore};
use sha1::{Digest, Sha1};
use std::io::Read;

/// Magic bytes at the start of a pack file.
const PACK_MAGIC: &[u8; 4] = b"PACK";
/// SHA-1 checksum trailing every pack.
const TRAILER_LEN: usize = 20;

const OBJ_OFS_DELTA: u8 = 6;
const OBJ_REF_DELTA: u8 = 7;

/// A ref-delta waiting for its base to appear in the store.
struct PendingDelta {
    base_hex: String,
    data: Vec<u8>,
}

/// Validates the pack envelope and returns the declared object count.
///
/// A well-formed pack is at least 32 bytes: magic, version 2 or 3,
/// object count, and a trailing SHA-1 of everything before it.
pub fn verify(pack: &[u8]) -> Result<u32> {
    if pack.len() < 32 {
        return Err(WireError::BadPackfile(
            "shorter than the minimum envelope".into(),
        ));
    }

    let (body, checksum) = pack.split_at(pack.len() - TRAILER_LEN);
    if Sha1::digest(body).as_slice() != checksum {
        return Err(WireError::BadPackfile("checksum mismatch".into()));
    }

    if &body[..4] != PACK_MAGIC {
        return Err(WireError::BadPackfile("missing PACK magic".into()));
    }
    let version = u32::from_be_bytes([body[4], body[5], body[6], body[7]]);
    if version != 2 && version != 3 {
        return Err(WireError::BadPackfile(format!(
            "unsupported version {version}"
        )));
    }

    Ok(u32::from_be_bytes([body[8], body[9], body[10], body[11]]))
}

/// Reads a packed object header: 3-bit type code and a size packed into
/// the low nibble plus 7-bit continuation groups.
pub(crate) fn read_object_header(buf: &[u8]) -> Result<(u64, u8, usize)> {
    let mut used = 0;
    let mut byte = *buf.get(used).ok_or(WireError::BadHeader)?;
    used += 1;

    let code = (byte >> 4) & 0x7;
    let mut size = (byte & 0xF) as u64;
    let mut shift = 4;

    while byte & 0x80 != 0 {
        if shift >= 64 {
            return Err(WireError::BadHeader);
        }
        byte = *buf.get(used).ok_or(WireError::BadHeader)?;
        used += 1;
        size |= ((byte & 0x7F) as u64) << shift;
        shift += 7;
    }

    Ok((size, code, used))
}

/// Reads a plain size varint (7 bits per byte, LSB first).
pub(crate) fn read_size(buf: &[u8]) -> Result<(u64, usize)> {
    let mut used = 0;
    let mut byte = *buf.get(used).ok_or(WireError::BadHeader)?;
    used += 1;

    let mut size = (byte & 0x7F) as u64;
    let mut shift = 7;

    while byte & 0x80 != 0 {
        if shift >= 64 {
            return Err(WireError::BadHeader);
        }
        byte = *buf.get(used).ok_or(WireError::BadHeader)?;
        used += 1;
        size |= ((byte & 0x7F) as u64) << shift;
        shift += 7;
    }

    Ok((size, used))
}

/// Inflates one zlib stream from the front of `buf`, returning the
/// payload and the number of compressed bytes consumed.
fn inflate(buf: &[u8]) -> Result<(Vec<u8>, usize)> {
    let mut decoder = ZlibDecoder::new(buf);
    let mut payload = Vec::new();
    decoder
        .read_to_end(&mut payload)
        .map_err(|e| WireError::BadPackfile(format!("inflate failed: {e}")))?;
    let used = decoder.total_in() as usize;
    Ok((payload, used))
}

/// Decodes `pack` into `store` and returns the number of objects in the
/// pack. Whole objects are written in pack order; ref-deltas resolve
/// after the walk, in dependency order.
pub fn unpack_into(store: &ObjectStore, pack: &[u8]) -> Result<u32> {
    let declared_count = verify(pack)?;
    let body = &pack[..pack.len() - TRAILER_LEN];

    let mut pos = 12;
    let mut objects_read = 0u32;
    let mut pending: Vec<PendingDelta> = Vec::new();

    while pos < body.len() {
        objects_read += 1;
        let (size, code, used) = read_object_header(&body[pos..])?;
        pos += used;

        match code {
            OBJ_OFS_DELTA => {
                let (_offset, used) = read_size(&body[pos..])?;
                pos += used;
                let (payload, used) = inflate(&body[pos..])?;
                pos += used;
                if payload.len() as u64 != size {
                    return Err(WireError::BadPackfile(format!(
                        "delta payload is {} bytes, header declares {size}",
                        payload.len()
                    )));
                }
                return Err(WireError::UnsupportedOfsDelta);
            }
            OBJ_REF_DELTA => {
                let base = body.get(pos..pos + 20).ok_or_else(|| {
                    WireError::BadPackfile("ref-delta base id truncated".into())
                })?;
                let base_hex = hex::encode(base);
                pos += 20;

                let (payload, used) = inflate(&body[pos..])?;
                pos += used;
                if payload.len() as u64 != size {
                    return Err(WireError::BadPackfile(format!(
                        "delta payload is {} bytes, header declares {size}",
                        payload.len()
                    )));
                }
                pending.push(PendingDelta {
                    base_hex,
                    data: payload,
                });
            }
            other => {
                let kind = ObjectKind::from_pack_code(other)
                    .ok_or(WireError::InvalidObjectType(other))?;
                let (payload, used) = inflate(&body[pos..])?;
                pos += used;
                if payload.len() as u64 != size {
                    return Err(WireError::BadPackfile(format!(
                        "object payload is {} bytes, header declares {size}",
                        payload.len()
                    )));
                }
                store.write(kind, &payload)?;
            }
        }
    }

    if objects_read != declared_count {
        return Err(WireError::BadPackfile(format!(
            "header declares {declared_count} objects, stream has {objects_read}"
        )));
    }

    resolve_pending(store, pending)?;
    Ok(objects_read)
}

/// Fixed-point sweep over buffered ref-deltas.
///
/// Each pass applies every delta whose base is visible in the store and
/// writes the result under the base's kind. A pass that makes no
/// progress while entries remain means a base never arrived.
fn resolve_pending(store: &ObjectStore, mut pending: Vec<PendingDelta>) -> Result<()> {
    while !pending.is_empty() {
        let mut unresolved = Vec::new();
        let mut progressed = false;

        for entry in pending {
            if store.exists(&entry.base_hex) {
                let (kind, base) = store.read(&entry.base_hex)?;
                let target = apply_delta(&base, &entry.data)?;
                store.write(kind, &target)?;
                progressed = true;
            } else {
                unresolved.push(entry);
            }
        }

        if !progressed {
            return Err(WireError::UnresolvableDeltas(unresolved.len()));
        }
        pending = unresolved;
    }
    Ok(())
}
