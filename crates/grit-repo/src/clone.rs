//! Smart-HTTP clone pipeline.

use crate::checkout::checkout_commit;
use crate::layout::GitDir;
use crate::Result;
use std::fs;
use std::path::Path;

/// Clones `url` into `dir`: ref discovery, pack fetch, pack decode,
/// working-tree checkout.
///
/// Failures abort immediately and leave any objects already written in
/// place; writes are content-addressed, so a retry picks up where the
/// failed attempt stopped.
pub fn clone(url: &str, dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)?;
    let git_dir = GitDir::init(dir)?;
    let store = git_dir.store();

    let head = grit_wire::discover_head(url)?;
    tracing::info!(url = %url, head = %head, "discovered clone target");

    let pack = grit_wire::fetch_pack(url, &head)?;
    tracing::debug!(bytes = pack.len(), "fetched packfile");

    let objects = grit_wire::unpack_into(&store, &pack)?;
    tracing::info!(objects, "unpacked objects");

    checkout_commit(&store, &head, dir)
}
