//! Smart HTTP transport: ref discovery and upload-pack fetch.
//!
//! See: https://git-scm.com/docs/http-protocol

use crate::pktline::PktLine;
use crate::{Result, WireError};
use std::io::Read;
use std::time::Duration;

const UPLOAD_PACK_REQUEST: &str = "application/x-git-upload-pack-request";

fn client() -> Result<reqwest::blocking::Client> {
    Ok(reqwest::blocking::Client::builder()
        .user_agent(concat!("grit/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(30))
        .build()?)
}

/// Discovers the clone target: the advertised hash of `refs/heads/main`,
/// with `refs/heads/master` as fallback.
pub fn discover_head(url: &str) -> Result<String> {
    let advertisement = client()?
        .get(format!("{url}/info/refs?service=git-upload-pack"))
        .send()?
        .error_for_status()?
        .bytes()?;
    select_head(&advertisement)
}

/// Parses a refs advertisement and selects the target hash.
///
/// The first pkt-line is the service header and is skipped. Each
/// remaining data frame is `<40-hex> <refname>`, with the first ref
/// carrying a NUL-separated capability list that is discarded here.
fn select_head(advertisement: &[u8]) -> Result<String> {
    let frames = PktLine::parse_all(advertisement)?;
    let mut master = None;

    for frame in frames.iter().skip(1) {
        let Some(data) = frame.data() else { continue };
        if data.is_empty() {
            continue;
        }

        let line = data.split(|&b| b == 0).next().unwrap_or(data);
        let line = String::from_utf8_lossy(line);
        let mut tokens = line.split_whitespace();
        let (Some(hash), Some(refname)) = (tokens.next(), tokens.next()) else {
            continue;
        };

        match refname {
            "refs/heads/main" => return Ok(hash.to_string()),
            "refs/heads/master" => master = Some(hash.to_string()),
            _ => {}
        }
    }

    master.ok_or(WireError::NoTarget)
}

/// Fetches the packfile for `want` via a want/done exchange.
///
/// The response opens with a `NAK` pkt-line, which is consumed; the
/// remainder is the raw packfile.
pub fn fetch_pack(url: &str, want: &str) -> Result<Vec<u8>> {
    let body = format!("0032want {want}\n00000009done\n");
    let mut response = client()?
        .post(format!("{url}/git-upload-pack"))
        .header("Content-Type", UPLOAD_PACK_REQUEST)
        .body(body)
        .send()?
        .error_for_status()?;

    let mut raw = Vec::new();
    response.read_to_end(&mut raw)?;

    let (used, ack) = PktLine::parse(&raw)?;
    if ack.data() != Some(b"NAK".as_slice()) {
        return Err(WireError::BadPktLine(
            "upload-pack response does not begin with NAK".into(),
        ));
    }
    Ok(raw.split_off(used))
}
