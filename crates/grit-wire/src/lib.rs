//! # Grit Wire
//!
//! Git wire formats: pkt-line framing, the v2/v3 pack format with
//! ref-delta resolution, and the client side of the smart HTTP protocol.

#![forbid(unsafe_code)]

mod delta;
mod error;
mod http;
mod pack;
mod pktline;

pub use delta::apply_delta;
pub use error::{Result, WireError};
pub use http::{discover_head, fetch_pack};
pub use pack::{unpack_into, verify};
pub use pktline::PktLine;
