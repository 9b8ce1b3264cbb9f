//! Git pkt-line framing.
//!
//! Each frame is a 4-digit hex length (counting the prefix itself)
//! followed by the payload; `0000` is the flush packet.

use crate::{Result, WireError};

/// A single decoded pkt-line frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PktLine {
    /// Data frame. A trailing newline has been stripped.
    Data(Vec<u8>),
    /// Flush packet (`0000`).
    Flush,
}

impl PktLine {
    /// Decodes one frame from the front of `buf`, returning the number
    /// of bytes consumed alongside the frame.
    pub fn parse(buf: &[u8]) -> Result<(usize, PktLine)> {
        if buf.len() < 4 {
            return Err(WireError::BadPktLine("truncated length prefix".into()));
        }
        let declared = std::str::from_utf8(&buf[..4])
            .ok()
            .and_then(|s| usize::from_str_radix(s, 16).ok())
            .ok_or_else(|| WireError::BadPktLine("length prefix is not hex".into()))?;

        if declared == 0 {
            return Ok((4, PktLine::Flush));
        }
        if declared < 4 {
            return Err(WireError::BadPktLine(format!(
                "declared length {declared} is below the prefix size"
            )));
        }
        if buf.len() < declared {
            return Err(WireError::BadPktLine(format!(
                "declared length {declared} exceeds remaining {} bytes",
                buf.len()
            )));
        }

        let mut data = &buf[4..declared];
        if data.last() == Some(&b'\n') {
            data = &data[..data.len() - 1];
        }
        Ok((declared, PktLine::Data(data.to_vec())))
    }

    /// Decodes every frame in `buf`.
    pub fn parse_all(buf: &[u8]) -> Result<Vec<PktLine>> {
        let mut frames = Vec::new();
        let mut rest = buf;
        while !rest.is_empty() {
            let (used, frame) = PktLine::parse(rest)?;
            rest = &rest[used..];
            frames.push(frame);
        }
        Ok(frames)
    }

    /// Returns true if this is a flush packet.
    pub fn is_flush(&self) -> bool {
        matches!(self, Self::Flush)
    }

    /// Returns the data payload, or None for flush.
    pub fn data(&self) -> Option<&[u8]> {
        match self {
            Self::Data(data) => Some(data),
            Self::Flush => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flush() {
        let (used, frame) = PktLine::parse(b"0000trailing").unwrap();
        assert_eq!(used, 4);
        assert!(frame.is_flush());
        assert_eq!(frame.data(), None);
    }

    #[test]
    fn test_data_strips_newline() {
        let (used, frame) = PktLine::parse(b"000ahello\n").unwrap();
        assert_eq!(used, 10);
        assert_eq!(frame.data(), Some(b"hello".as_slice()));
    }

    #[test]
    fn test_data_without_newline() {
        let (used, frame) = PktLine::parse(b"0009hello").unwrap();
        assert_eq!(used, 9);
        assert_eq!(frame.data(), Some(b"hello".as_slice()));
    }

    #[test]
    fn test_truncated_prefix() {
        assert!(matches!(
            PktLine::parse(b"00"),
            Err(WireError::BadPktLine(_))
        ));
    }

    #[test]
    fn test_truncated_payload() {
        assert!(matches!(
            PktLine::parse(b"0020short"),
            Err(WireError::BadPktLine(_))
        ));
    }

    #[test]
    fn test_length_below_prefix() {
        assert!(matches!(
            PktLine::parse(b"0003xxx"),
            Err(WireError::BadPktLine(_))
        ));
    }

    #[test]
    fn test_non_hex_prefix() {
        assert!(matches!(
            PktLine::parse(b"zzzzdata"),
            Err(WireError::BadPktLine(_))
        ));
    }

    #[test]
    fn test_parse_all() {
        let frames = PktLine::parse_all(b"000ahello\n0000000aworld\n").unwrap();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].data(), Some(b"hello".as_slice()));
        assert!(frames[1].is_flush());
        assert_eq!(frames[2].data(), Some(b"world".as_slice()));
    }
}
