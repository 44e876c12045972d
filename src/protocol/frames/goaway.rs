//! GOAWAY frame.

use bytes::{BufMut, BytesMut};

use super::{expect_type, put_header, require_connection};
use crate::error::{ErrCode, Error, Result};
use crate::protocol::flags::Flags;
use crate::protocol::primitives::{read_u31, read_u32};
use crate::protocol::wire_format::{FrameHeader, FrameType, STREAM_ID_MASK};

/// GOAWAY frame: starts connection shutdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoAwayFrame<'a> {
    pub header: FrameHeader,
    /// Highest stream ID the sender may have processed (31 bits).
    pub last_stream_id: u32,
    pub error_code: ErrCode,
    /// Opaque diagnostic data, borrowed from the payload.
    pub debug_data: &'a [u8],
}

impl<'a> GoAwayFrame<'a> {
    pub fn new(last_stream_id: u32, error_code: ErrCode, debug_data: &'a [u8]) -> Self {
        Self {
            header: FrameHeader::new(
                FrameType::GoAway,
                Flags::empty(),
                0,
                (8 + debug_data.len()) as u32,
            ),
            last_stream_id: last_stream_id & STREAM_ID_MASK,
            error_code,
            debug_data,
        }
    }

    /// Parse a GOAWAY payload. Must be on stream 0 and at least 8 bytes.
    pub fn parse(header: &FrameHeader, payload: &'a [u8]) -> Result<Self> {
        expect_type(header, FrameType::GoAway)?;
        require_connection(header)?;
        if payload.len() < 8 {
            return Err(Error::frame_size(FrameType::GoAway, payload.len(), "at least 8"));
        }
        let (rest, _, last_stream_id) = read_u31(payload)?;
        let (debug_data, code) = read_u32(rest)?;
        Ok(Self {
            header: *header,
            last_stream_id,
            error_code: ErrCode(code),
            debug_data,
        })
    }

    pub fn encode(&self, dst: &mut BytesMut) -> Result<()> {
        put_header(dst, FrameType::GoAway, self.header.flags, 0, 8 + self.debug_data.len())?;
        dst.put_u32(self.last_stream_id & STREAM_ID_MASK);
        dst.put_u32(self.error_code.0);
        dst.put_slice(self.debug_data);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(stream_id: u32, len: usize) -> FrameHeader {
        FrameHeader::new(FrameType::GoAway, Flags::empty(), stream_id, len as u32)
    }

    #[test]
    fn test_parse_with_debug_data() {
        let payload = [0x80, 0, 0, 7, 0, 0, 0, 0xb, b'c', b'a', b'l', b'm'];
        let frame = GoAwayFrame::parse(&header(0, payload.len()), &payload).unwrap();
        assert_eq!(frame.last_stream_id, 7);
        assert_eq!(frame.error_code, ErrCode::ENHANCE_YOUR_CALM);
        assert_eq!(frame.debug_data, b"calm");
    }

    #[test]
    fn test_too_short() {
        let err = GoAwayFrame::parse(&header(0, 7), &[0; 7]).unwrap_err();
        assert!(matches!(err, Error::FrameSize { actual: 7, .. }));
        assert!(err.to_string().contains("want at least 8"));
    }

    #[test]
    fn test_nonzero_stream_rejected() {
        let err = GoAwayFrame::parse(&header(3, 8), &[0; 8]).unwrap_err();
        assert_eq!(err.code(), Some(ErrCode::PROTOCOL_ERROR));
    }

    #[test]
    fn test_encode_parses_back() {
        let mut dst = BytesMut::new();
        GoAwayFrame::new(41, ErrCode(0x77), b"bye").encode(&mut dst).unwrap();

        let hdr = FrameHeader::decode(&dst).unwrap();
        assert_eq!(hdr.length, 11);
        let frame = GoAwayFrame::parse(&hdr, &dst[9..]).unwrap();
        assert_eq!(frame.last_stream_id, 41);
        assert_eq!(frame.error_code.0, 0x77);
        assert_eq!(frame.debug_data, b"bye");
    }
}
