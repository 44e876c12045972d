//! PING frame.

use bytes::{BufMut, BytesMut};

use super::{expect_type, put_header, require_connection};
use crate::error::{Error, Result};
use crate::protocol::flags::{self, Flags};
use crate::protocol::wire_format::{FrameHeader, FrameType};

/// Size of the opaque PING payload.
pub const PING_PAYLOAD_LEN: usize = 8;

/// PING frame: 8 opaque bytes echoed back with ACK set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PingFrame {
    pub header: FrameHeader,
    pub data: [u8; PING_PAYLOAD_LEN],
}

impl PingFrame {
    pub fn new(data: [u8; PING_PAYLOAD_LEN]) -> Self {
        Self {
            header: FrameHeader::new(FrameType::Ping, Flags::empty(), 0, PING_PAYLOAD_LEN as u32),
            data,
        }
    }

    /// Build the ACK answering this ping.
    pub fn pong(&self) -> Self {
        Self {
            header: FrameHeader::new(FrameType::Ping, flags::ACK, 0, PING_PAYLOAD_LEN as u32),
            data: self.data,
        }
    }

    /// Parse a PING payload. Must be on stream 0 and exactly 8 bytes.
    pub fn parse(header: &FrameHeader, payload: &[u8]) -> Result<Self> {
        expect_type(header, FrameType::Ping)?;
        require_connection(header)?;
        let data: [u8; PING_PAYLOAD_LEN] = payload
            .try_into()
            .map_err(|_| Error::frame_size(FrameType::Ping, payload.len(), "8"))?;
        Ok(Self {
            header: *header,
            data,
        })
    }

    #[inline]
    pub fn is_ack(&self) -> bool {
        self.header.has_flag(flags::ACK)
    }

    pub fn encode(&self, dst: &mut BytesMut) -> Result<()> {
        put_header(dst, FrameType::Ping, self.header.flags, 0, PING_PAYLOAD_LEN)?;
        dst.put_slice(&self.data);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrCode;

    fn header(flags: Flags, stream_id: u32, len: usize) -> FrameHeader {
        FrameHeader::new(FrameType::Ping, flags, stream_id, len as u32)
    }

    #[test]
    fn test_parse() {
        let payload = *b"12345678";
        let frame = PingFrame::parse(&header(Flags::empty(), 0, 8), &payload).unwrap();
        assert_eq!(&frame.data, b"12345678");
        assert!(!frame.is_ack());

        let pong = frame.pong();
        assert!(pong.is_ack());
        assert_eq!(pong.data, frame.data);
    }

    #[test]
    fn test_wrong_size() {
        let err = PingFrame::parse(&header(Flags::empty(), 0, 7), &[0; 7]).unwrap_err();
        assert!(matches!(err, Error::FrameSize { actual: 7, .. }));
        assert_eq!(err.code(), Some(ErrCode::FRAME_SIZE_ERROR));
    }

    #[test]
    fn test_nonzero_stream_rejected() {
        let err = PingFrame::parse(&header(Flags::empty(), 1, 8), &[0; 8]).unwrap_err();
        assert!(matches!(err, Error::Connection { .. }));
    }

    #[test]
    fn test_encode() {
        let mut dst = BytesMut::new();
        PingFrame::new([1, 2, 3, 4, 5, 6, 7, 8]).pong().encode(&mut dst).unwrap();
        assert_eq!(&dst[..9], &[0, 0, 8, 6, 1, 0, 0, 0, 0]);
        assert_eq!(&dst[9..], &[1, 2, 3, 4, 5, 6, 7, 8]);
    }
}
