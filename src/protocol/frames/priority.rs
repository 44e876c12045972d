//! PRIORITY frame and the priority block shared with HEADERS.

use bytes::{BufMut, BytesMut};

use super::{expect_type, put_header, require_stream};
use crate::error::{Error, Result};
use crate::protocol::flags::Flags;
use crate::protocol::primitives::{read_u31, read_u8};
use crate::protocol::wire_format::{FrameHeader, FrameType, STREAM_ID_MASK};

/// Size of the priority block on the wire.
pub const PRIORITY_PARAM_LEN: usize = 5;

/// Stream dependency and weight.
///
/// ```text
/// ┌───┬──────────────────┬────────┐
/// │ E │ Stream Dependency│ Weight │
/// │ 1 │ 31 bits          │ 8 bits │
/// └───┴──────────────────┴────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PriorityParam {
    /// Stream this one depends on.
    pub stream_dep: u32,
    /// Exclusive dependency (the high bit of the first word).
    pub exclusive: bool,
    /// Weight minus one, as sent on the wire.
    pub weight: u8,
}

impl PriorityParam {
    pub fn new(stream_dep: u32, exclusive: bool, weight: u8) -> Self {
        Self {
            stream_dep: stream_dep & STREAM_ID_MASK,
            exclusive,
            weight,
        }
    }

    /// Read a 5-byte priority block.
    pub(crate) fn read(p: &[u8]) -> Result<(&[u8], Self)> {
        let (p, exclusive, stream_dep) = read_u31(p)?;
        let (p, weight) = read_u8(p)?;
        Ok((
            p,
            Self {
                stream_dep,
                exclusive,
                weight,
            },
        ))
    }

    pub(crate) fn put(&self, dst: &mut BytesMut) {
        let mut v = self.stream_dep & STREAM_ID_MASK;
        if self.exclusive {
            v |= !STREAM_ID_MASK;
        }
        dst.put_u32(v);
        dst.put_u8(self.weight);
    }
}

/// PRIORITY frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriorityFrame {
    pub header: FrameHeader,
    pub priority: PriorityParam,
}

impl PriorityFrame {
    pub fn new(stream_id: u32, priority: PriorityParam) -> Self {
        Self {
            header: FrameHeader::new(
                FrameType::Priority,
                Flags::empty(),
                stream_id,
                PRIORITY_PARAM_LEN as u32,
            ),
            priority,
        }
    }

    /// Parse a PRIORITY payload.
    ///
    /// Stream 0 is checked before the size, so a PRIORITY frame on stream 0
    /// is always a PROTOCOL_ERROR, never a frame-size error.
    pub fn parse(header: &FrameHeader, payload: &[u8]) -> Result<Self> {
        expect_type(header, FrameType::Priority)?;
        require_stream(header)?;
        if payload.len() != PRIORITY_PARAM_LEN {
            return Err(Error::frame_size(FrameType::Priority, payload.len(), "5"));
        }
        let (_, priority) = PriorityParam::read(payload)?;
        Ok(Self {
            header: *header,
            priority,
        })
    }

    #[inline]
    pub fn stream_id(&self) -> u32 {
        self.header.stream_id
    }

    /// Encode the complete frame (header + payload).
    pub fn encode(&self, dst: &mut BytesMut) -> Result<()> {
        put_header(
            dst,
            FrameType::Priority,
            self.header.flags,
            self.header.stream_id,
            PRIORITY_PARAM_LEN,
        )?;
        self.priority.put(dst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrCode;

    fn header(stream_id: u32, len: usize) -> FrameHeader {
        FrameHeader::new(FrameType::Priority, Flags::empty(), stream_id, len as u32)
    }

    #[test]
    fn test_parse_exclusive() {
        let payload = [0x80, 0, 0, 3, 15];
        let frame = PriorityFrame::parse(&header(5, 5), &payload).unwrap();
        assert!(frame.priority.exclusive);
        assert_eq!(frame.priority.stream_dep, 3);
        assert_eq!(frame.priority.weight, 15);
    }

    #[test]
    fn test_parse_non_exclusive() {
        let payload = [0x7f, 0xff, 0xff, 0xff, 255];
        let frame = PriorityFrame::parse(&header(5, 5), &payload).unwrap();
        assert!(!frame.priority.exclusive);
        assert_eq!(frame.priority.stream_dep, 0x7fff_ffff);
        assert_eq!(frame.priority.weight, 255);
    }

    #[test]
    fn test_wrong_size_is_frame_size_error() {
        for len in [0usize, 4, 6, 10] {
            let payload = vec![0u8; len];
            let err = PriorityFrame::parse(&header(1, len), &payload).unwrap_err();
            assert!(matches!(err, Error::FrameSize { actual, .. } if actual == len));
            assert_eq!(err.code(), Some(ErrCode::FRAME_SIZE_ERROR));
        }
    }

    #[test]
    fn test_frame_size_message() {
        let err = PriorityFrame::parse(&header(1, 4), &[0; 4]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "connection error: FRAME_SIZE_ERROR: PRIORITY frame payload size was 4; want 5"
        );
    }

    #[test]
    fn test_stream_zero_wins_over_size() {
        let err = PriorityFrame::parse(&header(0, 5), &[0; 5]).unwrap_err();
        assert!(matches!(err, Error::Connection { .. }));
        assert_eq!(err.code(), Some(ErrCode::PROTOCOL_ERROR));

        let err = PriorityFrame::parse(&header(0, 3), &[0; 3]).unwrap_err();
        assert!(matches!(err, Error::Connection { .. }));
    }

    #[test]
    fn test_encode() {
        let mut dst = BytesMut::new();
        PriorityFrame::new(9, PriorityParam::new(3, true, 200))
            .encode(&mut dst)
            .unwrap();
        assert_eq!(&dst[..], &[0, 0, 5, 2, 0, 0, 0, 0, 9, 0x80, 0, 0, 3, 200]);
    }
}
