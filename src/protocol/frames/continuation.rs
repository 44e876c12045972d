//! CONTINUATION frame.

use bytes::{BufMut, BytesMut};

use super::{expect_type, put_header, require_stream};
use crate::error::Result;
use crate::protocol::flags::{self, Flags};
use crate::protocol::wire_format::{FrameHeader, FrameType};

/// CONTINUATION frame: further header block fragment after HEADERS or
/// PUSH_PROMISE.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContinuationFrame<'a> {
    pub header: FrameHeader,
    /// The whole payload, borrowed.
    pub header_fragment: &'a [u8],
}

impl<'a> ContinuationFrame<'a> {
    pub fn new(stream_id: u32, header_fragment: &'a [u8]) -> Self {
        Self {
            header: FrameHeader::new(
                FrameType::Continuation,
                Flags::empty(),
                stream_id,
                header_fragment.len() as u32,
            ),
            header_fragment,
        }
    }

    pub fn end_headers(mut self) -> Self {
        self.header.flags.insert(flags::END_HEADERS);
        self
    }

    pub fn parse(header: &FrameHeader, payload: &'a [u8]) -> Result<Self> {
        expect_type(header, FrameType::Continuation)?;
        require_stream(header)?;
        Ok(Self {
            header: *header,
            header_fragment: payload,
        })
    }

    #[inline]
    pub fn headers_ended(&self) -> bool {
        self.header.has_flag(flags::END_HEADERS)
    }

    #[inline]
    pub fn stream_id(&self) -> u32 {
        self.header.stream_id
    }

    pub fn encode(&self, dst: &mut BytesMut) -> Result<()> {
        put_header(
            dst,
            FrameType::Continuation,
            self.header.flags,
            self.header.stream_id,
            self.header_fragment.len(),
        )?;
        dst.put_slice(self.header_fragment);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let hdr = FrameHeader::new(FrameType::Continuation, flags::END_HEADERS, 3, 4);
        let frame = ContinuationFrame::parse(&hdr, b"rest").unwrap();
        assert_eq!(frame.header_fragment, b"rest");
        assert!(frame.headers_ended());
    }

    #[test]
    fn test_not_ended() {
        let hdr = FrameHeader::new(FrameType::Continuation, Flags::empty(), 3, 0);
        let frame = ContinuationFrame::parse(&hdr, &[]).unwrap();
        assert!(!frame.headers_ended());
        assert!(frame.header_fragment.is_empty());
    }

    #[test]
    fn test_stream_zero_rejected() {
        let hdr = FrameHeader::new(FrameType::Continuation, Flags::empty(), 0, 1);
        let err = ContinuationFrame::parse(&hdr, b"x").unwrap_err();
        assert!(err.is_connection_error());
    }

    #[test]
    fn test_encode() {
        let mut dst = BytesMut::new();
        ContinuationFrame::new(3, b"ab").end_headers().encode(&mut dst).unwrap();
        assert_eq!(&dst[..], &[0, 0, 2, 9, 4, 0, 0, 0, 3, b'a', b'b']);
    }
}
