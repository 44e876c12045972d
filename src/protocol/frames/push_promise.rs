//! PUSH_PROMISE frame.

use bytes::{BufMut, BytesMut};

use super::{expect_type, padding_overhead, put_header, read_pad_len, require_stream};
use crate::error::{Error, Result};
use crate::protocol::flags::{self, Flags};
use crate::protocol::primitives::{read_u31, strip_trailing};
use crate::protocol::wire_format::{FrameHeader, FrameType, STREAM_ID_MASK};

/// PUSH_PROMISE frame: announces a server-initiated stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushPromiseFrame<'a> {
    pub header: FrameHeader,
    /// Stream the server will push on (31 bits).
    pub promised_stream_id: u32,
    /// Compressed header block fragment, borrowed from the payload.
    pub header_fragment: &'a [u8],
    /// Pad length, present when the frame is PADDED.
    pub pad_len: Option<u8>,
}

impl<'a> PushPromiseFrame<'a> {
    pub fn new(stream_id: u32, promised_stream_id: u32, header_fragment: &'a [u8]) -> Self {
        Self {
            header: FrameHeader::new(
                FrameType::PushPromise,
                Flags::empty(),
                stream_id,
                (4 + header_fragment.len()) as u32,
            ),
            promised_stream_id: promised_stream_id & STREAM_ID_MASK,
            header_fragment,
            pad_len: None,
        }
    }

    pub fn end_headers(mut self) -> Self {
        self.header.flags.insert(flags::END_HEADERS);
        self
    }

    pub fn padded(mut self, pad_len: u8) -> Self {
        self.header.flags.insert(flags::PADDED);
        self.pad_len = Some(pad_len);
        self.header.length = (4 + self.header_fragment.len() + padding_overhead(self.pad_len)) as u32;
        self
    }

    /// Parse a PUSH_PROMISE payload.
    ///
    /// A payload too short for the pad length byte or the promised stream ID
    /// yields [`Error::UnexpectedEof`].
    pub fn parse(header: &FrameHeader, payload: &'a [u8]) -> Result<Self> {
        expect_type(header, FrameType::PushPromise)?;
        require_stream(header)?;

        let (rest, pad_len) = read_pad_len(header, payload)?;
        let (rest, _, promised_stream_id) = read_u31(rest)?;
        let header_fragment = strip_trailing(rest, pad_len.unwrap_or(0))
            .ok_or_else(|| Error::protocol("pad size larger than push promise payload"))?;

        Ok(Self {
            header: *header,
            promised_stream_id,
            header_fragment,
            pad_len,
        })
    }

    /// Check if END_HEADERS is set.
    #[inline]
    pub fn headers_ended(&self) -> bool {
        self.header.has_flag(flags::END_HEADERS)
    }

    #[inline]
    pub fn stream_id(&self) -> u32 {
        self.header.stream_id
    }

    pub fn encode(&self, dst: &mut BytesMut) -> Result<()> {
        let flags = self.header.flags.with(flags::PADDED, self.pad_len.is_some());
        let length = 4 + self.header_fragment.len() + padding_overhead(self.pad_len);
        put_header(dst, FrameType::PushPromise, flags, self.header.stream_id, length)?;
        if let Some(pad_len) = self.pad_len {
            dst.put_u8(pad_len);
        }
        dst.put_u32(self.promised_stream_id & STREAM_ID_MASK);
        dst.put_slice(self.header_fragment);
        dst.put_bytes(0, self.pad_len.unwrap_or(0) as usize);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrCode;

    fn header(flags: Flags, stream_id: u32, len: usize) -> FrameHeader {
        FrameHeader::new(FrameType::PushPromise, flags, stream_id, len as u32)
    }

    #[test]
    fn test_parse_plain() {
        let payload = [0x80, 0, 0, 2, b'h', b'f'];
        let frame = PushPromiseFrame::parse(&header(flags::END_HEADERS, 1, 6), &payload).unwrap();
        assert_eq!(frame.promised_stream_id, 2);
        assert_eq!(frame.header_fragment, b"hf");
        assert!(frame.headers_ended());
    }

    #[test]
    fn test_parse_padded() {
        let payload = [1, 0, 0, 0, 4, b'x', 0];
        let frame = PushPromiseFrame::parse(&header(flags::PADDED, 1, 7), &payload).unwrap();
        assert_eq!(frame.promised_stream_id, 4);
        assert_eq!(frame.header_fragment, b"x");
        assert_eq!(frame.pad_len, Some(1));
    }

    #[test]
    fn test_missing_promised_id_is_short_read() {
        let err = PushPromiseFrame::parse(&header(Flags::empty(), 1, 3), &[0, 0, 2]).unwrap_err();
        assert!(matches!(err, Error::UnexpectedEof));

        let err = PushPromiseFrame::parse(&header(flags::PADDED, 1, 0), &[]).unwrap_err();
        assert!(matches!(err, Error::UnexpectedEof));
    }

    #[test]
    fn test_pad_too_large() {
        let payload = [3, 0, 0, 0, 2, 0];
        let err = PushPromiseFrame::parse(&header(flags::PADDED, 1, 6), &payload).unwrap_err();
        assert!(err.is_connection_error());
        assert_eq!(err.code(), Some(ErrCode::PROTOCOL_ERROR));
    }

    #[test]
    fn test_stream_zero_rejected() {
        let err = PushPromiseFrame::parse(&header(Flags::empty(), 0, 4), &[0, 0, 0, 2]).unwrap_err();
        assert!(err.is_connection_error());
    }

    #[test]
    fn test_encode_parses_back() {
        let mut dst = BytesMut::new();
        PushPromiseFrame::new(1, 2, b"abc")
            .end_headers()
            .padded(2)
            .encode(&mut dst)
            .unwrap();

        let hdr = FrameHeader::decode(&dst).unwrap();
        let frame = PushPromiseFrame::parse(&hdr, &dst[9..]).unwrap();
        assert_eq!(frame.promised_stream_id, 2);
        assert_eq!(frame.header_fragment, b"abc");
        assert!(frame.headers_ended());
    }
}
