//! DATA frame.

use bytes::{BufMut, BytesMut};

use super::{expect_type, padding_overhead, put_header, read_pad_len, require_stream};
use crate::error::{Error, Result};
use crate::protocol::flags::{self, Flags};
use crate::protocol::primitives::strip_trailing;
use crate::protocol::wire_format::{FrameHeader, FrameType};

/// DATA frame: application bytes on one stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataFrame<'a> {
    pub header: FrameHeader,
    /// Payload with pad length byte and padding removed.
    pub data: &'a [u8],
    /// Pad length, present when the frame is PADDED.
    pub pad_len: Option<u8>,
}

impl<'a> DataFrame<'a> {
    /// Create an unpadded DATA frame.
    pub fn new(stream_id: u32, data: &'a [u8]) -> Self {
        Self {
            header: FrameHeader::new(FrameType::Data, Flags::empty(), stream_id, data.len() as u32),
            data,
            pad_len: None,
        }
    }

    /// Mark this as the last frame on the stream.
    pub fn end_stream(mut self) -> Self {
        self.header.flags.insert(flags::END_STREAM);
        self
    }

    /// Append `pad_len` bytes of padding on encode.
    pub fn padded(mut self, pad_len: u8) -> Self {
        self.header.flags.insert(flags::PADDED);
        self.pad_len = Some(pad_len);
        self.header.length = (self.data.len() + padding_overhead(self.pad_len)) as u32;
        self
    }

    /// Parse a DATA payload.
    ///
    /// # Errors
    ///
    /// - Connection PROTOCOL_ERROR on stream 0 or when padding exceeds the payload.
    /// - [`Error::UnexpectedEof`] when PADDED is set on an empty payload.
    pub fn parse(header: &FrameHeader, payload: &'a [u8]) -> Result<Self> {
        expect_type(header, FrameType::Data)?;
        require_stream(header)?;

        let (rest, pad_len) = read_pad_len(header, payload)?;
        let data = strip_trailing(rest, pad_len.unwrap_or(0))
            .ok_or_else(|| Error::protocol("pad size larger than data payload"))?;

        Ok(Self {
            header: *header,
            data,
            pad_len,
        })
    }

    /// Check if END_STREAM is set.
    #[inline]
    pub fn stream_ended(&self) -> bool {
        self.header.has_flag(flags::END_STREAM)
    }

    /// Stream this frame belongs to.
    #[inline]
    pub fn stream_id(&self) -> u32 {
        self.header.stream_id
    }

    /// Encode the complete frame (header + payload).
    pub fn encode(&self, dst: &mut BytesMut) -> Result<()> {
        let flags = self.header.flags.with(flags::PADDED, self.pad_len.is_some());
        let length = self.data.len() + padding_overhead(self.pad_len);
        put_header(dst, FrameType::Data, flags, self.header.stream_id, length)?;
        if let Some(pad_len) = self.pad_len {
            dst.put_u8(pad_len);
        }
        dst.put_slice(self.data);
        dst.put_bytes(0, self.pad_len.unwrap_or(0) as usize);
        Ok(())
    }
}
