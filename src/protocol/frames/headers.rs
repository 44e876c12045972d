//! HEADERS frame.

use bytes::{BufMut, BytesMut};

use super::priority::{PriorityParam, PRIORITY_PARAM_LEN};
use super::{expect_type, padding_overhead, put_header, read_pad_len, require_stream};
use crate::error::{ErrCode, Error, Result};
use crate::protocol::flags::{self, Flags};
use crate::protocol::wire_format::{FrameHeader, FrameType};

/// HEADERS frame: opens a stream and carries the first header block fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadersFrame<'a> {
    pub header: FrameHeader,
    /// Present iff the PRIORITY flag is set.
    pub priority: Option<PriorityParam>,
    /// Compressed header block fragment, borrowed from the payload.
    pub header_fragment: &'a [u8],
    /// Pad length, present when the frame is PADDED.
    pub pad_len: Option<u8>,
}

impl<'a> HeadersFrame<'a> {
    /// Create a HEADERS frame.
    ///
    /// An empty `header_fragment` still encodes, but a receiver rejects it
    /// with a stream error; put at least one byte of the header block here.
    pub fn new(stream_id: u32, header_fragment: &'a [u8]) -> Self {
        Self {
            header: FrameHeader::new(
                FrameType::Headers,
                Flags::empty(),
                stream_id,
                header_fragment.len() as u32,
            ),
            priority: None,
            header_fragment,
            pad_len: None,
        }
    }

    pub fn end_headers(mut self) -> Self {
        self.header.flags.insert(flags::END_HEADERS);
        self
    }

    pub fn end_stream(mut self) -> Self {
        self.header.flags.insert(flags::END_STREAM);
        self
    }

    pub fn priority(mut self, priority: PriorityParam) -> Self {
        self.header.flags.insert(flags::PRIORITY);
        self.priority = Some(priority);
        self.header.length = self.payload_len() as u32;
        self
    }

    pub fn padded(mut self, pad_len: u8) -> Self {
        self.header.flags.insert(flags::PADDED);
        self.pad_len = Some(pad_len);
        self.header.length = self.payload_len() as u32;
        self
    }

    fn payload_len(&self) -> usize {
        let priority_len = if self.priority.is_some() { PRIORITY_PARAM_LEN } else { 0 };
        priority_len + self.header_fragment.len() + padding_overhead(self.pad_len)
    }

    /// Parse a HEADERS payload.
    ///
    /// Fields are read in wire order: pad length, priority block, fragment,
    /// padding. A fragment left empty after removing padding is a stream
    /// error; padding longer than what is left is a connection error.
    pub fn parse(header: &FrameHeader, payload: &'a [u8]) -> Result<Self> {
        expect_type(header, FrameType::Headers)?;
        require_stream(header)?;

        let (rest, pad_len) = read_pad_len(header, payload)?;
        let (rest, priority) = if header.has_flag(flags::PRIORITY) {
            let (rest, priority) = PriorityParam::read(rest)?;
            (rest, Some(priority))
        } else {
            (rest, None)
        };

        let pad = pad_len.unwrap_or(0) as usize;
        if pad > rest.len() {
            return Err(Error::protocol("pad size larger than headers payload"));
        }
        if pad == rest.len() {
            return Err(Error::stream(header.stream_id, ErrCode::PROTOCOL_ERROR));
        }

        Ok(Self {
            header: *header,
            priority,
            header_fragment: &rest[..rest.len() - pad],
            pad_len,
        })
    }

    /// Check if END_HEADERS is set (no CONTINUATION follows).
    #[inline]
    pub fn headers_ended(&self) -> bool {
        self.header.has_flag(flags::END_HEADERS)
    }

    /// Check if END_STREAM is set.
    #[inline]
    pub fn stream_ended(&self) -> bool {
        self.header.has_flag(flags::END_STREAM)
    }

    /// Check if the PRIORITY flag is set.
    #[inline]
    pub fn has_priority(&self) -> bool {
        self.header.has_flag(flags::PRIORITY)
    }

    #[inline]
    pub fn stream_id(&self) -> u32 {
        self.header.stream_id
    }

    /// Encode the complete frame (header + payload).
    pub fn encode(&self, dst: &mut BytesMut) -> Result<()> {
        let flags = self
            .header
            .flags
            .with(flags::PADDED, self.pad_len.is_some())
            .with(flags::PRIORITY, self.priority.is_some());
        put_header(dst, FrameType::Headers, flags, self.header.stream_id, self.payload_len())?;
        if let Some(pad_len) = self.pad_len {
            dst.put_u8(pad_len);
        }
        if let Some(priority) = &self.priority {
            priority.put(dst);
        }
        dst.put_slice(self.header_fragment);
        dst.put_bytes(0, self.pad_len.unwrap_or(0) as usize);
        Ok(())
    }
}
