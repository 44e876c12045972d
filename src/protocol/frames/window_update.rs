//! WINDOW_UPDATE frame.

use bytes::{BufMut, BytesMut};

use super::{expect_type, put_header};
use crate::error::{ErrCode, Error, Result};
use crate::protocol::flags::Flags;
use crate::protocol::primitives::read_u31;
use crate::protocol::wire_format::{FrameHeader, FrameType, STREAM_ID_MASK};

/// WINDOW_UPDATE frame. Stream 0 addresses the connection window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowUpdateFrame {
    pub header: FrameHeader,
    /// Window size increment (31 bits).
    pub increment: u32,
}

impl WindowUpdateFrame {
    pub fn new(stream_id: u32, increment: u32) -> Self {
        Self {
            header: FrameHeader::new(FrameType::WindowUpdate, Flags::empty(), stream_id, 4),
            increment: increment & STREAM_ID_MASK,
        }
    }

    /// Parse a WINDOW_UPDATE payload.
    ///
    /// A zero increment is a connection error on stream 0 and a stream error
    /// otherwise.
    pub fn parse(header: &FrameHeader, payload: &[u8]) -> Result<Self> {
        expect_type(header, FrameType::WindowUpdate)?;
        if payload.len() != 4 {
            return Err(Error::frame_size(FrameType::WindowUpdate, payload.len(), "4"));
        }
        let (_, _, increment) = read_u31(payload)?;
        if increment == 0 {
            if header.stream_id == 0 {
                return Err(Error::protocol("WINDOW_UPDATE with zero increment"));
            }
            return Err(Error::stream(header.stream_id, ErrCode::PROTOCOL_ERROR));
        }
        Ok(Self {
            header: *header,
            increment,
        })
    }

    /// Check if this updates the connection-level window.
    #[inline]
    pub fn is_connection_level(&self) -> bool {
        self.header.stream_id == 0
    }

    #[inline]
    pub fn stream_id(&self) -> u32 {
        self.header.stream_id
    }

    pub fn encode(&self, dst: &mut BytesMut) -> Result<()> {
        put_header(dst, FrameType::WindowUpdate, self.header.flags, self.header.stream_id, 4)?;
        dst.put_u32(self.increment & STREAM_ID_MASK);
        Ok(())
    }
}
