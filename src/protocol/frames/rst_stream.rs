//! RST_STREAM frame.

use bytes::{BufMut, BytesMut};

use super::{expect_type, put_header, require_stream};
use crate::error::{ErrCode, Error, Result};
use crate::protocol::flags::Flags;
use crate::protocol::primitives::read_u32;
use crate::protocol::wire_format::{FrameHeader, FrameType};

/// RST_STREAM frame: terminates one stream with an error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RstStreamFrame {
    pub header: FrameHeader,
    pub error_code: ErrCode,
}

impl RstStreamFrame {
    pub fn new(stream_id: u32, error_code: ErrCode) -> Self {
        Self {
            header: FrameHeader::new(FrameType::RstStream, Flags::empty(), stream_id, 4),
            error_code,
        }
    }

    /// Parse a RST_STREAM payload.
    ///
    /// The size is checked before the stream ID. The code is taken as-is,
    /// unknown values included.
    pub fn parse(header: &FrameHeader, payload: &[u8]) -> Result<Self> {
        expect_type(header, FrameType::RstStream)?;
        if payload.len() != 4 {
            return Err(Error::frame_size(FrameType::RstStream, payload.len(), "4"));
        }
        require_stream(header)?;
        let (_, code) = read_u32(payload)?;
        Ok(Self {
            header: *header,
            error_code: ErrCode(code),
        })
    }

    #[inline]
    pub fn stream_id(&self) -> u32 {
        self.header.stream_id
    }

    pub fn encode(&self, dst: &mut BytesMut) -> Result<()> {
        put_header(dst, FrameType::RstStream, self.header.flags, self.header.stream_id, 4)?;
        dst.put_u32(self.error_code.0);
        Ok(())
    }
}
