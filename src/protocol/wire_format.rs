//! Frame header encoding and decoding.
//!
//! Implements the fixed 9-byte frame header:
//! ```text
//! ┌──────────┬────────┬────────┬───┬─────────────┐
//! │ Length   │ Type   │ Flags  │ R │ Stream ID   │
//! │ 24 bits  │ 8 bits │ 8 bits │ 1 │ 31 bits     │
//! │ uint24 BE│        │        │   │ uint32 BE   │
//! └──────────┴────────┴────────┴───┴─────────────┘
//! ```
//!
//! All multi-byte integers are Big Endian. The reserved bit is dropped on
//! decode and written as 0 on encode.

use std::fmt;

use super::flags::Flags;
use crate::error::{Error, Result};

/// Header size in bytes (fixed, exactly 9).
pub const FRAME_HEADER_LEN: usize = 9;

/// Mask for the 31-bit stream identifier (clears the reserved bit).
pub const STREAM_ID_MASK: u32 = 0x7fff_ffff;

/// Largest length expressible in the 24-bit length field.
pub const MAX_FRAME_LEN: u32 = 0x00ff_ffff;

/// Initial maximum frame size every peer must accept (16 KiB).
pub const DEFAULT_MAX_FRAME_SIZE: u32 = 16_384;

/// Default number of buffers kept by a header pool.
pub const HEADER_POOL_SIZE: usize = 16;

/// Frame type byte.
///
/// Values outside the registered range are kept in [`FrameType::Unknown`];
/// they are never rejected at the header stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameType {
    Data,
    Headers,
    Priority,
    RstStream,
    Settings,
    PushPromise,
    Ping,
    GoAway,
    WindowUpdate,
    Continuation,
    Unknown(u8),
}

impl FrameType {
    /// Wire value of this type.
    pub fn as_u8(self) -> u8 {
        match self {
            FrameType::Data => 0x0,
            FrameType::Headers => 0x1,
            FrameType::Priority => 0x2,
            FrameType::RstStream => 0x3,
            FrameType::Settings => 0x4,
            FrameType::PushPromise => 0x5,
            FrameType::Ping => 0x6,
            FrameType::GoAway => 0x7,
            FrameType::WindowUpdate => 0x8,
            FrameType::Continuation => 0x9,
            FrameType::Unknown(v) => v,
        }
    }

    /// Check if this is a registered frame type.
    #[inline]
    pub fn is_known(self) -> bool {
        !matches!(self, FrameType::Unknown(_))
    }
}

impl From<u8> for FrameType {
    fn from(v: u8) -> Self {
        match v {
            0x0 => FrameType::Data,
            0x1 => FrameType::Headers,
            0x2 => FrameType::Priority,
            0x3 => FrameType::RstStream,
            0x4 => FrameType::Settings,
            0x5 => FrameType::PushPromise,
            0x6 => FrameType::Ping,
            0x7 => FrameType::GoAway,
            0x8 => FrameType::WindowUpdate,
            0x9 => FrameType::Continuation,
            other => FrameType::Unknown(other),
        }
    }
}

impl From<FrameType> for u8 {
    #[inline]
    fn from(t: FrameType) -> Self {
        t.as_u8()
    }
}

impl fmt::Display for FrameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FrameType::Data => "DATA",
            FrameType::Headers => "HEADERS",
            FrameType::Priority => "PRIORITY",
            FrameType::RstStream => "RST_STREAM",
            FrameType::Settings => "SETTINGS",
            FrameType::PushPromise => "PUSH_PROMISE",
            FrameType::Ping => "PING",
            FrameType::GoAway => "GOAWAY",
            FrameType::WindowUpdate => "WINDOW_UPDATE",
            FrameType::Continuation => "CONTINUATION",
            FrameType::Unknown(v) => return write!(f, "UNKNOWN_FRAME_TYPE_0x{:x}", v),
        };
        f.write_str(name)
    }
}

/// Decoded frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Payload length in bytes (24 bits on the wire).
    pub length: u32,
    /// Frame type.
    pub frame_type: FrameType,
    /// Flags byte; meaning depends on `frame_type`.
    pub flags: Flags,
    /// Stream identifier with the reserved bit masked off.
    pub stream_id: u32,
}

impl FrameHeader {
    /// Create a new header.
    ///
    /// The stream ID is masked to 31 bits.
    pub fn new(frame_type: FrameType, flags: Flags, stream_id: u32, length: u32) -> Self {
        Self {
            length,
            frame_type,
            flags,
            stream_id: stream_id & STREAM_ID_MASK,
        }
    }

    /// Encode header to bytes (Big Endian).
    ///
    /// # Example
    ///
    /// ```
    /// use h2_framing::protocol::{flags, FrameHeader, FrameType};
    ///
    /// let header = FrameHeader::new(FrameType::Data, flags::END_STREAM, 1, 5);
    /// let bytes = header.encode();
    /// assert_eq!(bytes, [0, 0, 5, 0, 1, 0, 0, 0, 1]);
    /// ```
    pub fn encode(&self) -> [u8; FRAME_HEADER_LEN] {
        let mut buf = [0u8; FRAME_HEADER_LEN];
        self.encode_into(&mut buf);
        buf
    }

    /// Encode header into an existing buffer.
    ///
    /// Only the low 24 bits of `length` are written.
    ///
    /// # Panics
    ///
    /// Panics if buffer is smaller than `FRAME_HEADER_LEN` (9 bytes). Debug
    /// builds also panic on a length over `MAX_FRAME_LEN`; frame encoders
    /// reject those with a frame-size error before reaching here.
    pub fn encode_into(&self, buf: &mut [u8]) {
        debug_assert!(buf.len() >= FRAME_HEADER_LEN);
        debug_assert!(self.length <= MAX_FRAME_LEN);
        buf[0..3].copy_from_slice(&self.length.to_be_bytes()[1..4]);
        buf[3] = self.frame_type.as_u8();
        buf[4] = self.flags.bits();
        buf[5..9].copy_from_slice(&(self.stream_id & STREAM_ID_MASK).to_be_bytes());
    }

    /// Decode header from bytes (Big Endian).
    ///
    /// Only the first 9 bytes are read. Fewer than 9 bytes is a short read.
    ///
    /// # Example
    ///
    /// ```
    /// use h2_framing::protocol::{FrameHeader, FrameType};
    ///
    /// let bytes = [0, 0, 5, 0, 1, 0x80, 0, 0, 1];
    /// let header = FrameHeader::decode(&bytes).unwrap();
    /// assert_eq!(header.length, 5);
    /// assert_eq!(header.frame_type, FrameType::Data);
    /// assert_eq!(header.stream_id, 1);
    /// ```
    pub fn decode(buf: &[u8]) -> Result<Self> {
        if buf.len() < FRAME_HEADER_LEN {
            return Err(Error::UnexpectedEof);
        }
        Ok(Self {
            length: u32::from_be_bytes([0, buf[0], buf[1], buf[2]]),
            frame_type: FrameType::from(buf[3]),
            flags: Flags::from_bits(buf[4]),
            stream_id: u32::from_be_bytes([buf[5], buf[6], buf[7], buf[8]]) & STREAM_ID_MASK,
        })
    }

    /// Check if a flag is set.
    #[inline]
    pub fn has_flag(&self, flag: Flags) -> bool {
        self.flags.has(flag)
    }
}

/// Encode a header to bytes (standalone function).
#[inline]
pub fn encode_header(header: &FrameHeader) -> [u8; FRAME_HEADER_LEN] {
    header.encode()
}

/// Encode a header into an existing buffer (standalone function).
#[inline]
pub fn encode_header_into(buf: &mut [u8], header: &FrameHeader) {
    header.encode_into(buf);
}

/// Decode a header from bytes (standalone function).
#[inline]
pub fn decode_header(buf: &[u8]) -> Result<FrameHeader> {
    FrameHeader::decode(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::flags;

    #[test]
    fn test_header_encode_decode_roundtrip() {
        let original = FrameHeader::new(FrameType::Headers, flags::END_HEADERS, 42, 100);
        let encoded = original.encode();
        let decoded = FrameHeader::decode(&encoded).unwrap();
        assert_eq!(original, decoded);
    }

    #[test]
    fn test_header_big_endian_byte_order() {
        let header = FrameHeader::new(FrameType::Settings, Flags::from_bits(0x03), 0x04050607, 0x0a0b0c);
        let bytes = header.encode();

        // Length: 0x0a0b0c in BE (24 bits)
        assert_eq!(&bytes[0..3], &[0x0a, 0x0b, 0x0c]);

        // Type
        assert_eq!(bytes[3], 0x04);

        // Flags
        assert_eq!(bytes[4], 0x03);

        // Stream ID: 0x04050607 in BE
        assert_eq!(&bytes[5..9], &[0x04, 0x05, 0x06, 0x07]);
    }

    #[test]
    fn test_header_size_is_exactly_9() {
        assert_eq!(FRAME_HEADER_LEN, 9);
        let header = FrameHeader::new(FrameType::Ping, Flags::empty(), 0, 8);
        assert_eq!(header.encode().len(), 9);
    }

    #[test]
    fn test_decode_too_short_buffer() {
        let buf = [0u8; 8]; // One byte short
        assert!(matches!(FrameHeader::decode(&buf), Err(Error::UnexpectedEof)));
    }

    #[test]
    fn test_reserved_bit_masked_on_decode() {
        let bytes = [0, 0, 0, 0x8, 0, 0xff, 0xff, 0xff, 0xff];
        let header = FrameHeader::decode(&bytes).unwrap();
        assert_eq!(header.stream_id, 0x7fff_ffff);
        assert_eq!(header.frame_type, FrameType::WindowUpdate);
    }

    #[test]
    fn test_reserved_bit_cleared_on_encode() {
        let header = FrameHeader {
            length: 0,
            frame_type: FrameType::Data,
            flags: Flags::empty(),
            stream_id: 0xffff_ffff,
        };
        let bytes = header.encode();
        assert_eq!(bytes[5], 0x7f);
    }

    #[test]
    fn test_max_length_24_bits() {
        let header = FrameHeader::new(FrameType::Data, Flags::empty(), 1, MAX_FRAME_LEN);
        let bytes = header.encode();
        assert_eq!(&bytes[0..3], &[0xff, 0xff, 0xff]);
        assert_eq!(FrameHeader::decode(&bytes).unwrap().length, MAX_FRAME_LEN);
    }

    #[test]
    fn test_unknown_frame_type_is_representable() {
        let bytes = [0, 0, 0, 0xfa, 0, 0, 0, 0, 3];
        let header = FrameHeader::decode(&bytes).unwrap();
        assert_eq!(header.frame_type, FrameType::Unknown(0xfa));
        assert!(!header.frame_type.is_known());
        assert_eq!(header.encode(), bytes);
    }

    #[test]
    fn test_frame_type_u8_mapping() {
        for v in 0u8..=255 {
            assert_eq!(FrameType::from(v).as_u8(), v);
        }
        assert_eq!(FrameType::from(0x9), FrameType::Continuation);
        assert_eq!(FrameType::GoAway.to_string(), "GOAWAY");
        assert_eq!(FrameType::Unknown(0x10).to_string(), "UNKNOWN_FRAME_TYPE_0x10");
    }

    #[test]
    fn test_standalone_functions() {
        let header = FrameHeader::new(FrameType::Priority, Flags::empty(), 3, 5);

        let encoded = encode_header(&header);
        let decoded = decode_header(&encoded).unwrap();
        assert_eq!(header, decoded);

        let mut buf = [0u8; FRAME_HEADER_LEN];
        encode_header_into(&mut buf, &header);
        assert_eq!(buf, encoded);
    }

    #[test]
    fn test_has_flag() {
        let header = FrameHeader::new(FrameType::Headers, flags::END_HEADERS | flags::PRIORITY, 1, 0);
        assert!(header.has_flag(flags::END_HEADERS));
        assert!(header.has_flag(flags::PRIORITY));
        assert!(!header.has_flag(flags::PADDED));
    }
}
