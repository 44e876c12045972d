//! Per-type frame payloads.
//!
//! Every frame type has a struct embedding its [`FrameHeader`] by value plus
//! the type-specific fields, a `parse(header, payload)` constructor that does
//! all format-level validation, and an `encode(dst)` method writing the
//! complete frame.
//!
//! Frames that carry bytes from the payload (data, header fragments, debug
//! data) borrow them from the caller's buffer; nothing is copied on decode.

mod continuation;
mod data;
mod goaway;
mod headers;
mod ping;
mod priority;
mod push_promise;
mod rst_stream;
mod settings;
mod window_update;

pub use continuation::ContinuationFrame;
pub use data::DataFrame;
pub use goaway::GoAwayFrame;
pub use headers::HeadersFrame;
pub use ping::PingFrame;
pub use priority::{PriorityFrame, PriorityParam};
pub use push_promise::PushPromiseFrame;
pub use rst_stream::RstStreamFrame;
pub use settings::{Setting, SettingId, SettingsFrame};
pub use window_update::WindowUpdateFrame;

use bytes::{BufMut, BytesMut};

use super::flags::{self, Flags};
use super::primitives::read_u8;
use super::wire_format::{FrameHeader, FrameType, FRAME_HEADER_LEN, MAX_FRAME_LEN};
use crate::error::{ErrCode, Error, Result};

/// Reject a header handed to the wrong parser.
fn expect_type(header: &FrameHeader, expected: FrameType) -> Result<()> {
    if header.frame_type != expected {
        return Err(Error::Connection {
            code: ErrCode::INTERNAL_ERROR,
            reason: format!("expected {} frame, got {}", expected, header.frame_type).into(),
        });
    }
    Ok(())
}

/// Reject stream-scoped frames sent on stream 0.
fn require_stream(header: &FrameHeader) -> Result<()> {
    if header.stream_id == 0 {
        return Err(Error::protocol(format!(
            "{} frame with stream ID 0",
            header.frame_type
        )));
    }
    Ok(())
}

/// Reject connection-scoped frames sent on a stream.
fn require_connection(header: &FrameHeader) -> Result<()> {
    if header.stream_id != 0 {
        return Err(Error::protocol(format!(
            "{} frame with stream ID {}",
            header.frame_type, header.stream_id
        )));
    }
    Ok(())
}

/// Consume the pad length byte if PADDED is set.
fn read_pad_len<'a>(header: &FrameHeader, p: &'a [u8]) -> Result<(&'a [u8], Option<u8>)> {
    if header.has_flag(flags::PADDED) {
        let (rest, pad_len) = read_u8(p)?;
        Ok((rest, Some(pad_len)))
    } else {
        Ok((p, None))
    }
}

/// Write a frame header for a payload of `length` bytes.
fn put_header(
    dst: &mut BytesMut,
    frame_type: FrameType,
    flags: Flags,
    stream_id: u32,
    length: usize,
) -> Result<()> {
    if length > MAX_FRAME_LEN as usize {
        return Err(Error::frame_size(
            frame_type,
            length,
            format!("at most {}", MAX_FRAME_LEN),
        ));
    }
    dst.reserve(FRAME_HEADER_LEN + length);
    dst.put_slice(&FrameHeader::new(frame_type, flags, stream_id, length as u32).encode());
    Ok(())
}

/// Payload bytes taken by the pad length byte and the padding itself.
#[inline]
fn padding_overhead(pad_len: Option<u8>) -> usize {
    pad_len.map_or(0, |n| 1 + n as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expect_type_mismatch() {
        let header = FrameHeader::new(FrameType::Headers, Flags::empty(), 1, 0);
        let err = expect_type(&header, FrameType::Data).unwrap_err();
        assert_eq!(err.code(), Some(ErrCode::INTERNAL_ERROR));
        assert!(err.to_string().contains("expected DATA frame, got HEADERS"));
    }

    #[test]
    fn test_read_pad_len() {
        let padded = FrameHeader::new(FrameType::Data, flags::PADDED, 1, 3);
        let (rest, pad) = read_pad_len(&padded, &[2, 0, 0]).unwrap();
        assert_eq!(pad, Some(2));
        assert_eq!(rest.len(), 2);

        let plain = FrameHeader::new(FrameType::Data, Flags::empty(), 1, 3);
        let (rest, pad) = read_pad_len(&plain, &[2, 0, 0]).unwrap();
        assert_eq!(pad, None);
        assert_eq!(rest.len(), 3);

        assert!(matches!(read_pad_len(&padded, &[]), Err(Error::UnexpectedEof)));
    }

    #[test]
    fn test_put_header_rejects_oversize() {
        let mut dst = BytesMut::new();
        let err = put_header(
            &mut dst,
            FrameType::Data,
            Flags::empty(),
            1,
            MAX_FRAME_LEN as usize + 1,
        )
        .unwrap_err();
        assert_eq!(err.code(), Some(ErrCode::FRAME_SIZE_ERROR));
        assert!(dst.is_empty());
    }
}
