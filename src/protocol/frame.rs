//! Typed frames and the raw (header + payload) frame.
//!
//! [`RawFrame`] is what comes off the wire: a decoded header and an owned
//! payload (`bytes::Bytes`). [`RawFrame::parse`] dispatches on the frame type
//! and returns a [`Frame`] that borrows from the payload.
//!
//! # Example
//!
//! ```
//! use h2_framing::protocol::{flags, Frame, FrameHeader, FrameType, RawFrame};
//! use bytes::Bytes;
//!
//! let header = FrameHeader::new(FrameType::Data, flags::END_STREAM, 1, 5);
//! let raw = RawFrame::new(header, Bytes::from_static(b"hello"));
//!
//! match raw.parse().unwrap() {
//!     Frame::Data(data) => assert_eq!(data.data, b"hello"),
//!     other => panic!("unexpected frame {:?}", other),
//! }
//! ```

use bytes::{Bytes, BytesMut};

use super::frames::{
    ContinuationFrame, DataFrame, GoAwayFrame, HeadersFrame, PingFrame, PriorityFrame,
    PushPromiseFrame, RstStreamFrame, SettingsFrame, WindowUpdateFrame,
};
use super::wire_format::{FrameHeader, FrameType, FRAME_HEADER_LEN, MAX_FRAME_LEN};
use crate::error::{Error, Result};

/// A complete frame as read from the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFrame {
    /// Decoded header.
    pub header: FrameHeader,
    /// Payload bytes (zero-copy via `bytes::Bytes`).
    pub payload: Bytes,
}

impl RawFrame {
    /// Create a new frame from header and payload.
    pub fn new(header: FrameHeader, payload: Bytes) -> Self {
        Self { header, payload }
    }

    /// Create a frame from header and raw bytes (copies data).
    pub fn from_parts(header: FrameHeader, payload: &[u8]) -> Self {
        Self {
            header,
            payload: Bytes::copy_from_slice(payload),
        }
    }

    /// Parse the payload according to the header's frame type.
    #[inline]
    pub fn parse(&self) -> Result<Frame<'_>> {
        parse_frame(&self.header, &self.payload)
    }

    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    #[inline]
    pub fn payload_len(&self) -> usize {
        self.payload.len()
    }

    #[inline]
    pub fn frame_type(&self) -> FrameType {
        self.header.frame_type
    }

    #[inline]
    pub fn stream_id(&self) -> u32 {
        self.header.stream_id
    }
}

/// Frame of a type this crate does not interpret. Receivers ignore these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFrame<'a> {
    pub header: FrameHeader,
    pub payload: &'a [u8],
}

/// A decoded, validated frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame<'a> {
    Data(DataFrame<'a>),
    Headers(HeadersFrame<'a>),
    Priority(PriorityFrame),
    RstStream(RstStreamFrame),
    Settings(SettingsFrame),
    PushPromise(PushPromiseFrame<'a>),
    Ping(PingFrame),
    GoAway(GoAwayFrame<'a>),
    WindowUpdate(WindowUpdateFrame),
    Continuation(ContinuationFrame<'a>),
    Unknown(UnknownFrame<'a>),
}

impl<'a> Frame<'a> {
    /// Header embedded in the frame.
    pub fn header(&self) -> &FrameHeader {
        match self {
            Frame::Data(f) => &f.header,
            Frame::Headers(f) => &f.header,
            Frame::Priority(f) => &f.header,
            Frame::RstStream(f) => &f.header,
            Frame::Settings(f) => &f.header,
            Frame::PushPromise(f) => &f.header,
            Frame::Ping(f) => &f.header,
            Frame::GoAway(f) => &f.header,
            Frame::WindowUpdate(f) => &f.header,
            Frame::Continuation(f) => &f.header,
            Frame::Unknown(f) => &f.header,
        }
    }

    #[inline]
    pub fn frame_type(&self) -> FrameType {
        self.header().frame_type
    }

    #[inline]
    pub fn stream_id(&self) -> u32 {
        self.header().stream_id
    }

    /// Encode the complete frame (header + payload) into `dst`.
    pub fn encode(&self, dst: &mut BytesMut) -> Result<()> {
        match self {
            Frame::Data(f) => f.encode(dst),
            Frame::Headers(f) => f.encode(dst),
            Frame::Priority(f) => f.encode(dst),
            Frame::RstStream(f) => f.encode(dst),
            Frame::Settings(f) => f.encode(dst),
            Frame::PushPromise(f) => f.encode(dst),
            Frame::Ping(f) => f.encode(dst),
            Frame::GoAway(f) => f.encode(dst),
            Frame::WindowUpdate(f) => f.encode(dst),
            Frame::Continuation(f) => f.encode(dst),
            Frame::Unknown(f) => {
                let mut header = f.header;
                header.length = f.payload.len() as u32;
                build_frame_into(dst, &header, f.payload)
            }
        }
    }
}

macro_rules! impl_from_frame {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl<'a> From<$ty> for Frame<'a> {
                fn from(f: $ty) -> Self {
                    Frame::$variant(f)
                }
            }
        )*
    };
}

impl_from_frame! {
    Data(DataFrame<'a>),
    Headers(HeadersFrame<'a>),
    Priority(PriorityFrame),
    RstStream(RstStreamFrame),
    Settings(SettingsFrame),
    PushPromise(PushPromiseFrame<'a>),
    Ping(PingFrame),
    GoAway(GoAwayFrame<'a>),
    WindowUpdate(WindowUpdateFrame),
    Continuation(ContinuationFrame<'a>),
    Unknown(UnknownFrame<'a>),
}

/// Parse a payload according to `header.frame_type`.
///
/// Unknown frame types are returned as [`Frame::Unknown`], never an error.
pub fn parse_frame<'a>(header: &FrameHeader, payload: &'a [u8]) -> Result<Frame<'a>> {
    let frame = match header.frame_type {
        FrameType::Data => DataFrame::parse(header, payload).map(Frame::Data),
        FrameType::Headers => HeadersFrame::parse(header, payload).map(Frame::Headers),
        FrameType::Priority => PriorityFrame::parse(header, payload).map(Frame::Priority),
        FrameType::RstStream => RstStreamFrame::parse(header, payload).map(Frame::RstStream),
        FrameType::Settings => SettingsFrame::parse(header, payload).map(Frame::Settings),
        FrameType::PushPromise => {
            PushPromiseFrame::parse(header, payload).map(Frame::PushPromise)
        }
        FrameType::Ping => PingFrame::parse(header, payload).map(Frame::Ping),
        FrameType::GoAway => GoAwayFrame::parse(header, payload).map(Frame::GoAway),
        FrameType::WindowUpdate => {
            WindowUpdateFrame::parse(header, payload).map(Frame::WindowUpdate)
        }
        FrameType::Continuation => {
            ContinuationFrame::parse(header, payload).map(Frame::Continuation)
        }
        FrameType::Unknown(_) => Ok(Frame::Unknown(UnknownFrame {
            header: *header,
            payload,
        })),
    };

    if let Err(e) = &frame {
        tracing::debug!(
            frame_type = %header.frame_type,
            stream_id = header.stream_id,
            length = header.length,
            error = %e,
            "rejected frame"
        );
    }
    frame
}

/// Encode a typed frame into a fresh buffer.
pub fn encode_frame(frame: &Frame<'_>) -> Result<Bytes> {
    let mut dst = BytesMut::new();
    frame.encode(&mut dst)?;
    Ok(dst.freeze())
}

/// Build a complete frame from a header and an already-encoded payload.
///
/// The header's length field must match the payload, and the payload must
/// fit the 24-bit length field.
///
/// # Example
///
/// ```
/// use h2_framing::protocol::{build_frame, FrameHeader, FrameType, Flags};
///
/// let header = FrameHeader::new(FrameType::Ping, Flags::empty(), 0, 8);
/// let bytes = build_frame(&header, &[0; 8]).unwrap();
/// assert_eq!(bytes.len(), 9 + 8);
/// ```
pub fn build_frame(header: &FrameHeader, payload: &[u8]) -> Result<Vec<u8>> {
    let mut dst = BytesMut::with_capacity(FRAME_HEADER_LEN + payload.len());
    build_frame_into(&mut dst, header, payload)?;
    Ok(dst.to_vec())
}

fn build_frame_into(dst: &mut BytesMut, header: &FrameHeader, payload: &[u8]) -> Result<()> {
    if payload.len() > MAX_FRAME_LEN as usize {
        return Err(Error::frame_size(
            header.frame_type,
            payload.len(),
            format!("at most {}", MAX_FRAME_LEN),
        ));
    }
    if header.length as usize != payload.len() {
        return Err(Error::frame_size(
            header.frame_type,
            payload.len(),
            header.length.to_string(),
        ));
    }
    dst.extend_from_slice(&header.encode());
    dst.extend_from_slice(payload);
    Ok(())
}
