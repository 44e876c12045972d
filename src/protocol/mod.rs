//! Protocol module - wire format, framing, and frame types.
//!
//! This module implements the binary framing layer:
//! - 9-byte header encoding/decoding
//! - Per-type payload parsers and encoders
//! - Header buffer pool and frame buffer for partial reads

pub mod flags;
mod frame;
mod frame_buffer;
pub mod frames;
mod header_pool;
pub mod primitives;
mod wire_format;

pub use flags::Flags;
pub use frame::{build_frame, encode_frame, parse_frame, Frame, RawFrame, UnknownFrame};
pub use frame_buffer::FrameBuffer;
pub use frames::{
    ContinuationFrame, DataFrame, GoAwayFrame, HeadersFrame, PingFrame, PriorityFrame,
    PriorityParam, PushPromiseFrame, RstStreamFrame, Setting, SettingId, SettingsFrame,
    WindowUpdateFrame,
};
pub use header_pool::{HeaderPool, PooledHeader};
pub use wire_format::{
    decode_header, encode_header, encode_header_into, FrameHeader, FrameType,
    DEFAULT_MAX_FRAME_SIZE, FRAME_HEADER_LEN, HEADER_POOL_SIZE, MAX_FRAME_LEN, STREAM_ID_MASK,
};
