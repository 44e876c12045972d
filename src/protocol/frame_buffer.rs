//! Frame buffer for accumulating partial reads.
//!
//! For callers that receive bytes in arbitrary chunks (socket reads, test
//! harnesses) instead of owning a blocking byte source. Uses `bytes::BytesMut`
//! and a two-state machine:
//! - `WaitingForHeader`: Need at least 9 bytes
//! - `WaitingForPayload`: Header parsed, need N more payload bytes
//!
//! Frames come out in arrival order; nothing is reordered.
//!
//! # Example
//!
//! ```
//! use h2_framing::protocol::FrameBuffer;
//!
//! let mut buffer = FrameBuffer::new();
//!
//! // A PING split across two reads
//! let wire = [0, 0, 8, 6, 0, 0, 0, 0, 0, 1, 2, 3, 4, 5, 6, 7, 8];
//! assert!(buffer.push(&wire[..4]).unwrap().is_empty());
//! let frames = buffer.push(&wire[4..]).unwrap();
//! assert_eq!(frames.len(), 1);
//! assert_eq!(frames[0].payload(), &[1, 2, 3, 4, 5, 6, 7, 8]);
//! ```

use bytes::{Bytes, BytesMut};

use super::wire_format::{FrameHeader, DEFAULT_MAX_FRAME_SIZE, FRAME_HEADER_LEN};
use super::RawFrame;
use crate::config::CodecConfig;
use crate::error::{Error, Result};

/// State machine for frame parsing.
#[derive(Debug, Clone)]
enum State {
    /// Waiting for complete header (need 9 bytes).
    WaitingForHeader,
    /// Header parsed, waiting for payload bytes.
    WaitingForPayload { header: FrameHeader },
}

/// Buffer for accumulating incoming bytes and extracting complete frames.
pub struct FrameBuffer {
    /// Accumulated bytes from socket reads.
    buffer: BytesMut,
    /// Current parsing state.
    state: State,
    /// Maximum accepted payload length.
    max_frame_size: u32,
}

impl FrameBuffer {
    /// Create a new frame buffer accepting frames up to 16 KiB.
    pub fn new() -> Self {
        Self::with_max_frame_size(DEFAULT_MAX_FRAME_SIZE)
    }

    /// Create a new frame buffer with a custom maximum frame size.
    ///
    /// Initial capacity: 64KB.
    pub fn with_max_frame_size(max_frame_size: u32) -> Self {
        Self {
            buffer: BytesMut::with_capacity(64 * 1024),
            state: State::WaitingForHeader,
            max_frame_size,
        }
    }

    /// Create a frame buffer from a validated configuration.
    pub fn with_config(config: &CodecConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_max_frame_size(config.max_frame_size))
    }

    /// Push data into the buffer and extract all complete frames.
    ///
    /// If data is fragmented, partial data is buffered internally for the
    /// next push.
    ///
    /// # Errors
    ///
    /// Returns a frame-size error if a header declares a payload larger than
    /// the configured maximum. The buffer is unusable afterwards; the
    /// connection must be closed.
    pub fn push(&mut self, data: &[u8]) -> Result<Vec<RawFrame>> {
        self.buffer.extend_from_slice(data);

        let mut frames = Vec::new();
        while let Some(frame) = self.try_extract_one()? {
            frames.push(frame);
        }
        Ok(frames)
    }

    /// Try to extract a single frame from the buffer.
    ///
    /// Returns:
    /// - `Ok(Some(frame))` if a complete frame was extracted
    /// - `Ok(None)` if more data is needed
    /// - `Err(...)` if the declared length is over the limit
    fn try_extract_one(&mut self) -> Result<Option<RawFrame>> {
        loop {
            match &self.state {
                State::WaitingForHeader => {
                    if self.buffer.len() < FRAME_HEADER_LEN {
                        return Ok(None);
                    }

                    let header = FrameHeader::decode(&self.buffer[..FRAME_HEADER_LEN])?;
                    if header.length > self.max_frame_size {
                        tracing::warn!(
                            frame_type = %header.frame_type,
                            length = header.length,
                            max = self.max_frame_size,
                            "frame exceeds maximum size"
                        );
                        return Err(Error::frame_size(
                            header.frame_type,
                            header.length as usize,
                            format!("at most {}", self.max_frame_size),
                        ));
                    }

                    let _ = self.buffer.split_to(FRAME_HEADER_LEN);

                    if header.length == 0 {
                        return Ok(Some(RawFrame::new(header, Bytes::new())));
                    }
                    self.state = State::WaitingForPayload { header };
                }

                State::WaitingForPayload { header } => {
                    let remaining = header.length as usize;
                    if self.buffer.len() < remaining {
                        return Ok(None);
                    }

                    let payload = self.buffer.split_to(remaining).freeze();
                    let header = *header;
                    self.state = State::WaitingForHeader;
                    return Ok(Some(RawFrame::new(header, payload)));
                }
            }
        }
    }

    /// Get the number of buffered bytes.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Clear the buffer and reset state.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.state = State::WaitingForHeader;
    }

    /// Maximum accepted payload length.
    pub fn max_frame_size(&self) -> u32 {
        self.max_frame_size
    }

    #[cfg(test)]
    fn state_name(&self) -> &'static str {
        match &self.state {
            State::WaitingForHeader => "WaitingForHeader",
            State::WaitingForPayload { .. } => "WaitingForPayload",
        }
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrCode;
    use crate::protocol::flags::{self, Flags};
    use crate::protocol::FrameType;

    /// Helper to create a frame as bytes.
    fn make_frame_bytes(frame_type: FrameType, flags: Flags, stream_id: u32, payload: &[u8]) -> Vec<u8> {
        let header = FrameHeader::new(frame_type, flags, stream_id, payload.len() as u32);
        let mut bytes = header.encode().to_vec();
        bytes.extend_from_slice(payload);
        bytes
    }

    #[test]
    fn test_single_complete_frame() {
        let mut buffer = FrameBuffer::new();
        let frame_bytes = make_frame_bytes(FrameType::Data, flags::END_STREAM, 1, b"hello");

        let frames = buffer.push(&frame_bytes).unwrap();

        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].stream_id(), 1);
        assert_eq!(&frames[0].payload[..], b"hello");
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_multiple_frames_in_order() {
        let mut buffer = FrameBuffer::new();

        let mut combined = Vec::new();
        combined.extend(make_frame_bytes(FrameType::Headers, flags::END_HEADERS, 1, b"h"));
        combined.extend(make_frame_bytes(FrameType::Data, Flags::empty(), 1, b"first"));
        combined.extend(make_frame_bytes(FrameType::Data, flags::END_STREAM, 1, b"second"));

        let frames = buffer.push(&combined).unwrap();

        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].frame_type(), FrameType::Headers);
        assert_eq!(frames[1].payload(), b"first");
        assert_eq!(frames[2].payload(), b"second");
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_fragmented_header() {
        let mut buffer = FrameBuffer::new();
        let frame_bytes = make_frame_bytes(FrameType::Data, Flags::empty(), 3, b"test");

        let frames = buffer.push(&frame_bytes[..5]).unwrap();
        assert!(frames.is_empty());
        assert_eq!(buffer.state_name(), "WaitingForHeader");

        let frames = buffer.push(&frame_bytes[5..]).unwrap();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].stream_id(), 3);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_fragmented_payload() {
        let mut buffer = FrameBuffer::new();
        let payload = b"this is a longer payload that will be fragmented";
        let frame_bytes = make_frame_bytes(FrameType::Data, Flags::empty(), 1, payload);

        let partial_len = FRAME_HEADER_LEN + 10;
        let frames = buffer.push(&frame_bytes[..partial_len]).unwrap();
        assert!(frames.is_empty());
        assert_eq!(buffer.state_name(), "WaitingForPayload");

        let frames = buffer.push(&frame_bytes[partial_len..]).unwrap();
        assert_eq!(frames.len(), 1);
        assert_eq!(&frames[0].payload[..], payload);
    }

    #[test]
    fn test_empty_payload() {
        let mut buffer = FrameBuffer::new();
        let frame_bytes = make_frame_bytes(FrameType::Settings, flags::ACK, 0, b"");

        let frames = buffer.push(&frame_bytes).unwrap();

        assert_eq!(frames.len(), 1);
        assert!(frames[0].payload.is_empty());
        assert_eq!(frames[0].header.length, 0);
    }

    #[test]
    fn test_oversize_frame_rejected_before_payload() {
        let mut buffer = FrameBuffer::with_max_frame_size(100);
        let header = FrameHeader::new(FrameType::Data, Flags::empty(), 1, 1000);

        let err = buffer.push(&header.encode()).unwrap_err();

        assert_eq!(err.code(), Some(ErrCode::FRAME_SIZE_ERROR));
        assert!(err.to_string().contains("at most 100"));
    }

    #[test]
    fn test_with_config() {
        let config = CodecConfig::new().with_max_frame_size(65_536);
        let buffer = FrameBuffer::with_config(&config).unwrap();
        assert_eq!(buffer.max_frame_size(), 65_536);

        let bad = CodecConfig::new().with_max_frame_size(100);
        assert!(matches!(FrameBuffer::with_config(&bad), Err(Error::Config(_))));
    }

    #[test]
    fn test_clear_resets_state() {
        let mut buffer = FrameBuffer::new();
        let frame_bytes = make_frame_bytes(FrameType::Data, Flags::empty(), 1, b"test");

        buffer.push(&frame_bytes[..FRAME_HEADER_LEN]).unwrap();
        assert_eq!(buffer.state_name(), "WaitingForPayload");

        buffer.clear();

        assert_eq!(buffer.state_name(), "WaitingForHeader");
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_byte_at_a_time() {
        let mut buffer = FrameBuffer::new();
        let frame_bytes = make_frame_bytes(FrameType::Ping, Flags::empty(), 0, b"pingpong");

        let mut all_frames = Vec::new();
        for byte in &frame_bytes {
            all_frames.extend(buffer.push(&[*byte]).unwrap());
        }

        assert_eq!(all_frames.len(), 1);
        assert_eq!(all_frames[0].payload(), b"pingpong");
        assert!(all_frames[0].parse().is_ok());
    }
}
