//! # h2-framing
//!
//! Binary frame codec for the HTTP/2 framing layer.
//!
//! Every frame is a 9-byte header followed by a typed payload:
//!
//! ```text
//! +-----------------------------------------------+
//! |                 Length (24)                   |
//! +---------------+---------------+---------------+
//! |   Type (8)    |   Flags (8)   |
//! +-+-------------+---------------+-------------------------------+
//! |R|                 Stream Identifier (31)                      |
//! +=+=============================================================+
//! |                   Frame Payload (0...)                      ...
//! +---------------------------------------------------------------+
//! ```
//!
//! The crate reads frames from byte sources, splits them into header and
//! payload, and decodes each payload into a typed view that borrows from the
//! payload buffer. Violations are reported as a connection error, a stream
//! error (scoped to one stream) or a transport failure; see [`Error`].
//!
//! It does no HPACK decoding, no stream state tracking and no flow control.
//!
//! ## Example
//!
//! ```
//! use h2_framing::{Frame, FrameReader};
//!
//! let wire: &[u8] = &[0, 0, 5, 0, 1, 0, 0, 0, 1, b'h', b'e', b'l', b'l', b'o'];
//! let mut reader = FrameReader::new(wire);
//!
//! let raw = reader.read_frame().unwrap();
//! if let Frame::Data(data) = raw.parse().unwrap() {
//!     assert_eq!(data.data, b"hello");
//! }
//! ```

pub mod config;
pub mod error;
pub mod protocol;
pub mod reader;
pub mod writer;

pub use config::CodecConfig;
pub use error::{ErrCode, Error, Result, StreamError};
pub use protocol::{Flags, Frame, FrameBuffer, FrameHeader, FrameType, HeaderPool, RawFrame};
pub use reader::{read_frame, read_frame_async, FrameReader};
pub use writer::{write_frame, write_frame_async, FrameWriter};
