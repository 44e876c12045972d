//! Error types for h2-framing.
//!
//! Failures fall into three groups that callers must handle differently:
//!
//! - **Connection errors** ([`Error::Connection`], [`Error::FrameSize`]): the
//!   peer violated the framing rules; the whole connection is unusable.
//! - **Stream errors** ([`Error::Stream`]): the violation is scoped to one
//!   stream; only that stream is reset.
//! - **Transport errors** ([`Error::UnexpectedEof`], [`Error::Io`]): the byte
//!   source ran dry or failed. Not a protocol violation.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::protocol::FrameType;

/// Protocol error code carried by RST_STREAM and GOAWAY frames.
///
/// Unknown values are kept as their raw integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrCode(pub u32);

impl ErrCode {
    pub const NO_ERROR: ErrCode = ErrCode(0x0);
    pub const PROTOCOL_ERROR: ErrCode = ErrCode(0x1);
    pub const INTERNAL_ERROR: ErrCode = ErrCode(0x2);
    pub const FLOW_CONTROL_ERROR: ErrCode = ErrCode(0x3);
    pub const SETTINGS_TIMEOUT: ErrCode = ErrCode(0x4);
    pub const STREAM_CLOSED: ErrCode = ErrCode(0x5);
    pub const FRAME_SIZE_ERROR: ErrCode = ErrCode(0x6);
    pub const REFUSED_STREAM: ErrCode = ErrCode(0x7);
    pub const CANCEL: ErrCode = ErrCode(0x8);
    pub const COMPRESSION_ERROR: ErrCode = ErrCode(0x9);
    pub const CONNECT_ERROR: ErrCode = ErrCode(0xa);
    pub const ENHANCE_YOUR_CALM: ErrCode = ErrCode(0xb);
    pub const INADEQUATE_SECURITY: ErrCode = ErrCode(0xc);
    pub const HTTP_1_1_REQUIRED: ErrCode = ErrCode(0xd);

    /// Registered name of the code, `None` for unknown values.
    pub fn name(self) -> Option<&'static str> {
        let name = match self.0 {
            0x0 => "NO_ERROR",
            0x1 => "PROTOCOL_ERROR",
            0x2 => "INTERNAL_ERROR",
            0x3 => "FLOW_CONTROL_ERROR",
            0x4 => "SETTINGS_TIMEOUT",
            0x5 => "STREAM_CLOSED",
            0x6 => "FRAME_SIZE_ERROR",
            0x7 => "REFUSED_STREAM",
            0x8 => "CANCEL",
            0x9 => "COMPRESSION_ERROR",
            0xa => "CONNECT_ERROR",
            0xb => "ENHANCE_YOUR_CALM",
            0xc => "INADEQUATE_SECURITY",
            0xd => "HTTP_1_1_REQUIRED",
            _ => return None,
        };
        Some(name)
    }

    /// Check if the code is one of the registered values.
    #[inline]
    pub fn is_known(self) -> bool {
        self.name().is_some()
    }
}

impl fmt::Display for ErrCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "unknown error code 0x{:x}", self.0),
        }
    }
}

impl From<u32> for ErrCode {
    #[inline]
    fn from(v: u32) -> Self {
        ErrCode(v)
    }
}

impl From<ErrCode> for u32 {
    #[inline]
    fn from(code: ErrCode) -> Self {
        code.0
    }
}

/// Error scoped to a single stream.
#[derive(Debug)]
pub struct StreamError {
    /// Stream the error applies to.
    pub stream_id: u32,
    /// Code to send in the RST_STREAM.
    pub code: ErrCode,
    /// Underlying cause, if any.
    pub cause: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl StreamError {
    /// Create a stream error without a cause.
    pub fn new(stream_id: u32, code: ErrCode) -> Self {
        Self {
            stream_id,
            code,
            cause: None,
        }
    }

    /// Attach an underlying cause.
    pub fn with_cause<E>(mut self, cause: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        self.cause = Some(cause.into());
        self
    }
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stream error: stream ID {}; {}", self.stream_id, self.code)?;
        if let Some(cause) = &self.cause {
            write!(f, "; {}", cause)?;
        }
        Ok(())
    }
}

impl std::error::Error for StreamError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_ref()
            .map(|cause| cause.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Main error type for all framing operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Connection-fatal protocol error.
    #[error("connection error: {code}: {reason}")]
    Connection {
        code: ErrCode,
        reason: Cow<'static, str>,
    },

    /// Fixed-size or bounded frame with the wrong payload length.
    #[error("connection error: FRAME_SIZE_ERROR: {frame_type} frame payload size was {actual}; want {expected}")]
    FrameSize {
        frame_type: FrameType,
        actual: usize,
        expected: Cow<'static, str>,
    },

    /// Stream-scoped protocol error.
    #[error(transparent)]
    Stream(#[from] StreamError),

    /// Byte source or payload ended before a required field.
    #[error("unexpected end of input")]
    UnexpectedEof,

    /// I/O error from the byte source or sink.
    #[error("I/O error: {0}")]
    Io(#[source] std::io::Error),

    /// Invalid codec configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// JSON deserialization error (configuration only).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Connection-fatal PROTOCOL_ERROR with a reason.
    pub fn protocol(reason: impl Into<Cow<'static, str>>) -> Self {
        Error::Connection {
            code: ErrCode::PROTOCOL_ERROR,
            reason: reason.into(),
        }
    }

    /// Frame-size error naming the observed and expected sizes.
    pub fn frame_size(
        frame_type: FrameType,
        actual: usize,
        expected: impl Into<Cow<'static, str>>,
    ) -> Self {
        Error::FrameSize {
            frame_type,
            actual,
            expected: expected.into(),
        }
    }

    /// Stream-scoped error without a cause.
    pub fn stream(stream_id: u32, code: ErrCode) -> Self {
        Error::Stream(StreamError::new(stream_id, code))
    }

    /// Check if the connection must be torn down because the peer broke the protocol.
    #[inline]
    pub fn is_connection_error(&self) -> bool {
        matches!(self, Error::Connection { .. } | Error::FrameSize { .. })
    }

    /// Check if only one stream is affected.
    #[inline]
    pub fn is_stream_error(&self) -> bool {
        matches!(self, Error::Stream(_))
    }

    /// Check if this is a transport failure (peer went away or source failed).
    #[inline]
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::UnexpectedEof | Error::Io(_))
    }

    /// Protocol error code to report to the peer, if this is a protocol error.
    pub fn code(&self) -> Option<ErrCode> {
        match self {
            Error::Connection { code, .. } => Some(*code),
            Error::FrameSize { .. } => Some(ErrCode::FRAME_SIZE_ERROR),
            Error::Stream(e) => Some(e.code),
            Error::UnexpectedEof | Error::Io(_) | Error::Config(_) | Error::Json(_) => None,
        }
    }

    /// Stream ID for stream-scoped errors.
    pub fn stream_id(&self) -> Option<u32> {
        match self {
            Error::Stream(e) => Some(e.stream_id),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            Error::UnexpectedEof
        } else {
            Error::Io(e)
        }
    }
}

/// Result type alias using the framing [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
